//! End-to-end tests: codec plus in-memory store.
//!
//! Every document written here goes through [`DocumentCodec::to_document`]
//! and every document read back goes through
//! [`DocumentCodec::from_document`], mirroring how a real storage engine is
//! driven.

mod common;

use chrono::Duration;

use common::fixtures::{PatientFixture, default_when, fixed_codec_at};
use meridian_store::envelope::field;
use meridian_store::{
    DocumentCodec, DocumentStore, InMemoryDocumentStore, Interaction, Method, ResourceKey,
};

async fn write(
    store: &InMemoryDocumentStore,
    codec: &DocumentCodec,
    interaction: &mut Interaction,
) {
    let document = codec.to_document(interaction).unwrap();
    store.insert(document).await.unwrap();
}

#[tokio::test]
async fn create_then_read_roundtrips_through_the_store() {
    let store = InMemoryDocumentStore::new();
    let codec = fixed_codec_at(default_when());
    let fixture = PatientFixture::new("42", "Chalmers").with_birth_date("1974-12-25");

    let mut create = fixture.interaction(Method::Create, "1");
    write(&store, &codec, &mut create).await;

    let stored = store.fetch_current("Patient", "42").await.unwrap().unwrap();
    let read_back = codec.from_document(stored).unwrap();

    assert_eq!(read_back.key().versioned_path(), "Patient/42/_history/1");
    assert_eq!(read_back.method(), Method::Create);
    assert_eq!(
        read_back.resource().unwrap().as_value()["birthDate"],
        "1974-12-25"
    );
}

#[tokio::test]
async fn update_supersedes_but_history_keeps_every_version() {
    let store = InMemoryDocumentStore::new();
    let fixture = PatientFixture::new("42", "Chalmers");

    let mut create = fixture.interaction(Method::Create, "1");
    write(&store, &fixed_codec_at(default_when()), &mut create).await;

    let later = default_when() + Duration::minutes(5);
    let mut update = fixture
        .clone()
        .with_active(false)
        .interaction(Method::Update, "2");
    write(&store, &fixed_codec_at(later), &mut update).await;

    let codec = fixed_codec_at(later);
    let current = store.fetch_current("Patient", "42").await.unwrap().unwrap();
    let read_back = codec.from_document(current).unwrap();
    assert_eq!(read_back.key().version_id(), Some("2"));
    assert_eq!(read_back.when(), later);
    assert_eq!(read_back.resource().unwrap().as_value()["active"], false);

    // the first version is superseded, still addressable by key
    let v1_key = fixture.key("1");
    let v1 = store.fetch_version(&v1_key).await.unwrap().unwrap();
    assert_eq!(v1[field::STATE], "superseded");
    let v1_back = codec.from_document(v1).unwrap();
    assert_eq!(v1_back.resource().unwrap().as_value()["active"], true);

    let history = store.history("Patient", "42").await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn deletion_marker_is_a_contentless_version() {
    let store = InMemoryDocumentStore::new();
    let fixture = PatientFixture::new("42", "Chalmers");

    let mut create = fixture.interaction(Method::Create, "1");
    write(&store, &fixed_codec_at(default_when()), &mut create).await;

    let later = default_when() + Duration::hours(1);
    let codec = fixed_codec_at(later);
    let mut delete = Interaction::new(fixture.key("2"), Method::Delete, later);
    write(&store, &codec, &mut delete).await;

    let current = store.fetch_current("Patient", "42").await.unwrap().unwrap();
    let read_back = codec.from_document(current).unwrap();

    assert_eq!(read_back.method(), Method::Delete);
    assert!(!read_back.is_present());
    assert!(read_back.resource().is_none());
    assert_eq!(read_back.when(), later);
}

#[tokio::test]
async fn versions_of_different_resources_do_not_interfere() {
    let store = InMemoryDocumentStore::new();
    let codec = fixed_codec_at(default_when());

    let mut first = PatientFixture::new("42", "Chalmers").interaction(Method::Create, "1");
    let mut second = PatientFixture::new("43", "Levin").interaction(Method::Create, "1");
    write(&store, &codec, &mut first).await;
    write(&store, &codec, &mut second).await;

    let current = store.fetch_current("Patient", "42").await.unwrap().unwrap();
    assert_eq!(current[field::PRIMARY_KEY], "Patient/42");
    assert_eq!(current[field::STATE], "current");

    let other = store.fetch_current("Patient", "43").await.unwrap().unwrap();
    assert_eq!(other[field::STATE], "current");

    assert_eq!(store.history("Patient", "42").await.unwrap().len(), 1);
}

#[tokio::test]
async fn absent_records_are_none_not_errors() {
    let store = InMemoryDocumentStore::new();

    assert!(store.fetch_current("Patient", "nope").await.unwrap().is_none());

    let key = ResourceKey::new("Patient")
        .with_resource_id("nope")
        .with_version_id("1");
    assert!(store.fetch_version(&key).await.unwrap().is_none());
    assert!(store.history("Patient", "nope").await.unwrap().is_empty());
}
