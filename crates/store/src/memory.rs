//! In-memory document store.
//!
//! A [`DocumentStore`] backed by a process-local vector, used to exercise
//! the translation layer end to end without a database driver. Versioning
//! behavior matches what a real engine provides: inserting a new version
//! flips the previously current version of the same logical resource to
//! `superseded`, and superseded versions stay readable through
//! [`DocumentStore::fetch_version`] and [`DocumentStore::history`].

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, DocumentState, field};
use crate::error::StoreResult;
use crate::key::ResourceKey;
use crate::store::DocumentStore;

/// Process-local [`DocumentStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Value>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored documents (all versions).
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

fn envelope_str<'a>(document: &'a Value, name: &str) -> Option<&'a str> {
    document.get(name).and_then(Value::as_str)
}

fn identifies(document: &Value, type_name: &str, resource_id: &str) -> bool {
    envelope_str(document, field::TYPE_NAME) == Some(type_name)
        && envelope_str(document, field::RESOURCE_ID) == Some(resource_id)
}

fn is_current(document: &Value) -> bool {
    envelope_str(document, field::STATE)
        .and_then(DocumentState::parse)
        .is_some_and(|state| state == DocumentState::Current)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, document: Value) -> StoreResult<()> {
        // Validates the envelope before anything is stored; a document the
        // codec cannot read back must never land in the store.
        let (interaction, _) = envelope::extract(document.clone())?;
        let primary_key = interaction.key().relative_path();

        let mut documents = self.documents.write();
        for stored in documents.iter_mut() {
            if envelope_str(stored, field::PRIMARY_KEY) == Some(primary_key.as_str())
                && is_current(stored)
            {
                stored[field::STATE] =
                    Value::String(DocumentState::Superseded.as_str().to_string());
            }
        }
        documents.push(document);

        debug!(key = %interaction.key(), "stored document version");
        Ok(())
    }

    async fn fetch_current(
        &self,
        type_name: &str,
        resource_id: &str,
    ) -> StoreResult<Option<Value>> {
        let documents = self.documents.read();
        Ok(documents
            .iter()
            .rev()
            .find(|stored| identifies(stored, type_name, resource_id) && is_current(stored))
            .cloned())
    }

    async fn fetch_version(&self, key: &ResourceKey) -> StoreResult<Option<Value>> {
        let Some((type_name, resource_id, version_id)) = key.storage_parts() else {
            return Ok(None);
        };

        let documents = self.documents.read();
        Ok(documents
            .iter()
            .find(|stored| {
                identifies(stored, type_name, resource_id)
                    && envelope_str(stored, field::VERSION_ID) == Some(version_id)
            })
            .cloned())
    }

    async fn history(&self, type_name: &str, resource_id: &str) -> StoreResult<Vec<Value>> {
        let documents = self.documents.read();
        Ok(documents
            .iter()
            .filter(|stored| identifies(stored, type_name, resource_id))
            .cloned()
            .collect())
    }
}
