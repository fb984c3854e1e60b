//! Document, chunk, and concept types.

use serde::{Deserialize, Serialize};

/// Lightweight document metadata as read from the owning application's store.
///
/// A document is an article saved by exactly one user. `deleted_at` marks a
/// soft delete; soft-deleted documents are permanently invisible to every
/// retrieval tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Unique identifier.
    pub id: String,
    /// Owning user. Every store read is scoped by this field.
    pub owner_id: String,
    /// Article title.
    pub title: String,
    /// Source domain (e.g. `"example.com"`).
    pub domain: String,
    /// Collection membership, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Pre-generated article summary, used by comprehensive mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Soft-delete timestamp (Unix seconds). Set means invisible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    /// Save timestamp (Unix seconds); orders the substring tier's sample.
    pub saved_at: i64,
}

impl DocumentMeta {
    /// Create a new document owned by `owner_id`.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            title: title.into(),
            domain: domain.into(),
            collection_id: None,
            summary: None,
            deleted_at: None,
            saved_at: 0,
        }
    }

    /// Set the collection membership.
    pub fn with_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    /// Set the summary text.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the save timestamp.
    pub fn with_saved_at(mut self, saved_at: i64) -> Self {
        self.saved_at = saved_at;
        self
    }

    /// Mark the document soft-deleted.
    pub fn with_deleted_at(mut self, deleted_at: i64) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }

    /// Whether the document is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A fragment of a document's body with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier.
    pub id: String,
    /// Parent document.
    pub document_id: String,
    /// Position within the document body.
    pub order: i64,
    /// Chunk text.
    pub content: String,
    /// Fixed-dimension embedding vector.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        order: i64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            order,
            content: content.into(),
            embedding: Vec::new(),
        }
    }

    /// Set the embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A concept entry (term + definition) owned by a user.
///
/// Concepts are the second entity kind ranked by the hybrid searcher; the
/// `term` is the primary match field, the `definition` the secondary one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub owner_id: String,
    /// The term itself (primary match field).
    pub term: String,
    /// Definition body (secondary match field).
    pub definition: String,
    /// Embedding of term + definition.
    pub embedding: Vec<f32>,
    /// Soft-delete timestamp (Unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl Concept {
    /// Create a new concept.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        term: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            term: term.into(),
            definition: definition.into(),
            embedding: Vec::new(),
            deleted_at: None,
        }
    }

    /// Set the embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// Entity kinds ranked by the hybrid searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Saved articles.
    Article,
    /// Concept entries.
    Concept,
}
