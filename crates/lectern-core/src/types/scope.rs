//! Scope types for per-owner query narrowing.
//!
//! A [`Scope`] turns a scope request (article set / collection / domain /
//! owner) into an ordered list of predicate clauses. Every retrieval tier
//! applies the same clause list in the same order, so scope semantics are
//! identical across vector, full-text, and substring search.

use serde::{Deserialize, Serialize};

use super::document::DocumentMeta;

/// Query scope: owner plus optional narrowing.
///
/// `owner_id` is mandatory; soft-delete exclusion is implicit and always
/// applied. At most one of `article_ids` / `collection_id` is meaningful:
/// when both are set, the article set takes precedence and the collection
/// id is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Owning user. Every clause list starts with this.
    pub owner_id: String,
    /// Restrict to an explicit article set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_ids: Option<Vec<String>>,
    /// Restrict to one collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    /// Restrict to one source domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// A single predicate clause produced by [`Scope::clauses`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeClause {
    /// `owner_id` equality. Always first.
    Owner(String),
    /// Soft-delete exclusion (`deleted_at` unset). Always second.
    ExcludeDeleted,
    /// Article id membership.
    ArticleSet(Vec<String>),
    /// Collection id equality.
    Collection(String),
    /// Domain equality.
    Domain(String),
}

impl Scope {
    /// Whole-corpus scope for one owner.
    pub fn owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            article_ids: None,
            collection_id: None,
            domain: None,
        }
    }

    /// Restrict to an explicit article set.
    pub fn with_articles(mut self, article_ids: Vec<String>) -> Self {
        self.article_ids = Some(article_ids);
        self
    }

    /// Restrict to one collection.
    pub fn with_collection(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    /// Restrict to one source domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Whether the scope names specific documents (non-empty article set
    /// or a collection). Comprehensive mode requires this.
    pub fn is_narrowed(&self) -> bool {
        self.article_ids.as_ref().is_some_and(|ids| !ids.is_empty())
            || self.collection_id.is_some()
    }

    /// Build the ordered predicate clause list.
    ///
    /// Owner clause first, soft-delete exclusion second, then at most one
    /// of article-set / collection (article set wins), then the optional
    /// domain clause.
    pub fn clauses(&self) -> Vec<ScopeClause> {
        let mut clauses = vec![
            ScopeClause::Owner(self.owner_id.clone()),
            ScopeClause::ExcludeDeleted,
        ];

        if let Some(ids) = self.article_ids.as_ref().filter(|ids| !ids.is_empty()) {
            clauses.push(ScopeClause::ArticleSet(ids.clone()));
        } else if let Some(collection_id) = &self.collection_id {
            clauses.push(ScopeClause::Collection(collection_id.clone()));
        }

        if let Some(domain) = &self.domain {
            clauses.push(ScopeClause::Domain(domain.clone()));
        }

        clauses
    }

    /// Evaluate the clause list against a document.
    ///
    /// This is the single scope evaluator shared by every in-process tier;
    /// backends translating clauses to their own query language must
    /// preserve the same semantics.
    pub fn matches(&self, doc: &DocumentMeta) -> bool {
        self.clauses().iter().all(|clause| match clause {
            ScopeClause::Owner(owner_id) => &doc.owner_id == owner_id,
            ScopeClause::ExcludeDeleted => doc.deleted_at.is_none(),
            ScopeClause::ArticleSet(ids) => ids.contains(&doc.id),
            ScopeClause::Collection(collection_id) => {
                doc.collection_id.as_ref() == Some(collection_id)
            }
            ScopeClause::Domain(domain) => &doc.domain == domain,
        })
    }

    /// Canonical serialization of the scope for cache keying.
    ///
    /// Field order is fixed and article ids are sorted, so semantically
    /// identical scopes built in different orders produce identical keys.
    pub fn canonical_key(&self) -> String {
        let articles = self
            .article_ids
            .as_ref()
            .filter(|ids| !ids.is_empty())
            .map(|ids| {
                let mut sorted = ids.clone();
                sorted.sort();
                sorted.join(",")
            })
            .unwrap_or_default();

        format!(
            "owner={}|articles=[{}]|collection={}|domain={}",
            self.owner_id,
            articles,
            self.collection_id.as_deref().unwrap_or(""),
            self.domain.as_deref().unwrap_or("")
        )
    }
}
