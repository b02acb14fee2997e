//! Member directory boundary
//!
//! The candidate universe for a context comes from the user directory,
//! which lives behind a network call. The core only consumes the trait.

use async_trait::async_trait;
use roster_types::{ContextId, Member, RosterError, RosterResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Source of the members eligible for assignment in a context
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// List every candidate for `context`
    async fn list_candidates(&self, context: &ContextId) -> RosterResult<Vec<Member>>;
}

/// Narrow `candidates` to those matching a search query
///
/// The result is the "visible subset" a picker hands to select-all.
pub fn filter_candidates<'a>(candidates: &'a [Member], query: &str) -> Vec<&'a Member> {
    candidates.iter().filter(|m| m.matches(query)).collect()
}

/// In-memory directory for tests and demos
#[derive(Default)]
pub struct InMemoryDirectory {
    /// Candidates offered to every context
    shared: RwLock<Vec<Member>>,
    /// Context-specific candidate lists, taking priority over `shared`
    per_context: RwLock<HashMap<ContextId, Vec<Member>>>,
    /// When set, every call fails with this message
    failure: RwLock<Option<String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            shared: RwLock::new(members),
            ..Self::default()
        }
    }

    /// Offer `members` for one context only
    pub async fn set_candidates(&self, context: ContextId, members: Vec<Member>) {
        self.per_context.write().await.insert(context, members);
    }

    /// Make subsequent calls fail, or succeed again with `None`
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.write().await = message;
    }
}

#[async_trait]
impl MemberDirectory for InMemoryDirectory {
    async fn list_candidates(&self, context: &ContextId) -> RosterResult<Vec<Member>> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(RosterError::Directory(message));
        }
        if let Some(members) = self.per_context.read().await.get(context) {
            return Ok(members.clone());
        }
        Ok(self.shared.read().await.clone())
    }
}
