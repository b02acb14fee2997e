//! Persistence boundary
//!
//! Saving is the owning screen's decision; the core only hands over the
//! flat record list. Transport, auth and retries belong to implementors.

use async_trait::async_trait;
use roster_types::{AssignmentRecord, ContextId, RosterError, RosterResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Where assignment sets are loaded from and saved to
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Replace the stored assignments of `context` with `records`
    async fn save_assignments(
        &self,
        context: &ContextId,
        records: Vec<AssignmentRecord>,
    ) -> RosterResult<()>;

    /// Load the stored assignments of `context`; empty if none
    async fn load_assignments(&self, context: &ContextId) -> RosterResult<Vec<AssignmentRecord>>;
}

/// In-memory store for tests and demos
#[derive(Default)]
pub struct InMemoryAssignmentStore {
    saved: RwLock<HashMap<ContextId, Vec<AssignmentRecord>>>,
    save_count: RwLock<u64>,
    /// When set, saves fail with this message
    failure: RwLock<Option<String>>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves so far
    pub async fn save_count(&self) -> u64 {
        *self.save_count.read().await
    }

    /// Make subsequent saves fail, or succeed again with `None`
    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.write().await = message;
    }
}

#[async_trait]
impl AssignmentStore for InMemoryAssignmentStore {
    async fn save_assignments(
        &self,
        context: &ContextId,
        records: Vec<AssignmentRecord>,
    ) -> RosterResult<()> {
        if let Some(message) = self.failure.read().await.clone() {
            return Err(RosterError::Persistence(message));
        }
        self.saved.write().await.insert(context.clone(), records);
        *self.save_count.write().await += 1;
        Ok(())
    }

    async fn load_assignments(&self, context: &ContextId) -> RosterResult<Vec<AssignmentRecord>> {
        Ok(self
            .saved
            .read()
            .await
            .get(context)
            .cloned()
            .unwrap_or_default())
    }
}
