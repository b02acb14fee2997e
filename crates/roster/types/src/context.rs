//! Assignment contexts: the event or group an assignment set belongs to

use serde::{Deserialize, Serialize};

/// Identifier of an assignment context (one event, or one group being created)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextId(pub String);

impl ContextId {
    /// Generate a new random ContextId, for groups that have no server id yet
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Short display form (first 8 chars)
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_id() {
        let id = ContextId::generate();
        assert_eq!(id.short().len(), 8);
        assert_eq!(ContextId::new("event-42").to_string(), "event-42");
    }
}
