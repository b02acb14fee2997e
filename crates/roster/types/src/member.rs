//! Members: the people a context can assign to roles
//!
//! Members are owned by the user directory. The roster never mutates them;
//! assignments refer to them by [`MemberId`] only.

use serde::{Deserialize, Serialize};

/// Unique identifier for a Member
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person eligible for assignment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Directory identifier
    pub id: MemberId,
    /// Name shown in pickers
    pub display_name: String,
    /// Contact email
    pub email: String,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: MemberId::new(id),
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Case-insensitive match of `query` against name or email
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.display_name.to_lowercase().contains(&query)
            || self.email.to_lowercase().contains(&query)
    }
}
