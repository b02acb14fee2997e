//! Error types for the roster layer

use crate::{MemberId, RoleName};

/// Errors that can occur in roster operations
///
/// The first three variants are caller errors: the screen asked the core to
/// do something impossible. The collaborator variants carry failures from the
/// directory and persistence boundaries through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("Assignment not found: {member} in role {role}")]
    AssignmentNotFound { role: RoleName, member: MemberId },

    #[error("Index {index} out of range for role {role} (len {len})")]
    IndexOutOfRange {
        role: RoleName,
        index: usize,
        len: usize,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Member directory error: {0}")]
    Directory(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

/// Result type alias for roster operations
pub type RosterResult<T> = Result<T, RosterError>;
