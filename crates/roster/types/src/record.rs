//! Flat persistence records and snapshot digests
//!
//! Persistence receives assignments as one flat list, not nested by role.
//! The digest is computed over the canonical form of that list so two sets
//! with the same content hash equal regardless of insertion history.

use crate::{Assignment, MemberId, RoleName};
use serde::{Deserialize, Serialize};

/// One assignment in the flat shape handed to persistence
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub member_id: MemberId,
    pub role: RoleName,
    pub detail: Option<String>,
    pub order: Option<u32>,
}

impl AssignmentRecord {
    pub fn new(member_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            member_id: MemberId::new(member_id),
            role: RoleName::new(role),
            detail: None,
            order: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

impl From<&Assignment> for AssignmentRecord {
    fn from(assignment: &Assignment) -> Self {
        Self {
            member_id: assignment.member_id.clone(),
            role: assignment.role.clone(),
            detail: assignment.detail.clone(),
            order: assignment.order,
        }
    }
}

/// Encode records as the JSON array persistence expects
pub fn records_to_json(records: &[AssignmentRecord]) -> crate::RosterResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Decode records from server-provided JSON
pub fn records_from_json(json: &str) -> crate::RosterResult<Vec<AssignmentRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// BLAKE3 digest over a canonical record list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotDigest(blake3::Hash);

impl SnapshotDigest {
    /// Hash records in the order given; callers pass the canonical order
    pub fn of_records(records: &[AssignmentRecord]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for record in records {
            update_field(&mut hasher, record.role.as_str().as_bytes());
            update_field(&mut hasher, record.member_id.as_str().as_bytes());
            match &record.detail {
                Some(detail) => {
                    hasher.update(&[1]);
                    update_field(&mut hasher, detail.as_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            match record.order {
                Some(order) => {
                    hasher.update(&[1]);
                    hasher.update(&order.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        Self(hasher.finalize())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

// Length prefix keeps ("ab", "c") distinct from ("a", "bc")
fn update_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl std::fmt::Display for SnapshotDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
