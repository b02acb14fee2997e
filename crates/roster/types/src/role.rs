//! Role catalog: role definitions and exclusivity groups
//!
//! Roles are the named slots a context defines. Some keep an explicit
//! order (a song list), some hold a bounded number of members (a single
//! leader). Exclusivity groups state which roles one person may not hold
//! together, listed in precedence order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of a role slot, e.g. `leader` or `singer`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoleName(pub String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Definition of one role slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    /// Role name, unique within a catalog
    pub name: RoleName,
    /// Human-readable description
    pub description: String,
    /// Whether entries carry a dense 1..N order value
    pub ordered: bool,
    /// Maximum number of members; `None` is unbounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl RoleSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: RoleName::new(name),
            description: description.into(),
            ordered: false,
            capacity: None,
        }
    }

    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// A single-slot role: selecting a new holder replaces the old one
    pub fn single(self) -> Self {
        self.with_capacity(1)
    }
}

/// A set of roles of which one person may hold at most one
///
/// `roles` is in precedence order, highest first. Precedence decides who
/// wins when a lower role is requested for someone already holding a higher
/// one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusivityGroup {
    pub name: String,
    pub roles: Vec<RoleName>,
}

impl ExclusivityGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(RoleName::new(role));
        self
    }

    pub fn contains(&self, role: &RoleName) -> bool {
        self.roles.contains(role)
    }

    /// Position of `role` in precedence order (0 is highest)
    pub fn rank(&self, role: &RoleName) -> Option<usize> {
        self.roles.iter().position(|r| r == role)
    }

    /// Every role in the group except `role`
    pub fn others<'a>(&'a self, role: &'a RoleName) -> impl Iterator<Item = &'a RoleName> + 'a {
        self.roles.iter().filter(move |r| *r != role)
    }
}

/// All roles and exclusivity groups known to an assignment context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoleCatalog {
    /// Role definitions keyed by name
    pub roles: BTreeMap<RoleName, RoleSpec>,
    /// Exclusivity groups; a role appears in at most one
    pub groups: Vec<ExclusivityGroup>,
}

impl RoleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, spec: RoleSpec) -> Self {
        self.register_role(spec);
        self
    }

    pub fn with_group(mut self, group: ExclusivityGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Register (or replace) a role definition
    pub fn register_role(&mut self, spec: RoleSpec) {
        self.roles.insert(spec.name.clone(), spec);
    }

    pub fn get_role(&self, role: &RoleName) -> Option<&RoleSpec> {
        self.roles.get(role)
    }

    /// Unknown roles are treated as unordered
    pub fn is_ordered(&self, role: &RoleName) -> bool {
        self.roles.get(role).map(|r| r.ordered).unwrap_or(false)
    }

    /// Unknown roles are treated as unbounded
    pub fn capacity(&self, role: &RoleName) -> Option<usize> {
        self.roles.get(role).and_then(|r| r.capacity)
    }

    /// The exclusivity group containing `role`, if any
    pub fn group_of(&self, role: &RoleName) -> Option<&ExclusivityGroup> {
        self.groups.iter().find(|g| g.contains(role))
    }
}
