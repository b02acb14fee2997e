//! Roster configuration
//!
//! Roles and exclusivity groups are configuration data, loaded from TOML:
//!
//! ```toml
//! [[roles]]
//! name = "leader"
//! capacity = 1
//!
//! [[roles]]
//! name = "member"
//!
//! [[exclusivity_groups]]
//! name = "leadership"
//! roles = ["leader", "member"]
//! ```

use roster_types::{ExclusivityGroup, RoleCatalog, RoleName, RoleSpec, RosterError, RosterResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One role as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleConfig {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Keep a dense 1..N order (song lists, speaking order)
    #[serde(default)]
    pub ordered: bool,

    /// Maximum holders; omitted means unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

impl RoleConfig {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ordered: false,
            capacity: None,
        }
    }

    fn single(mut self) -> Self {
        self.capacity = Some(1);
        self
    }

    fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }
}

/// An exclusivity group; roles listed highest precedence first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    pub name: String,
    pub roles: Vec<String>,
}

/// Roster configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterConfig {
    #[serde(default)]
    pub roles: Vec<RoleConfig>,

    #[serde(default)]
    pub exclusivity_groups: Vec<GroupConfig>,
}

impl Default for RosterConfig {
    /// The church preset: group leadership plus worship-service teams
    fn default() -> Self {
        Self {
            roles: vec![
                RoleConfig::new("leader", "Leads the group").single(),
                RoleConfig::new("co_leader", "Assists the leader").single(),
                RoleConfig::new("member", "Group member"),
                RoleConfig::new("worship_leader", "Leads worship").single(),
                RoleConfig::new("singer", "Worship singer").ordered(),
                RoleConfig::new("speaker", "Speaks at the service"),
                RoleConfig::new("usher", "Welcomes and seats attendees"),
                RoleConfig::new("tech", "Sound, slides and streaming"),
                RoleConfig::new("song", "Song list").ordered(),
            ],
            exclusivity_groups: vec![
                GroupConfig {
                    name: "leadership".to_string(),
                    roles: vec!["leader".into(), "co_leader".into(), "member".into()],
                },
                GroupConfig {
                    name: "worship".to_string(),
                    roles: vec!["worship_leader".into(), "singer".into()],
                },
            ],
        }
    }
}

impl RosterConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> RosterResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RosterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path` if it exists, otherwise use the default preset
    pub fn load_or_default(path: impl AsRef<Path>) -> RosterResult<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> RosterResult<Self> {
        toml::from_str(contents).map_err(|e| RosterError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> RosterResult<String> {
        toml::to_string_pretty(self).map_err(|e| RosterError::Config(e.to_string()))
    }

    /// Validate and build the role catalog
    pub fn into_catalog(self) -> RosterResult<RoleCatalog> {
        let mut catalog = RoleCatalog::new();

        for role in self.roles {
            if role.name.trim().is_empty() {
                return Err(RosterError::Config("role with empty name".into()));
            }
            if role.capacity == Some(0) {
                return Err(RosterError::Config(format!(
                    "role '{}' has zero capacity",
                    role.name
                )));
            }
            let name = RoleName::new(role.name.clone());
            if catalog.get_role(&name).is_some() {
                return Err(RosterError::Config(format!(
                    "role '{}' defined twice",
                    role.name
                )));
            }

            let mut spec = RoleSpec::new(role.name, role.description);
            if role.ordered {
                spec = spec.ordered();
            }
            if let Some(capacity) = role.capacity {
                spec = spec.with_capacity(capacity);
            }
            catalog.register_role(spec);
        }

        let mut grouped: HashSet<String> = HashSet::new();
        for group in self.exclusivity_groups {
            if group.roles.is_empty() {
                return Err(RosterError::Config(format!(
                    "exclusivity group '{}' has no roles",
                    group.name
                )));
            }

            let mut built = ExclusivityGroup::new(group.name.clone());
            let mut listed: HashSet<&str> = HashSet::new();
            for role in &group.roles {
                if !listed.insert(role.as_str()) {
                    return Err(RosterError::Config(format!(
                        "exclusivity group '{}' lists role '{}' twice",
                        group.name, role
                    )));
                }
            }
            for role in group.roles {
                if catalog.get_role(&RoleName::new(role.clone())).is_none() {
                    return Err(RosterError::Config(format!(
                        "exclusivity group '{}' names unknown role '{}'",
                        group.name, role
                    )));
                }
                if !grouped.insert(role.clone()) {
                    return Err(RosterError::Config(format!(
                        "role '{}' appears in more than one exclusivity group",
                        role
                    )));
                }
                built = built.with_role(role);
            }
            catalog.groups.push(built);
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_preset_builds() {
        let catalog = RosterConfig::default().into_catalog().unwrap();

        assert_eq!(catalog.capacity(&RoleName::from("leader")), Some(1));
        let ordered: Vec<&str> = catalog
            .roles
            .values()
            .filter(|r| r.ordered)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(ordered, vec!["singer", "song"]);
        assert!(!catalog.is_ordered(&RoleName::from("speaker")));
        let group = catalog.group_of(&RoleName::from("member")).unwrap();
        assert_eq!(group.name, "leadership");
        assert_eq!(group.rank(&RoleName::from("co_leader")), Some(1));
        assert!(catalog.group_of(&RoleName::from("usher")).is_none());
    }

    #[test]
    fn test_parse_toml() {
        let config = RosterConfig::from_toml_str(
            r#"
            [[roles]]
            name = "leader"
            capacity = 1

            [[roles]]
            name = "member"
            description = "Group member"

            [[roles]]
            name = "song"
            ordered = true

            [[exclusivity_groups]]
            name = "leadership"
            roles = ["leader", "member"]
            "#,
        )
        .unwrap();

        assert_eq!(config.roles.len(), 3);
        assert_eq!(config.roles[0].capacity, Some(1));
        assert!(config.roles[2].ordered);

        let catalog = config.into_catalog().unwrap();
        assert_eq!(catalog.groups.len(), 1);
        assert_eq!(
            catalog.get_role(&RoleName::from("member")).unwrap().description,
            "Group member"
        );
    }

    #[test]
    fn test_toml_roundtrip_of_preset() {
        let preset = RosterConfig::default();
        let text = preset.to_toml_string().unwrap();
        assert_eq!(RosterConfig::from_toml_str(&text).unwrap(), preset);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            (
                "duplicate role",
                r#"
                [[roles]]
                name = "usher"
                [[roles]]
                name = "usher"
                "#,
            ),
            (
                "unknown group role",
                r#"
                [[roles]]
                name = "leader"
                [[exclusivity_groups]]
                name = "leadership"
                roles = ["leader", "ghost"]
                "#,
            ),
            (
                "role in two groups",
                r#"
                [[roles]]
                name = "a"
                [[roles]]
                name = "b"
                [[exclusivity_groups]]
                name = "one"
                roles = ["a", "b"]
                [[exclusivity_groups]]
                name = "two"
                roles = ["b"]
                "#,
            ),
            (
                "empty group",
                r#"
                [[exclusivity_groups]]
                name = "nothing"
                roles = []
                "#,
            ),
            (
                "zero capacity",
                r#"
                [[roles]]
                name = "leader"
                capacity = 0
                "#,
            ),
        ];

        for (label, text) in cases {
            let result = RosterConfig::from_toml_str(text).and_then(RosterConfig::into_catalog);
            assert!(
                matches!(result, Err(RosterError::Config(_))),
                "{} should be rejected",
                label
            );
        }
    }

    #[test]
    fn test_role_repeated_within_group() {
        let err = RosterConfig::from_toml_str(
            r#"
            [[roles]]
            name = "leader"
            [[exclusivity_groups]]
            name = "leadership"
            roles = ["leader", "leader"]
            "#,
        )
        .and_then(RosterConfig::into_catalog)
        .unwrap_err();

        assert_eq!(
            err,
            RosterError::Config("exclusivity group 'leadership' lists role 'leader' twice".into())
        );
    }

    #[test]
    fn test_malformed_toml() {
        let err = RosterConfig::from_toml_str("roles = 7").unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[roles]]\nname = \"tech\"").unwrap();

        let config = RosterConfig::load(file.path()).unwrap();
        assert_eq!(config.roles[0].name, "tech");
        assert!(config.exclusivity_groups.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let config = RosterConfig::load_or_default("/nonexistent/path/roster.toml").unwrap();
        assert_eq!(config, RosterConfig::default());

        assert!(RosterConfig::load("/nonexistent/path/roster.toml").is_err());
    }
}
