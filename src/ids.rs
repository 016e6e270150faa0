//! Identifier and value wrappers shared across the registries and the policy.
//!
//! Identifiers are opaque string handles with value equality. They are the
//! only cross-references between entities (a `Role` stores `OperationId`s,
//! never `Operation`s), so removing an entity can never leave a dangling
//! Rust reference, only a dangling id that resolution skips.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

/// Reserved project id meaning "all projects". Role assignments made under
/// this id apply in every project during resolution.
const UNIVERSAL_PROJECT: &str = "*";

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved universal-scope project id.
    pub fn universal() -> Self {
        Self(UNIVERSAL_PROJECT.to_string())
    }

    pub fn is_universal(&self) -> bool {
        self.0 == UNIVERSAL_PROJECT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of a user, role, operation or project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text description of a role, operation or project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ids_are_value_equal() {
        assert_eq!(UserId::new("alice"), UserId::new("alice"));
        assert_ne!(UserId::new("alice"), UserId::new("bob"));
        assert_eq!(RoleId::new("editor").to_string(), "editor");
    }

    #[test]
    fn test_ids_work_as_map_keys() {
        let mut map = HashMap::new();
        map.insert(ProjectId::new("p1"), 1);
        map.insert(ProjectId::universal(), 2);
        assert_eq!(map.get(&ProjectId::new("p1")), Some(&1));
        assert_eq!(map.get(&ProjectId::universal()), Some(&2));
    }

    #[test]
    fn test_universal_project_id() {
        assert!(ProjectId::universal().is_universal());
        assert!(!ProjectId::new("p1").is_universal());
        // Two calls produce the same key
        assert_eq!(ProjectId::universal(), ProjectId::universal());
    }

    #[test]
    fn test_ids_serialize_as_bare_strings() {
        let id = OperationId::new("write");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"write\"");
        let back: OperationId = serde_json::from_str("\"write\"").unwrap();
        assert_eq!(back, id);
    }
}
