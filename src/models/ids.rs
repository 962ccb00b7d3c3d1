//! Identifier types
//!
//! Savings goals are named by configuration (`"sav_emergency"`), so their IDs
//! are plain strings. Allocation runs get a random UUID for the audit log.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a savings goal, as written in the goals configuration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GoalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of one allocation run applied through the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_id_display() {
        let id = GoalId::from("sav_london");
        assert_eq!(id.to_string(), "sav_london");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sav_london\"");
    }

    #[test]
    fn test_run_id_display_prefix() {
        let id = RunId::new();
        let display = id.to_string();
        assert!(display.starts_with("run-"));
        assert_eq!(display.len(), 12);
        assert_ne!(RunId::new(), id);
    }
}
