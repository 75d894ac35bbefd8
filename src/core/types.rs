//! Strongly-typed wrappers for game concepts
//!
//! This module provides newtypes to prevent type confusion and make the code
//! more self-documenting. Instead of using bare Strings for different concepts,
//! we wrap them in distinct types that cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a stat in a player's or piece's stat block
///
/// Examples: "hp", "strength", "magic"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatKey(String);

impl StatKey {
    pub fn new(s: impl Into<String>) -> Self {
        StatKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The stat the state-based action loop watches
    pub fn health() -> Self {
        StatKey("hp".to_string())
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StatKey {
    fn from(s: &str) -> Self {
        StatKey(s.to_string())
    }
}

/// Piece name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceName(String);

impl PieceName {
    pub fn new(s: impl Into<String>) -> Self {
        PieceName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PieceName {
    fn from(s: String) -> Self {
        PieceName(s)
    }
}

impl From<&str> for PieceName {
    fn from(s: &str) -> Self {
        PieceName(s.to_string())
    }
}

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

/// Team affiliation, used by the ally/enemy target filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u8);

/// Zones a piece can occupy
///
/// Zone contents are not managed by the engine; the zone only gates which
/// abilities are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Zone {
    #[default]
    Battlefield,
    Hand,
    Library,
    Graveyard,
    Exile,
}

/// Role a turn-based action is bound to
///
/// Resolved against the active player at the moment the action runs, not when
/// the step table was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The active player ("AP")
    Active,
    /// The non-active player ("NAP")
    NonActive,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Active => write!(f, "AP"),
            Role::NonActive => write!(f, "NAP"),
        }
    }
}

/// Arithmetic applied by a stat effect: `victim_stat = op(victim_stat, actor_stat)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatOp {
    Add,
    Sub,
}

impl StatOp {
    pub fn apply(self, victim_value: i32, actor_value: i32) -> i32 {
        match self {
            StatOp::Add => victim_value + actor_value,
            StatOp::Sub => victim_value - actor_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_key() {
        assert_eq!(StatKey::health().as_str(), "hp");
        assert_eq!(StatKey::from("magic").to_string(), "magic");
    }

    #[test]
    fn test_stat_op() {
        assert_eq!(StatOp::Add.apply(2, 3), 5);
        assert_eq!(StatOp::Sub.apply(2, 3), -1);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Active.to_string(), "AP");
        assert_eq!(Role::NonActive.to_string(), "NAP");
    }
}
