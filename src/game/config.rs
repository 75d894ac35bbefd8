//! Engine configuration
//!
//! Every safety ceiling the engine enforces lives here so that a long game
//! fails with a diagnosable error instead of spinning forever.

use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Health every player starts with when a scenario does not set it
    pub starting_health: i32,

    /// A player whose health is at or below this value loses
    pub loss_threshold: i32,

    /// Turns to play before the game is stopped as a draw
    pub max_turns: u32,

    /// Decisions allowed in one priority round before it is declared runaway
    pub max_priority_iterations: usize,

    /// Passes of the state-based action loop before it is declared runaway
    pub max_sba_iterations: usize,

    /// How often a controller may return an out-of-range choice before the
    /// decision is rejected as illegal
    pub max_reprompts: usize,

    /// Index of the player who takes the first turn
    pub starting_player: usize,

    /// Hand size enforced during cleanup
    pub max_hand_size: usize,

    /// Jump from Declare Attackers straight to End of Combat when nobody attacked
    pub skip_empty_combat: bool,

    /// Seed for controllers that make random choices
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_health: 2,
            loss_threshold: 0,
            max_turns: 20,
            max_priority_iterations: 1000,
            max_sba_iterations: 256,
            max_reprompts: 3,
            starting_player: 0,
            max_hand_size: 7,
            skip_empty_combat: false,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Read a JSON config; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_starting_player(mut self, idx: usize) -> Self {
        self.starting_player = idx;
        self
    }

    pub fn with_skip_empty_combat(mut self, enabled: bool) -> Self {
        self.skip_empty_combat = enabled;
        self
    }

    /// Reject zero ceilings and a starting player outside `0..n_players`
    pub fn validate(&self, n_players: usize) -> Result<()> {
        if self.max_priority_iterations == 0 {
            return Err(RulesError::Config(
                "max_priority_iterations must be positive".to_string(),
            ));
        }
        if self.max_sba_iterations == 0 {
            return Err(RulesError::Config(
                "max_sba_iterations must be positive".to_string(),
            ));
        }
        if self.max_turns == 0 {
            return Err(RulesError::Config("max_turns must be positive".to_string()));
        }
        if n_players < 2 {
            return Err(RulesError::Config(format!(
                "a game needs at least two players, got {n_players}"
            )));
        }
        if self.starting_player >= n_players {
            return Err(RulesError::Config(format!(
                "starting_player {} out of range for {n_players} players",
                self.starting_player
            )));
        }
        Ok(())
    }
}
