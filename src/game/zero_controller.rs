//! Zero controller for testing and automation
//!
//! Always answers with the first option. For priority decisions that is the
//! pass sentinel; for turn-based actions it is the first enumerated choice.
//! Useful for running games without interaction and for benchmarking.

use crate::core::{Binding, PlayerId};
use crate::game::controller::{GameStateView, PlayerController};

/// A controller that always chooses index 0
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(&mut self, _view: &GameStateView, _options: &[Binding]) -> usize {
        0
    }

    fn choose_option(&mut self, _view: &GameStateView, _options: &[Binding]) -> usize {
        0
    }
}
