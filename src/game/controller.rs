//! Player controller trait and game state view
//!
//! This module defines the interface between the engine and whoever makes
//! decisions (AI, script or human). The engine offers a list of bindings and
//! the controller answers with an index into it. The view gives read-only
//! access to the state the decision is made in.

use crate::core::{Binding, Piece, PieceId, PlayerId, Target};
use crate::game::{Game, Step};

/// Read-only view of game state for controllers
pub struct GameStateView<'a> {
    game: &'a Game,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a Game, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    /// The player this view is for
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn active_player(&self) -> PlayerId {
        self.game.active_player()
    }

    pub fn current_step(&self) -> Option<Step> {
        self.game.current_step
    }

    pub fn turn_number(&self) -> u32 {
        self.game.turn_number
    }

    pub fn stack_size(&self) -> usize {
        self.game.stack.len()
    }

    pub fn health(&self, player: PlayerId) -> i32 {
        self.game.get_player(player).map(|p| p.health()).unwrap_or(0)
    }

    /// Pieces this view's player owns
    pub fn my_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.game.pieces_of(self.player_id)
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.game.get_piece(id).ok()
    }

    pub fn player_name(&self, player: PlayerId) -> String {
        self.game.player_name(player)
    }

    pub fn describe_target(&self, target: Target) -> String {
        self.game.describe_target(target)
    }

    /// One-line description of a binding, as shown in choice menus
    pub fn describe(&self, binding: &Binding) -> String {
        binding.describe(self.game)
    }

    pub fn logger(&self) -> &crate::game::GameLogger {
        &self.game.logger
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players or connect to UI. Both choice
/// methods receive a non-empty option list and return an index into it;
/// an out-of-range index is re-asked a bounded number of times and then
/// rejected as an illegal decision.
pub trait PlayerController {
    /// Get the player ID this controller is responsible for
    fn player_id(&self) -> PlayerId;

    /// Choose what to do with priority
    ///
    /// `options[0]` is always the pass sentinel.
    fn choose_action(&mut self, view: &GameStateView, options: &[Binding]) -> usize;

    /// Choose how to perform a turn-based action
    fn choose_option(&mut self, view: &GameStateView, options: &[Binding]) -> usize;

    /// Called when this controller passed priority (for logging/debugging)
    fn on_priority_passed(&mut self, _view: &GameStateView) {}

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
