//! Game loop implementation
//!
//! Manages the main game loop: turn order, extra turns, the turn cap and
//! the final result. Turn execution lives in `turn`, priority in `priority`.

use crate::core::{Piece, Player, PlayerId};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::{Game, GameConfig};
use crate::{Result, RulesError};

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns, steps, and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - engine bookkeeping such as priority passes and SBA checks
    Verbose = 3,
    /// Debug - everything, including controller choices
    Debug = 4,
}

impl std::str::FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "0" | "silent" => Ok(VerbosityLevel::Silent),
            "1" | "minimal" => Ok(VerbosityLevel::Minimal),
            "2" | "normal" => Ok(VerbosityLevel::Normal),
            "3" | "verbose" => Ok(VerbosityLevel::Verbose),
            "4" | "debug" => Ok(VerbosityLevel::Debug),
            other => Err(format!("unknown verbosity '{other}'")),
        }
    }
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Winner of the game (None if draw or game didn't complete)
    pub winner: Option<PlayerId>,
    /// Total number of turns played
    pub turns_played: u32,
    /// Reason the game ended
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// A player's health fell to the loss threshold
    PlayerDefeated(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
    /// The engine hit a fatal error; the message is the error's
    EngineFault(String),
}

/// Game loop manager
///
/// Handles turn progression and win condition checking
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut Game,
    /// Maximum turns before forcing a draw
    max_turns: u32,
    /// Turn counter for the loop
    turns_elapsed: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    /// Create a new game loop for the given game state
    pub fn new(game: &'a mut Game) -> Self {
        let verbosity = game.logger.verbosity();
        let max_turns = game.config.max_turns;
        GameLoop {
            game,
            max_turns,
            turns_elapsed: 0,
            verbosity,
        }
    }

    /// Set maximum turns before forcing a draw
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    pub fn turns_elapsed(&self) -> u32 {
        self.turns_elapsed
    }

    /// Run the game until it ends or the turn cap is reached
    ///
    /// Every player needs exactly one controller. A fatal error ends the
    /// game with [`GameEndReason::EngineFault`] and is then returned.
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        for player in &self.game.players {
            if !controllers.iter().any(|c| c.player_id() == player.id) {
                return Err(RulesError::ControllerMissing(self.game.player_name(player.id)));
            }
        }

        self.game.logger.event("Start of Game.");

        while !self.game.is_over() {
            if self.turns_elapsed >= self.max_turns {
                self.game.logger.event(&format!(
                    "Turn limit of {} reached; stopping.",
                    self.max_turns
                ));
                self.game.end_game(GameEndReason::TurnLimit);
                break;
            }

            let intended_idx = self.next_turn_index();
            if let Err(err) = self.run_turn(intended_idx, controllers) {
                self.game.logger.minimal(&format!("Engine fault: {err}"));
                self.game.end_game(GameEndReason::EngineFault(err.to_string()));
                return Err(err);
            }
            self.turns_elapsed += 1;
        }

        let result = self.result();
        self.announce_result(&result, controllers);
        Ok(result)
    }

    /// Index of the player who takes the next turn
    ///
    /// An owed extra turn keeps the current active player.
    fn next_turn_index(&mut self) -> usize {
        if self.game.n_extra_turns > 0 && self.game.turn_number > 0 {
            self.game.n_extra_turns -= 1;
            self.game.logger.engine(&format!(
                "{} takes an extra turn.",
                self.game.player_name(self.game.active_player())
            ));
            self.game.active_idx
        } else {
            self.game.swap_active_player();
            self.game.active_idx
        }
    }

    fn result(&self) -> GameResult {
        let end_reason = self
            .game
            .end_reason()
            .cloned()
            .unwrap_or(GameEndReason::TurnLimit);
        let winner = match end_reason {
            GameEndReason::PlayerDefeated(_) => match self.game.surviving_players().as_slice() {
                [survivor] => Some(*survivor),
                _ => None,
            },
            _ => None,
        };
        GameResult {
            winner,
            turns_played: self.turns_elapsed,
            end_reason,
        }
    }

    fn announce_result(&self, result: &GameResult, controllers: &mut [Box<dyn PlayerController>]) {
        let logger = &self.game.logger;
        match (&result.end_reason, result.winner) {
            (_, Some(winner)) => logger.minimal(&format!(
                "{} wins after {} turn(s).",
                self.game.player_name(winner),
                result.turns_played
            )),
            (GameEndReason::PlayerDefeated(loser), None) => logger.minimal(&format!(
                "{} was defeated; no single survivor.",
                self.game.player_name(*loser)
            )),
            (GameEndReason::TurnLimit, None) => logger.minimal(&format!(
                "Draw: turn limit reached after {} turn(s).",
                result.turns_played
            )),
            (GameEndReason::EngineFault(msg), None) => logger.minimal(&format!("Aborted: {msg}")),
        }

        for controller in controllers.iter_mut() {
            let id = controller.player_id();
            let view = GameStateView::new(&*self.game, id);
            controller.on_game_end(&view, result.winner == Some(id));
        }
    }
}

/// Build a game from `players` and `pieces` and play it out
pub fn run(
    players: Vec<Player>,
    pieces: Vec<Piece>,
    controllers: &mut [Box<dyn PlayerController>],
    config: GameConfig,
) -> Result<GameResult> {
    let mut game = Game::new(players, pieces, config)?;
    let mut game_loop = GameLoop::new(&mut game);
    game_loop.run_game(controllers)
}
