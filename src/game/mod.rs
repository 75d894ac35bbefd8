//! Core game state and turn structure

pub mod combat;
pub mod config;
pub mod controller;
pub mod demo;
pub mod game_loop;
pub mod logger;
pub mod phase;
pub mod priority;
pub mod random_controller;
pub mod sba;
pub mod scripted_controller;
pub mod state;
pub mod tba;
pub mod turn;
pub mod zero_controller;

pub use combat::{
    AttackDeclaration, BlockDeclaration, CombatState, DamageOrderDeclaration, DamageSubEvent,
};
pub use config::GameConfig;
pub use controller::{GameStateView, PlayerController};
pub use game_loop::{run, GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{Channel, GameLogger, LogEntry, OutputFormat, OutputMode};
pub use phase::{Epoch, Phase, Step, TbaSlot, EPOCHS};
pub use priority::{PriorityDecision, PriorityState, PriorityStep};
pub use random_controller::RandomController;
pub use scripted_controller::ScriptedController;
pub use state::Game;
pub use tba::TurnBasedAction;
pub use zero_controller::ZeroController;
