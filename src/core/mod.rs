//! Core game types and entities

pub mod ability;
pub mod binding;
pub mod entity;
pub mod mana;
pub mod piece;
pub mod player;
pub mod stats;
pub mod target;
pub mod types;

pub use ability::{Ability, AbilityKind, ActivationWindow, Effect, Entailment};
pub use binding::{AbilityRef, Action, Binding, Capability, Subscope};
pub use entity::{arena_get, arena_get_mut, EntityId, GameEntity};
pub use mana::{Color, ResourcePool};
pub use piece::Piece;
pub use player::Player;
pub use stats::StatBlock;
pub use target::{combinations, subsets_in_range, Target, TargetData, TargetFilter, TargetSet};
pub use types::{PieceName, PlayerName, Role, StatKey, StatOp, TeamId, Zone};

/// Index of a player in `Game::players`
pub type PlayerId = EntityId<Player>;

/// Index of a piece in `Game::pieces`
pub type PieceId = EntityId<Piece>;
