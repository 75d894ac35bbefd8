//! Player representation

use crate::core::{GameEntity, PlayerId, PlayerName, ResourcePool, StatBlock, StatKey, TeamId};
use serde::{Deserialize, Serialize};

/// Represents a participant in the game
///
/// A player's pieces are not stored here; they are a filtered view over
/// `Game::pieces` by ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Index of this player in `Game::players`
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Team for ally/enemy targeting
    pub team: TeamId,

    /// Named stats ("hp", "strength", "magic", ...)
    pub stats: StatBlock,

    /// Transient resources, emptied at the end of every step
    pub resource_pool: ResourcePool,

    /// Lands played this turn (reset at end of turn)
    pub lands_played_this_turn: u8,

    /// Cards currently held (hand contents are not modelled)
    pub hand_size: usize,

    /// Maximum hand size enforced during cleanup
    pub max_hand_size: usize,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, team: TeamId, stats: StatBlock) -> Self {
        Player {
            id,
            name: name.into(),
            team,
            stats,
            resource_pool: ResourcePool::new(),
            lands_played_this_turn: 0,
            hand_size: 0,
            max_hand_size: 7,
        }
    }

    /// Current health, as watched by the state-based action loop
    pub fn health(&self) -> i32 {
        self.stats.get_or_zero(&StatKey::health())
    }

    /// How many cards cleanup must discard
    pub fn n_to_discard(&self) -> usize {
        self.hand_size.saturating_sub(self.max_hand_size)
    }

    pub fn empty_resource_pool(&mut self) {
        self.resource_pool.clear();
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
