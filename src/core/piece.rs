//! Pieces: the creatures and permanents players control
//!
//! A piece carries its legal-action state (tapped, phased, sickness) and
//! combat characteristics. Combat *relations* (who attacks or blocks whom)
//! are not stored here; they live in `CombatState` keyed by ID.

use crate::core::{Ability, GameEntity, PieceId, PieceName, PlayerId, StatBlock, Zone};

#[derive(Debug, Clone)]
pub struct Piece {
    /// Index of this piece in `Game::pieces`
    pub id: PieceId,

    pub name: PieceName,

    /// Owning player
    pub owner: PlayerId,

    /// Current controller (can differ from owner)
    pub controller: PlayerId,

    pub zone: Zone,

    pub power: i32,
    pub toughness: i32,

    /// Named stats for stat effects aimed at pieces
    pub stats: StatBlock,

    pub abilities: Vec<Ability>,

    // Type line
    pub is_creature: bool,
    pub is_planeswalker: bool,

    // Keywords
    pub has_deathtouch: bool,
    pub has_haste: bool,
    pub has_phasing: bool,

    // Status
    pub tapped: bool,
    pub phased_out: bool,
    pub can_untap: bool,
    pub controller_changed_this_turn: bool,

    // Damage
    pub marked_damage: i32,
    /// Dealt damage by a deathtouch source since the last cleanup
    pub touched_by_death: bool,

    // Blocking bounds: how many attackers this piece may block at once
    pub min_block_n: usize,
    pub max_block_n: usize,

    // Combat restrictions
    pub cannot_attack: bool,
    pub cannot_attack_alone: bool,
    pub cannot_block: bool,
    pub cannot_block_alone: bool,
}

impl Piece {
    /// Create an untapped creature with no abilities
    pub fn new(
        id: PieceId,
        name: impl Into<PieceName>,
        owner: PlayerId,
        power: i32,
        toughness: i32,
    ) -> Self {
        Piece {
            id,
            name: name.into(),
            owner,
            controller: owner,
            zone: Zone::Battlefield,
            power,
            toughness,
            stats: StatBlock::new(),
            abilities: Vec::new(),
            is_creature: true,
            is_planeswalker: false,
            has_deathtouch: false,
            has_haste: false,
            has_phasing: false,
            tapped: false,
            phased_out: false,
            can_untap: true,
            controller_changed_this_turn: false,
            marked_damage: 0,
            touched_by_death: false,
            min_block_n: 0,
            max_block_n: 1,
            cannot_attack: false,
            cannot_attack_alone: false,
            cannot_block: false,
            cannot_block_alone: false,
        }
    }

    pub fn with_abilities(mut self, abilities: Vec<Ability>) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn has_summoning_sickness(&self) -> bool {
        self.is_creature && !self.has_haste && self.controller_changed_this_turn
    }

    pub fn can_attack(&self) -> bool {
        self.is_creature && !self.has_summoning_sickness() && !self.phased_out && !self.tapped
    }

    pub fn can_block(&self) -> bool {
        self.is_creature && !self.phased_out && !self.tapped
    }

    /// Damage has reached toughness, or a deathtouch source touched it
    pub fn lethally_damaged(&self) -> bool {
        self.touched_by_death || self.marked_damage >= self.toughness
    }

    /// Toughness not yet used up by marked damage
    pub fn remaining_toughness(&self) -> i32 {
        (self.toughness - self.marked_damage).max(0)
    }

    pub fn clear_marked_damage(&mut self) {
        self.marked_damage = 0;
        self.touched_by_death = false;
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }
}

impl GameEntity<Piece> for Piece {
    fn id(&self) -> PieceId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
