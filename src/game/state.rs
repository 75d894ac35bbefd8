//! Main game state structure

use crate::core::{
    arena_get, arena_get_mut, Ability, AbilityRef, Action, Binding, Capability, Piece, PieceId,
    Player, PlayerId, Role, StatBlock, StatKey, Target,
};
use crate::game::combat::{CombatState, DamageSubEvent};
use crate::game::{GameConfig, GameEndReason, GameLogger, Step, TurnBasedAction};
use crate::{Result, RulesError};
use rustc_hash::FxHashSet;

/// Complete game state
///
/// Owns every player and piece; everything else refers to them by ID.
#[derive(Debug)]
pub struct Game {
    /// All players, indexed by `PlayerId`
    pub players: Vec<Player>,

    /// All pieces, indexed by `PieceId`
    pub pieces: Vec<Piece>,

    /// Pending bindings, resolved last-in first-out
    pub stack: Vec<Binding>,

    /// Triggered bindings waiting to be moved onto the stack
    pub limbo: Vec<Binding>,

    /// Index into `players` of the active player
    pub active_idx: usize,

    /// Extra turns owed to the current active player
    pub n_extra_turns: u32,

    /// Damage computed this combat damage step, not yet dealt
    pub preliminary_damage_events: Vec<DamageSubEvent>,

    pub combat: CombatState,

    /// Step being executed, `None` between turns
    pub current_step: Option<Step>,

    /// Turns started so far
    pub turn_number: u32,

    pub config: GameConfig,

    pub logger: GameLogger,

    /// Single-use abilities that have resolved
    spent_abilities: FxHashSet<AbilityRef>,

    /// Set once, never cleared
    end_reason: Option<GameEndReason>,
}

impl Game {
    /// Build a game from players and pieces
    ///
    /// IDs must match arena positions. Players without a health stat get
    /// `config.starting_health`.
    pub fn new(mut players: Vec<Player>, pieces: Vec<Piece>, config: GameConfig) -> Result<Self> {
        config.validate(players.len())?;
        for (i, player) in players.iter_mut().enumerate() {
            if player.id.index() != i {
                return Err(RulesError::Config(format!(
                    "player '{}' has id {} but sits at index {i}",
                    player.name, player.id
                )));
            }
            if !player.stats.contains(&StatKey::health()) {
                player.stats.set(StatKey::health(), config.starting_health);
            }
            player.max_hand_size = config.max_hand_size;
        }
        for (i, piece) in pieces.iter().enumerate() {
            if piece.id.index() != i {
                return Err(RulesError::Config(format!(
                    "piece '{}' has id {} but sits at index {i}",
                    piece.name, piece.id
                )));
            }
            if piece.owner.index() >= players.len() {
                return Err(RulesError::Config(format!(
                    "piece '{}' is owned by unknown player {}",
                    piece.name, piece.owner
                )));
            }
        }

        let n = players.len();
        // The first turn hands the turn to the next player, so start one behind
        let active_idx = (config.starting_player + n - 1) % n;

        Ok(Game {
            players,
            pieces,
            stack: Vec::new(),
            limbo: Vec::new(),
            active_idx,
            n_extra_turns: 0,
            preliminary_damage_events: Vec::new(),
            combat: CombatState::new(),
            current_step: None,
            turn_number: 0,
            config,
            logger: GameLogger::new(),
            spent_abilities: FxHashSet::default(),
            end_reason: None,
        })
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        arena_get(&self.players, id, "player")
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        arena_get_mut(&mut self.players, id, "player")
    }

    pub fn get_piece(&self, id: PieceId) -> Result<&Piece> {
        arena_get(&self.pieces, id, "piece")
    }

    pub fn get_piece_mut(&mut self, id: PieceId) -> Result<&mut Piece> {
        arena_get_mut(&mut self.pieces, id, "piece")
    }

    pub fn ability(&self, r: AbilityRef) -> Result<&Ability> {
        self.get_piece(r.piece)?
            .abilities
            .get(r.index)
            .ok_or_else(|| RulesError::EntityNotFound(format!("ability {} of piece {}", r.index, r.piece)))
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.get_player(id)
            .map(|p| format!("Player {}", p.name))
            .unwrap_or_else(|_| format!("<unknown player {id}>"))
    }

    pub fn piece_name(&self, id: PieceId) -> String {
        self.get_piece(id)
            .map(|p| format!("{} ({})", p.name, p.id))
            .unwrap_or_else(|_| format!("<unknown piece {id}>"))
    }

    pub fn describe_target(&self, target: Target) -> String {
        match target {
            Target::Player(id) => self.player_name(id),
            Target::Piece(id) => self.piece_name(id),
        }
    }

    /// Stat block of a player or piece, for stat effects
    pub fn stats_of_mut(&mut self, target: Target) -> Result<&mut StatBlock> {
        match target {
            Target::Player(id) => Ok(&mut self.get_player_mut(id)?.stats),
            Target::Piece(id) => Ok(&mut self.get_piece_mut(id)?.stats),
        }
    }

    pub fn active_player(&self) -> PlayerId {
        self.players[self.active_idx].id
    }

    /// The player after the active one in seating order
    pub fn non_active_idx(&self) -> usize {
        (self.active_idx + 1) % self.players.len()
    }

    pub fn non_active_player(&self) -> PlayerId {
        self.players[self.non_active_idx()].id
    }

    /// Resolve a role against the current active player
    pub fn player_for(&self, role: Role) -> PlayerId {
        match role {
            Role::Active => self.active_player(),
            Role::NonActive => self.non_active_player(),
        }
    }

    pub fn swap_active_player(&mut self) {
        self.active_idx = self.non_active_idx();
    }

    /// Pieces owned by `player`, in arena order
    pub fn pieces_of(&self, player: PlayerId) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.owner == player)
    }

    pub fn owner_of(&self, piece: PieceId) -> Option<PlayerId> {
        self.get_piece(piece).ok().map(|p| p.owner)
    }

    pub fn is_spent(&self, r: AbilityRef) -> bool {
        self.spent_abilities.contains(&r)
    }

    pub fn mark_spent(&mut self, r: AbilityRef) {
        self.spent_abilities.insert(r);
    }

    pub fn is_over(&self) -> bool {
        self.end_reason.is_some()
    }

    pub fn end_reason(&self) -> Option<&GameEndReason> {
        self.end_reason.as_ref()
    }

    /// End the game; the first reason recorded wins
    pub fn end_game(&mut self, reason: GameEndReason) {
        if self.end_reason.is_none() {
            self.logger.event("End of Game.");
            self.end_reason = Some(reason);
        }
    }

    /// Players whose health is above the loss threshold
    pub fn surviving_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.health() > self.config.loss_threshold)
            .map(|p| p.id)
            .collect()
    }

    /// Queue a triggered binding; the SBA loop moves it onto the stack
    pub fn trigger(&mut self, binding: Binding) {
        self.limbo.push(binding);
    }

    /// Every legal binding for `player`, the pass sentinel first
    pub fn solve_legals(&self, player: PlayerId) -> Result<Vec<Binding>> {
        let mut bindings = vec![Binding::pass(player)];
        for piece in self.pieces_of(player) {
            for index in 0..piece.abilities.len() {
                let action = Action::Ability(AbilityRef::new(piece.id, index));
                if !action.is_live(self, player) {
                    continue;
                }
                for subscope in action.solve_subscopes(self, player)? {
                    bindings.push(Binding::new(player, action, subscope));
                }
            }
        }
        Ok(bindings)
    }

    /// Options for a turn-based action
    ///
    /// Never empty: with nothing to choose, the pass sentinel is the only
    /// option. Declarations that may be declined also offer it, last.
    pub fn solve_tba_bindings(&self, tba: TurnBasedAction, player: PlayerId) -> Result<Vec<Binding>> {
        let action = Action::Tba(tba);
        let mut bindings: Vec<Binding> = action
            .solve_subscopes(self, player)?
            .into_iter()
            .map(|subscope| Binding::new(player, action, subscope))
            .collect();
        if bindings.is_empty() || tba.may_decline() {
            bindings.push(Binding::pass(player));
        }
        Ok(bindings)
    }

    /// Deal every pending damage subevent as one batch, then forget them
    pub fn apply_damage_events(&mut self) -> Result<()> {
        let batch = std::mem::take(&mut self.preliminary_damage_events);
        for event in batch {
            let deathtouch = self.get_piece(event.source)?.has_deathtouch;
            match event.target {
                Target::Player(id) => {
                    self.get_player_mut(id)?
                        .stats
                        .adjust(&StatKey::health(), -event.amount);
                }
                Target::Piece(id) => {
                    let victim = self.get_piece_mut(id)?;
                    victim.marked_damage += event.amount;
                    if deathtouch {
                        victim.touched_by_death = true;
                    }
                }
            }
            let source = self.piece_name(event.source);
            let victim = self.describe_target(event.target);
            self.logger
                .combat(&format!("{source} dealt {} damage to {victim}!", event.amount));
        }
        Ok(())
    }
}
