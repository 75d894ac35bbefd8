//! Turn-based actions
//!
//! Actions the game performs at fixed points of a step. Each one is bound to
//! a role in the epoch table; the role is resolved to a player only when the
//! action runs. A turn-based action with nothing to choose offers only the
//! pass sentinel.

use crate::core::{
    Capability, PieceId, PlayerId, Subscope, Target, TargetData, TargetFilter, TargetSet,
};
use crate::game::combat::{self, DamageSubEvent};
use crate::game::Game;
use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnBasedAction {
    /// Untap the actor's tapped pieces that are allowed to untap
    Untap,
    /// Toggle the phased state of the actor's pieces with phasing
    Phasing,
    /// Draw a card (libraries are not modelled)
    Draw,
    /// Add lore counters to sagas (sagas are not modelled)
    SagaLoreCounters,
    /// Pick the opponent this combat attacks
    ChooseDefendingOpponent,
    DeclareAttackers,
    DeclareBlockers,
    /// Order the blockers of each blocked attacker
    AttackerDamageOrder,
    /// Order the attackers of each blocker
    BlockerDamageOrder,
    AttackerAssignCombatDamage,
    BlockerAssignCombatDamage,
    /// Compute every combatant's damage, then deal it all at once
    CombatDamageDealt,
    /// Discard down to maximum hand size
    MaintainLegalHandSize,
    /// Clear marked damage; until-end-of-turn effects expire
    RemoveDamageAndExpireEffects,
    EmptyResourcePool,
}

impl TurnBasedAction {
    pub fn name(self) -> &'static str {
        match self {
            TurnBasedAction::Untap => "TBA_Untap",
            TurnBasedAction::Phasing => "TBA_Phasing",
            TurnBasedAction::Draw => "TBA_Draw",
            TurnBasedAction::SagaLoreCounters => "TBA_SagaLoreCounters",
            TurnBasedAction::ChooseDefendingOpponent => "TBA_ChooseDefendingOpponent",
            TurnBasedAction::DeclareAttackers => "TBA_DeclareAttackers",
            TurnBasedAction::DeclareBlockers => "TBA_DeclareBlockers",
            TurnBasedAction::AttackerDamageOrder => "TBA_AttackerDamageOrder",
            TurnBasedAction::BlockerDamageOrder => "TBA_BlockerDamageOrder",
            TurnBasedAction::AttackerAssignCombatDamage => "TBA_AttackerAssignCombatDamage",
            TurnBasedAction::BlockerAssignCombatDamage => "TBA_BlockerAssignCombatDamage",
            TurnBasedAction::CombatDamageDealt => "TBA_CombatDamageDealt",
            TurnBasedAction::MaintainLegalHandSize => "TBA_MaintainLegalHandSize",
            TurnBasedAction::RemoveDamageAndExpireEffects => "TBA_RemoveDamageAndExpireEffects",
            TurnBasedAction::EmptyResourcePool => "TBA_EmptyResourcePool",
        }
    }

    /// Declaring no attackers or no blockers is always allowed, so the pass
    /// sentinel is offered next to the real declarations
    pub fn may_decline(self) -> bool {
        matches!(
            self,
            TurnBasedAction::DeclareAttackers | TurnBasedAction::DeclareBlockers
        )
    }

    fn mismatch(self, expected: &'static str) -> RulesError {
        RulesError::SubscopeMismatch {
            action: self.name().to_string(),
            expected,
        }
    }
}

fn piece_targets(ids: impl IntoIterator<Item = PieceId>) -> TargetSet {
    ids.into_iter().map(Target::Piece).collect()
}

fn expect_pieces(targets: &[Target]) -> impl Iterator<Item = PieceId> + '_ {
    targets.iter().filter_map(|t| match t {
        Target::Piece(id) => Some(*id),
        Target::Player(_) => None,
    })
}

impl Capability for TurnBasedAction {
    fn label(&self, _game: &Game) -> String {
        self.name().to_string()
    }

    fn is_live(&self, _game: &Game, _actor: PlayerId) -> bool {
        true
    }

    fn solve_subscopes(&self, game: &Game, actor: PlayerId) -> Result<Vec<Subscope>> {
        let subscopes = match self {
            TurnBasedAction::Untap => vec![Subscope::Targets(piece_targets(
                game.pieces_of(actor)
                    .filter(|p| p.can_untap && p.tapped)
                    .map(|p| p.id),
            ))],
            TurnBasedAction::Phasing => vec![Subscope::Targets(piece_targets(
                game.pieces_of(actor).filter(|p| p.has_phasing).map(|p| p.id),
            ))],
            TurnBasedAction::Draw
            | TurnBasedAction::SagaLoreCounters
            | TurnBasedAction::AttackerAssignCombatDamage
            | TurnBasedAction::BlockerAssignCombatDamage => Vec::new(),
            TurnBasedAction::ChooseDefendingOpponent => {
                TargetData::single(TargetFilter::OtherPlayers)
                    .solve(actor, &game.players, &game.pieces)
                    .into_iter()
                    .map(Subscope::Targets)
                    .collect()
            }
            TurnBasedAction::DeclareAttackers => {
                let Some(defender) = game.combat.defender_of(actor) else {
                    return Ok(Vec::new());
                };
                let attackers: Vec<_> = game.pieces_of(actor).filter(|p| p.can_attack()).collect();
                let mut attackables = vec![Target::Player(defender)];
                attackables.extend(
                    game.pieces_of(defender)
                        .filter(|p| p.is_planeswalker && !p.phased_out)
                        .map(|p| Target::Piece(p.id)),
                );
                combat::declare_attackers(&attackers, &attackables)
                    .into_iter()
                    .map(Subscope::Attack)
                    .collect()
            }
            TurnBasedAction::DeclareBlockers => {
                let planeswalkers: Vec<PieceId> = game
                    .pieces_of(actor)
                    .filter(|p| p.is_planeswalker)
                    .map(|p| p.id)
                    .collect();
                let attackers = game.combat.attackers_against(actor, &planeswalkers);
                let blockers: Vec<_> = game.pieces_of(actor).filter(|p| p.can_block()).collect();
                combat::declare_blockers(&attackers, &blockers)
                    .into_iter()
                    .map(Subscope::Block)
                    .collect()
            }
            TurnBasedAction::AttackerDamageOrder => {
                let relation: Vec<(PieceId, Vec<PieceId>)> = game
                    .combat
                    .attacker_blockers
                    .iter()
                    .filter(|(a, _)| game.owner_of(**a) == Some(actor))
                    .map(|(a, bs)| (*a, bs.to_vec()))
                    .collect();
                damage_orders(&relation)
            }
            TurnBasedAction::BlockerDamageOrder => {
                let relation: Vec<(PieceId, Vec<PieceId>)> = game
                    .combat
                    .blockers
                    .iter()
                    .filter(|(b, _)| game.owner_of(**b) == Some(actor))
                    .map(|(b, attackers)| (*b, attackers.to_vec()))
                    .collect();
                damage_orders(&relation)
            }
            TurnBasedAction::CombatDamageDealt => {
                if game.combat.attackers.is_empty() {
                    Vec::new()
                } else {
                    vec![Subscope::Targets(piece_targets(
                        game.pieces.iter().map(|p| p.id),
                    ))]
                }
            }
            TurnBasedAction::MaintainLegalHandSize => {
                if game.get_player(actor)?.n_to_discard() == 0 {
                    Vec::new()
                } else {
                    vec![Subscope::Empty]
                }
            }
            TurnBasedAction::RemoveDamageAndExpireEffects => vec![Subscope::Targets(piece_targets(
                game.pieces.iter().map(|p| p.id),
            ))],
            TurnBasedAction::EmptyResourcePool => {
                vec![Subscope::Targets(smallvec::smallvec![Target::Player(actor)])]
            }
        };
        Ok(subscopes)
    }

    fn apply(&self, game: &mut Game, actor: PlayerId, subscope: &Subscope) -> Result<()> {
        let actor_name = game.player_name(actor);
        match (self, subscope) {
            (TurnBasedAction::Untap, Subscope::Targets(targets)) => {
                for id in expect_pieces(targets) {
                    game.get_piece_mut(id)?.untap();
                    let piece_name = game.piece_name(id);
                    game.logger
                        .event(&format!("{actor_name} untapped {piece_name}."));
                }
            }
            (TurnBasedAction::Phasing, Subscope::Targets(targets)) => {
                for id in expect_pieces(targets) {
                    let piece = game.get_piece_mut(id)?;
                    piece.phased_out = !piece.phased_out;
                    let verb = if piece.phased_out { "phased out" } else { "phased in" };
                    let piece_name = game.piece_name(id);
                    game.logger.event(&format!("{piece_name} {verb}."));
                }
            }
            (TurnBasedAction::ChooseDefendingOpponent, Subscope::Targets(targets)) => {
                for target in targets.iter() {
                    let Target::Player(defender) = *target else {
                        return Err(self.mismatch("a player"));
                    };
                    game.combat.choose_defender(actor, defender);
                    let defender_name = game.player_name(defender);
                    game.logger
                        .combat(&format!("{actor_name} is attacking {defender_name}."));
                    game.logger
                        .combat(&format!("{defender_name} is now the defending player."));
                }
            }
            (TurnBasedAction::DeclareAttackers, Subscope::Attack(declaration)) => {
                game.logger
                    .combat(&format!("{actor_name} declared {declaration} as attackers."));
                for (attacker, target) in &declaration.pairs {
                    game.combat.declare_attacker(*attacker, *target);
                    game.get_piece_mut(*attacker)?.tap();
                    let attacker_name = game.piece_name(*attacker);
                    let target_name = game.describe_target(*target);
                    game.logger
                        .combat(&format!("{attacker_name} is attacking {target_name}."));
                }
            }
            (TurnBasedAction::DeclareBlockers, Subscope::Block(declaration)) => {
                game.logger
                    .combat(&format!("{actor_name} declared {declaration} as blockers."));
                game.combat.record_blocks(declaration);
                for (blocker, attackers) in &declaration.blocks {
                    let blocker_name = game.piece_name(*blocker);
                    for attacker in attackers {
                        let attacker_name = game.piece_name(*attacker);
                        game.logger
                            .combat(&format!("{blocker_name} is blocking {attacker_name}."));
                    }
                }
            }
            (
                TurnBasedAction::AttackerDamageOrder | TurnBasedAction::BlockerDamageOrder,
                Subscope::DamageOrder(declaration),
            ) => {
                for (piece, order) in &declaration.orders {
                    game.combat.set_damage_order(*piece, order);
                    let piece_name = game.piece_name(*piece);
                    let names: Vec<String> = order.iter().map(|p| game.piece_name(*p)).collect();
                    game.logger.combat(&format!(
                        "{piece_name} will assign combat damage in the following order: [{}].",
                        names.join(", ")
                    ));
                }
            }
            (
                TurnBasedAction::Draw
                | TurnBasedAction::SagaLoreCounters
                | TurnBasedAction::AttackerAssignCombatDamage
                | TurnBasedAction::BlockerAssignCombatDamage,
                _,
            ) => {
                game.logger.engine(&format!("{actor_name} performs {}.", self.name()));
            }
            (TurnBasedAction::CombatDamageDealt, Subscope::Targets(targets)) => {
                game.logger
                    .combat(&format!("{actor_name} is generating damage subevents."));
                let mut batch: Vec<DamageSubEvent> = Vec::new();
                for id in expect_pieces(targets) {
                    let source = game.get_piece(id)?;
                    let order = game.combat.damage_order_for(id);
                    batch.extend(combat::mark_damage(source, &order, &game.pieces));
                }
                game.preliminary_damage_events.extend(batch);
                game.apply_damage_events()?;
            }
            (TurnBasedAction::MaintainLegalHandSize, Subscope::Empty) => {
                let player = game.get_player_mut(actor)?;
                let n = player.n_to_discard();
                player.hand_size -= n;
                game.logger
                    .event(&format!("{actor_name} discarded {n} card(s)."));
            }
            (TurnBasedAction::RemoveDamageAndExpireEffects, Subscope::Targets(targets)) => {
                for id in expect_pieces(targets) {
                    let piece = game.get_piece_mut(id)?;
                    if piece.marked_damage == 0 && !piece.touched_by_death {
                        continue;
                    }
                    piece.clear_marked_damage();
                    let piece_name = game.piece_name(id);
                    game.logger
                        .event(&format!("Removing all damage marked on {piece_name}."));
                }
            }
            (TurnBasedAction::EmptyResourcePool, Subscope::Targets(targets)) => {
                for target in targets.iter() {
                    let Target::Player(id) = *target else {
                        return Err(self.mismatch("a player"));
                    };
                    game.get_player_mut(id)?.empty_resource_pool();
                    let name = game.player_name(id);
                    game.logger.engine(&format!("{name} empties their resource pool."));
                }
            }
            (_, Subscope::Attack(_)) => return Err(self.mismatch("no attacker declaration")),
            (_, Subscope::Block(_)) => return Err(self.mismatch("no blocker declaration")),
            (_, Subscope::DamageOrder(_)) => return Err(self.mismatch("no damage order")),
            (_, Subscope::Targets(_)) => return Err(self.mismatch("no target set")),
            (_, Subscope::Empty) => return Err(self.mismatch("a non-empty subscope")),
        }
        Ok(())
    }
}

fn damage_orders(relation: &[(PieceId, Vec<PieceId>)]) -> Vec<Subscope> {
    if relation.is_empty() {
        return Vec::new();
    }
    combat::damage_assignment_orders(relation)
        .into_iter()
        .map(Subscope::DamageOrder)
        .collect()
}
