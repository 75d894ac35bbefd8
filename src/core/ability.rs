//! Abilities, effects and entailments
//!
//! An `Ability` is a capability descriptor hosted by a piece: an optional
//! `Effect` (how state changes), an optional `TargetData` (what it may be aimed
//! at) and an `ActivationWindow` (when it is live). Card-specific behavior
//! plugs in through the `Entailment` trait.

use crate::core::{PlayerId, StatKey, StatOp, Target, TargetData, TargetSet, Zone};
use crate::game::{Game, Step};
use crate::{Result, RulesError};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::rc::Rc;

/// Opaque state change applied to one victim
///
/// Implement this for card content the engine does not model.
pub trait Entailment {
    fn name(&self) -> &str;

    fn apply(&self, game: &mut Game, actor: PlayerId, victim: Target) -> Result<()>;
}

/// How an ability changes state, per victim
#[derive(Clone)]
pub enum Effect {
    /// `victim.victim_stat = op(victim.victim_stat, actor.actor_stat)`
    Stat {
        actor_stat: StatKey,
        victim_stat: StatKey,
        op: StatOp,
    },
    /// Pluggable behavior
    Custom(Rc<dyn Entailment>),
}

impl Effect {
    pub fn stat(actor_stat: impl Into<StatKey>, victim_stat: impl Into<StatKey>, op: StatOp) -> Self {
        Effect::Stat {
            actor_stat: actor_stat.into(),
            victim_stat: victim_stat.into(),
            op,
        }
    }

    pub fn apply(&self, game: &mut Game, actor: PlayerId, victim: Target) -> Result<()> {
        match self {
            Effect::Stat {
                actor_stat,
                victim_stat,
                op,
            } => {
                let operand = game.get_player(actor)?.stats.get(actor_stat)?;
                let stats = game.stats_of_mut(victim)?;
                let old = stats.get_or_zero(victim_stat);
                let new = op.apply(old, operand);
                stats.set(victim_stat.clone(), new);
                let victim_name = game.describe_target(victim);
                game.logger
                    .event(&format!("{victim_name}'s {victim_stat} {old} ---> {new}"));
                Ok(())
            }
            Effect::Custom(entailment) => entailment.apply(game, actor, victim),
        }
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Stat {
                actor_stat,
                victim_stat,
                op,
            } => f
                .debug_struct("Stat")
                .field("actor_stat", actor_stat)
                .field("victim_stat", victim_stat)
                .field("op", op)
                .finish(),
            Effect::Custom(entailment) => write!(f, "Custom({})", entailment.name()),
        }
    }
}

/// Whether activating the ability uses the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    /// Pushed onto the stack, resolves when both players pass
    Stack,
    /// Special action: applied immediately, the actor keeps priority
    Special,
}

/// When an ability may be activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationWindow {
    /// Zones the host piece must be in
    pub zones: SmallVec<[Zone; 2]>,
    /// Steps during which the ability is live
    pub steps: SmallVec<[Step; 2]>,
    /// Host's owner must be the active player
    pub must_be_actors_turn: bool,
    /// Live only while the stack holds at most this many entries
    pub max_stack_size: usize,
    /// Once resolved, the ability is never offered again this game
    pub single_use: bool,
}

impl Default for ActivationWindow {
    /// Sorcery timing: main phases, own turn, empty stack
    fn default() -> Self {
        ActivationWindow {
            zones: smallvec![Zone::Battlefield],
            steps: smallvec![Step::PrecombatMain, Step::PostcombatMain],
            must_be_actors_turn: true,
            max_stack_size: 0,
            single_use: false,
        }
    }
}

impl ActivationWindow {
    /// Instant timing: any step, either player's turn, any stack depth
    pub fn instant() -> Self {
        ActivationWindow {
            steps: Step::ALL.iter().copied().collect(),
            must_be_actors_turn: false,
            max_stack_size: usize::MAX,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ability {
    pub name: String,
    pub kind: AbilityKind,
    pub effect: Option<Effect>,
    pub target: Option<TargetData>,
    pub window: ActivationWindow,
}

impl Ability {
    /// A stack-using ability with sorcery timing
    pub fn new(name: impl Into<String>, effect: Effect, target: TargetData) -> Self {
        Ability {
            name: name.into(),
            kind: AbilityKind::Stack,
            effect: Some(effect),
            target: Some(target),
            window: ActivationWindow::default(),
        }
    }

    /// A special action that bypasses the stack
    pub fn special(name: impl Into<String>, effect: Effect, target: TargetData) -> Self {
        Ability {
            kind: AbilityKind::Special,
            ..Self::new(name, effect, target)
        }
    }

    pub fn with_window(mut self, window: ActivationWindow) -> Self {
        self.window = window;
        self
    }

    pub fn uses_stack(&self) -> bool {
        self.kind == AbilityKind::Stack
    }

    /// Enumerate target sets; an ability without a target rule is a wiring error
    pub fn solve_target_sets(
        &self,
        actor: PlayerId,
        game: &Game,
    ) -> Result<Vec<TargetSet>> {
        let target = self
            .target
            .as_ref()
            .ok_or_else(|| RulesError::MissingTargetRule(self.name.clone()))?;
        Ok(target.solve(actor, &game.players, &game.pieces))
    }

    /// Apply the effect to each victim in order
    pub fn apply(&self, game: &mut Game, actor: PlayerId, victims: &[Target]) -> Result<()> {
        let actor_name = game.player_name(actor);
        game.logger.event(&format!("{actor_name} used {}", self.name));
        if let Some(effect) = &self.effect {
            for &victim in victims {
                let victim_name = game.describe_target(victim);
                game.logger
                    .event(&format!("{actor_name} used {} against {victim_name}", self.name));
                effect.apply(game, actor, victim)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
