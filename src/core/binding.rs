//! Bindings: fully specified, ready-to-apply actions
//!
//! A `Binding` fixes every parameter of an action: who acts, what capability
//! they use, and which target subscope they chose. Bindings are what the
//! engine offers to controllers, what sits on the stack, and what waits in
//! limbo. Applying a binding consumes it, so each one resolves at most once.

use crate::core::{PieceId, PlayerId, Target, TargetSet};
use crate::game::combat::{AttackDeclaration, BlockDeclaration, DamageOrderDeclaration};
use crate::game::{Game, TurnBasedAction};
use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three operations every capability provides
///
/// Implemented by hosted abilities, turn-based actions, and by `Action`,
/// which dispatches over the closed set of both plus the pass sentinel.
pub trait Capability {
    /// Human-readable name for logs and choice menus
    fn label(&self, game: &Game) -> String;

    /// Legality gate: may `actor` use this right now?
    fn is_live(&self, game: &Game, actor: PlayerId) -> bool;

    /// Every legal subscope for `actor` under the current state
    fn solve_subscopes(&self, game: &Game, actor: PlayerId) -> Result<Vec<Subscope>>;

    /// Mutate state according to one chosen subscope
    fn apply(&self, game: &mut Game, actor: PlayerId, subscope: &Subscope) -> Result<()>;
}

/// Address of an ability hosted by a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityRef {
    pub piece: PieceId,
    pub index: usize,
}

impl AbilityRef {
    pub fn new(piece: PieceId, index: usize) -> Self {
        AbilityRef { piece, index }
    }
}

impl Capability for AbilityRef {
    fn label(&self, game: &Game) -> String {
        game.ability(*self)
            .map(|a| a.name.clone())
            .unwrap_or_else(|_| format!("<missing ability {}:{}>", self.piece, self.index))
    }

    fn is_live(&self, game: &Game, actor: PlayerId) -> bool {
        let (Ok(piece), Ok(ability)) = (game.get_piece(self.piece), game.ability(*self)) else {
            return false;
        };
        let window = &ability.window;
        if piece.owner != actor {
            return false;
        }
        if window.single_use && game.is_spent(*self) {
            return false;
        }
        let in_zone = window.zones.contains(&piece.zone);
        let in_step = game
            .current_step
            .map(|step| window.steps.contains(&step))
            .unwrap_or(false);
        let turn_ok = !window.must_be_actors_turn || piece.owner == game.active_player();
        let stack_ok = game.stack.len() <= window.max_stack_size;
        in_zone && in_step && turn_ok && stack_ok
    }

    fn solve_subscopes(&self, game: &Game, actor: PlayerId) -> Result<Vec<Subscope>> {
        let ability = game.ability(*self)?;
        Ok(ability
            .solve_target_sets(actor, game)?
            .into_iter()
            .map(Subscope::Targets)
            .collect())
    }

    fn apply(&self, game: &mut Game, actor: PlayerId, subscope: &Subscope) -> Result<()> {
        let ability = game.ability(*self)?.clone();
        let victims = subscope.expect_targets(&ability.name)?;
        ability.apply(game, actor, victims)?;
        if ability.window.single_use {
            game.mark_spent(*self);
        }
        Ok(())
    }
}

/// What a binding does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// The always-present "do nothing" sentinel
    Pass,
    /// An ability hosted by a piece
    Ability(AbilityRef),
    /// A turn-based action
    Tba(TurnBasedAction),
}

impl Action {
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }

    /// Special actions and turn-based actions resolve immediately
    pub fn uses_stack(&self, game: &Game) -> bool {
        match self {
            Action::Pass | Action::Tba(_) => false,
            Action::Ability(r) => game.ability(*r).map(|a| a.uses_stack()).unwrap_or(false),
        }
    }
}

impl Capability for Action {
    fn label(&self, game: &Game) -> String {
        match self {
            Action::Pass => "Pass".to_string(),
            Action::Ability(r) => r.label(game),
            Action::Tba(t) => t.label(game),
        }
    }

    fn is_live(&self, game: &Game, actor: PlayerId) -> bool {
        match self {
            Action::Pass => true,
            Action::Ability(r) => r.is_live(game, actor),
            Action::Tba(t) => t.is_live(game, actor),
        }
    }

    fn solve_subscopes(&self, game: &Game, actor: PlayerId) -> Result<Vec<Subscope>> {
        match self {
            Action::Pass => Err(RulesError::PassHasNoTargets),
            Action::Ability(r) => r.solve_subscopes(game, actor),
            Action::Tba(t) => t.solve_subscopes(game, actor),
        }
    }

    fn apply(&self, game: &mut Game, actor: PlayerId, subscope: &Subscope) -> Result<()> {
        match self {
            Action::Pass => match subscope {
                Subscope::Empty => Ok(()),
                _ => Err(RulesError::PassHasNoTargets),
            },
            Action::Ability(r) => r.apply(game, actor, subscope),
            Action::Tba(t) => t.apply(game, actor, subscope),
        }
    }
}

/// The chosen parameters of one binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subscope {
    /// Nothing chosen (the pass sentinel)
    Empty,
    /// A fixed-size set of players and/or pieces
    Targets(TargetSet),
    /// A complete attacker declaration
    Attack(AttackDeclaration),
    /// A complete blocker declaration
    Block(BlockDeclaration),
    /// Damage-assignment orders for every multi-opponent combatant
    DamageOrder(DamageOrderDeclaration),
}

impl Subscope {
    pub fn expect_targets(&self, action: &str) -> Result<&[Target]> {
        match self {
            Subscope::Targets(targets) => Ok(targets),
            _ => Err(RulesError::SubscopeMismatch {
                action: action.to_string(),
                expected: "a target set",
            }),
        }
    }
}

impl fmt::Display for Subscope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscope::Empty => write!(f, "-"),
            Subscope::Targets(targets) => {
                let parts: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Subscope::Attack(decl) => write!(f, "{decl}"),
            Subscope::Block(decl) => write!(f, "{decl}"),
            Subscope::DamageOrder(decl) => write!(f, "{decl}"),
        }
    }
}

/// (actor, action, subscope): one legal, fully specified action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub actor: PlayerId,
    pub action: Action,
    pub subscope: Subscope,
}

impl Binding {
    pub fn new(actor: PlayerId, action: Action, subscope: Subscope) -> Self {
        Binding {
            actor,
            action,
            subscope,
        }
    }

    /// The pass sentinel for `actor`
    pub fn pass(actor: PlayerId) -> Self {
        Binding::new(actor, Action::Pass, Subscope::Empty)
    }

    pub fn is_pass(&self) -> bool {
        self.action.is_pass()
    }

    /// Resolve the binding; consuming it means it can resolve only once
    pub fn apply(self, game: &mut Game) -> Result<()> {
        let label = self.action.label(game);
        let actor_name = game.player_name(self.actor);
        game.logger
            .debug(&format!("Applying {label} for {actor_name} with {}", self.subscope));
        self.action.apply(game, self.actor, &self.subscope)
    }

    /// One-line description for logs and choice menus
    pub fn describe(&self, game: &Game) -> String {
        format!(
            "| {} | {} | {} |",
            game.player_name(self.actor),
            self.action.label(game),
            self.subscope
        )
    }
}
