//! Turn phases, steps and the epoch table
//!
//! A turn is a fixed, linear walk over twelve steps. Everything that varies
//! per step (turn-based actions run at its head and tail, phase
//! announcements, successor) is data in `EPOCHS`, read by the turn driver.

use crate::core::Role;
use crate::game::TurnBasedAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PrecombatMain,
    Combat,
    PostcombatMain,
    Ending,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Beginning => "Beginning",
            Phase::PrecombatMain => "Precombat Main",
            Phase::Combat => "Combat",
            Phase::PostcombatMain => "Postcombat Main",
            Phase::Ending => "Ending",
        }
    }
}

/// Steps within phases, in turn order
///
/// The discriminant is the step's row in `EPOCHS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap = 0,
    Upkeep = 1,
    Draw = 2,

    PrecombatMain = 3,

    // Combat Phase
    BeginningOfCombat = 4,
    DeclareAttackers = 5,
    DeclareBlockers = 6,
    CombatDamage = 7,
    EndOfCombat = 8,

    PostcombatMain = 9,

    // Ending Phase
    End = 10,
    Cleanup = 11,
}

impl Step {
    pub const ALL: [Step; 12] = [
        Step::Untap,
        Step::Upkeep,
        Step::Draw,
        Step::PrecombatMain,
        Step::BeginningOfCombat,
        Step::DeclareAttackers,
        Step::DeclareBlockers,
        Step::CombatDamage,
        Step::EndOfCombat,
        Step::PostcombatMain,
        Step::End,
        Step::Cleanup,
    ];

    /// The first step of every turn
    pub const FIRST: Step = Step::Untap;

    /// Display name used in announcements
    pub fn name(self) -> &'static str {
        match self {
            Step::Untap => "Untap Step",
            Step::Upkeep => "Upkeep Step",
            Step::Draw => "Draw Step",
            Step::PrecombatMain => "Precombat Main Phase",
            Step::BeginningOfCombat => "Beginning Of Combat Step",
            Step::DeclareAttackers => "Declare Attackers Step",
            Step::DeclareBlockers => "Declare Blockers Step",
            Step::CombatDamage => "Combat Damage Step",
            Step::EndOfCombat => "End Of Combat Step",
            Step::PostcombatMain => "Postcombat Main Phase",
            Step::End => "End Step",
            Step::Cleanup => "Cleanup Step",
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::PrecombatMain => Phase::PrecombatMain,
            Step::BeginningOfCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage
            | Step::EndOfCombat => Phase::Combat,
            Step::PostcombatMain => Phase::PostcombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// This step's row in the epoch table
    pub fn epoch(self) -> &'static Epoch {
        &EPOCHS[self as usize]
    }

    /// Next step in turn order, `None` after Cleanup
    pub fn next(self) -> Option<Step> {
        self.epoch().successor
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A turn-based action bound to the role that performs it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TbaSlot {
    pub action: TurnBasedAction,
    pub role: Role,
}

const fn ap(action: TurnBasedAction) -> TbaSlot {
    TbaSlot {
        action,
        role: Role::Active,
    }
}

const fn nap(action: TurnBasedAction) -> TbaSlot {
    TbaSlot {
        action,
        role: Role::NonActive,
    }
}

/// One row of the turn structure
///
/// Head and tail batches are listed in declared order and consumed from the
/// end, so the last slot listed runs first.
#[derive(Debug)]
pub struct Epoch {
    pub step: Step,
    pub head: &'static [TbaSlot],
    pub tail: &'static [TbaSlot],
    /// Phase whose start is announced before this step's own start
    pub opens_phase: Option<Phase>,
    /// Phase whose end is announced after this step's own end
    pub closes_phase: Option<Phase>,
    /// `None` for the terminal step
    pub successor: Option<Step>,
}

/// Every step empties both resource pools on the way out
const EMPTY_POOLS: &[TbaSlot] = &[
    nap(TurnBasedAction::EmptyResourcePool),
    ap(TurnBasedAction::EmptyResourcePool),
];

const NO_TBA: &[TbaSlot] = &[];

pub static EPOCHS: [Epoch; 12] = [
    Epoch {
        step: Step::Untap,
        head: &[ap(TurnBasedAction::Untap), ap(TurnBasedAction::Phasing)],
        tail: EMPTY_POOLS,
        opens_phase: Some(Phase::Beginning),
        closes_phase: None,
        successor: Some(Step::Upkeep),
    },
    Epoch {
        step: Step::Upkeep,
        head: NO_TBA,
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::Draw),
    },
    Epoch {
        step: Step::Draw,
        head: &[ap(TurnBasedAction::Draw)],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: Some(Phase::Beginning),
        successor: Some(Step::PrecombatMain),
    },
    Epoch {
        step: Step::PrecombatMain,
        head: &[ap(TurnBasedAction::SagaLoreCounters)],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::BeginningOfCombat),
    },
    Epoch {
        step: Step::BeginningOfCombat,
        head: &[ap(TurnBasedAction::ChooseDefendingOpponent)],
        tail: EMPTY_POOLS,
        opens_phase: Some(Phase::Combat),
        closes_phase: None,
        successor: Some(Step::DeclareAttackers),
    },
    Epoch {
        step: Step::DeclareAttackers,
        head: &[ap(TurnBasedAction::DeclareAttackers)],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::DeclareBlockers),
    },
    Epoch {
        step: Step::DeclareBlockers,
        head: &[
            nap(TurnBasedAction::BlockerDamageOrder),
            ap(TurnBasedAction::AttackerDamageOrder),
            nap(TurnBasedAction::DeclareBlockers),
        ],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::CombatDamage),
    },
    Epoch {
        step: Step::CombatDamage,
        head: &[
            ap(TurnBasedAction::CombatDamageDealt),
            nap(TurnBasedAction::BlockerAssignCombatDamage),
            ap(TurnBasedAction::AttackerAssignCombatDamage),
        ],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::EndOfCombat),
    },
    Epoch {
        step: Step::EndOfCombat,
        head: NO_TBA,
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: Some(Phase::Combat),
        successor: Some(Step::PostcombatMain),
    },
    Epoch {
        step: Step::PostcombatMain,
        head: NO_TBA,
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: None,
        successor: Some(Step::End),
    },
    Epoch {
        step: Step::End,
        head: NO_TBA,
        tail: EMPTY_POOLS,
        opens_phase: Some(Phase::Ending),
        closes_phase: None,
        successor: Some(Step::Cleanup),
    },
    Epoch {
        step: Step::Cleanup,
        head: &[
            ap(TurnBasedAction::RemoveDamageAndExpireEffects),
            nap(TurnBasedAction::MaintainLegalHandSize),
            ap(TurnBasedAction::MaintainLegalHandSize),
        ],
        tail: EMPTY_POOLS,
        opens_phase: None,
        closes_phase: Some(Phase::Ending),
        successor: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_steps() {
        for (i, epoch) in EPOCHS.iter().enumerate() {
            assert_eq!(epoch.step as usize, i);
            assert_eq!(Step::ALL[i], epoch.step);
        }
    }

    #[test]
    fn test_chain_is_linear_and_terminates() {
        let mut step = Step::FIRST;
        let mut visited = vec![step];
        while let Some(next) = step.next() {
            assert_eq!(next as usize, step as usize + 1);
            visited.push(next);
            step = next;
        }
        assert_eq!(visited, Step::ALL.to_vec());
        assert_eq!(step, Step::Cleanup);
    }

    #[test]
    fn test_every_tail_empties_pools() {
        for epoch in &EPOCHS {
            assert_eq!(epoch.tail.len(), 2);
            // Consumed from the end: the active player empties first
            assert_eq!(epoch.tail[1].role, Role::Active);
            assert!(epoch
                .tail
                .iter()
                .all(|slot| slot.action == TurnBasedAction::EmptyResourcePool));
        }
    }

    #[test]
    fn test_phase_announcements() {
        assert_eq!(Step::Untap.epoch().opens_phase, Some(Phase::Beginning));
        assert_eq!(Step::Draw.epoch().closes_phase, Some(Phase::Beginning));
        assert_eq!(Step::BeginningOfCombat.epoch().opens_phase, Some(Phase::Combat));
        assert_eq!(Step::EndOfCombat.epoch().closes_phase, Some(Phase::Combat));
        assert_eq!(Step::End.epoch().opens_phase, Some(Phase::Ending));
        assert_eq!(Step::Cleanup.epoch().closes_phase, Some(Phase::Ending));
        assert_eq!(Step::PrecombatMain.epoch().opens_phase, None);
    }

    #[test]
    fn test_step_names_and_phases() {
        assert_eq!(Step::PrecombatMain.to_string(), "Precombat Main Phase");
        assert_eq!(Step::CombatDamage.phase(), Phase::Combat);
    }
}
