//! Priority and stack protocol
//!
//! The transition rules live in [`PriorityState::next`] as a pure function so
//! they can be checked without a game; [`GameLoop::priority_round`] drives
//! them against the real state and the controllers.

use crate::core::{Binding, PlayerId};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::GameLoop;
use crate::{Result, RulesError};

/// Who holds priority and how many players passed in a row before them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityState {
    pub player_idx: usize,
    pub passes: usize,
}

/// What the player holding priority did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityDecision {
    Pass,
    /// Put something on the stack or used a special action
    Act,
}

/// Where the round goes after a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityStep {
    Ask(PriorityState),
    /// Everyone passed over a non-empty stack: resolve the top entry, then
    /// reopen the round for the active player
    ResolveTop,
    /// Everyone passed over an empty stack
    EndRound,
}

impl PriorityState {
    /// The active player receives priority first with no passes counted
    pub fn opening(active_idx: usize) -> Self {
        PriorityState {
            player_idx: active_idx,
            passes: 0,
        }
    }

    pub fn next(self, decision: PriorityDecision, n_players: usize, stack_empty: bool) -> PriorityStep {
        match decision {
            PriorityDecision::Act => PriorityStep::Ask(PriorityState {
                player_idx: self.player_idx,
                passes: 0,
            }),
            PriorityDecision::Pass if self.passes + 1 >= n_players => {
                if stack_empty {
                    PriorityStep::EndRound
                } else {
                    PriorityStep::ResolveTop
                }
            }
            PriorityDecision::Pass => PriorityStep::Ask(PriorityState {
                player_idx: (self.player_idx + 1) % n_players,
                passes: self.passes + 1,
            }),
        }
    }
}

/// Which controller method a decision goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecisionKind {
    Priority,
    TurnBased,
}

pub(crate) fn controller_for(
    controllers: &mut [Box<dyn PlayerController>],
    player: PlayerId,
) -> Result<&mut Box<dyn PlayerController>> {
    controllers
        .iter_mut()
        .find(|c| c.player_id() == player)
        .ok_or_else(|| RulesError::ControllerMissing(player.to_string()))
}

impl<'a> GameLoop<'a> {
    /// Ask `player` to pick one of `options`
    ///
    /// Out-of-range answers are asked again up to `max_reprompts` times.
    pub(crate) fn decide(
        &mut self,
        controllers: &mut [Box<dyn PlayerController>],
        player: PlayerId,
        options: &[Binding],
        kind: DecisionKind,
    ) -> Result<usize> {
        let max_reprompts = self.game.config.max_reprompts;
        let controller = controller_for(controllers, player)?;
        let mut index = 0;
        for _ in 0..=max_reprompts {
            let view = GameStateView::new(self.game, player);
            index = match kind {
                DecisionKind::Priority => controller.choose_action(&view, options),
                DecisionKind::TurnBased => controller.choose_option(&view, options),
            };
            if index < options.len() {
                return Ok(index);
            }
            self.game.logger.debug(&format!(
                "{} chose option {index} of {}; asking again.",
                self.game.player_name(player),
                options.len()
            ));
        }
        Err(RulesError::IllegalDecision {
            player: self.game.player_name(player),
            index,
            offered: options.len(),
        })
    }

    /// Run one priority round to completion
    ///
    /// State-based actions run before every grant of priority. The round
    /// ends when every player passes in a row over an empty stack, or when
    /// the game ends.
    pub(crate) fn priority_round(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<()> {
        let n_players = self.game.players.len();
        let ceiling = self.game.config.max_priority_iterations;
        let mut state = PriorityState::opening(self.game.active_idx);
        let mut iterations = 0;

        loop {
            self.game.run_sba()?;
            if self.game.is_over() {
                return Ok(());
            }

            iterations += 1;
            if iterations > ceiling {
                return Err(RulesError::PriorityLimitExceeded(ceiling));
            }

            let player = self.game.players[state.player_idx].id;
            let mut legals = self.game.solve_legals(player)?;

            // Only the pass sentinel: no choice to make
            let index = if legals.len() == 1 {
                0
            } else {
                self.decide(controllers, player, &legals, DecisionKind::Priority)?
            };
            let binding = legals.swap_remove(index);

            let decision = if binding.is_pass() {
                self.game
                    .logger
                    .engine(&format!("{} passes priority.", self.game.player_name(player)));
                let controller = controller_for(controllers, player)?;
                let view = GameStateView::new(self.game, player);
                controller.on_priority_passed(&view);
                PriorityDecision::Pass
            } else if binding.action.uses_stack(self.game) {
                self.game.logger.event(&format!(
                    "{} puts {} on the stack.",
                    self.game.player_name(player),
                    binding.describe(self.game)
                ));
                self.game.stack.push(binding);
                PriorityDecision::Act
            } else {
                binding.apply(self.game)?;
                PriorityDecision::Act
            };

            match state.next(decision, n_players, self.game.stack.is_empty()) {
                PriorityStep::Ask(next) => state = next,
                PriorityStep::ResolveTop => {
                    if let Some(top) = self.game.stack.pop() {
                        self.game
                            .logger
                            .event(&format!("Resolving {}", top.describe(self.game)));
                        top.apply(self.game)?;
                    }
                    state = PriorityState::opening(self.game.active_idx);
                }
                PriorityStep::EndRound => return Ok(()),
            }
        }
    }
}
