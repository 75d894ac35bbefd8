//! Turn execution
//!
//! A turn walks the epoch table from the Untap step to the Cleanup step.
//! Each step announces itself, runs its head batch of turn-based actions,
//! runs one priority round, runs its tail batch and announces its end.

use crate::core::{Binding, PlayerId};
use crate::game::controller::PlayerController;
use crate::game::phase::TbaSlot;
use crate::game::priority::DecisionKind;
use crate::game::{GameLoop, Step, TurnBasedAction};
use crate::{Result, RulesError};

impl<'a> GameLoop<'a> {
    /// Play one turn for the player at `intended_idx`
    pub(crate) fn run_turn(
        &mut self,
        intended_idx: usize,
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<()> {
        // Extra turns may have moved the active index since the turn was scheduled
        self.game.active_idx = intended_idx;
        self.game.combat.clear();
        self.game.turn_number += 1;

        let active = self.game.active_player();
        self.game.logger.event(&format!(
            "Start of Turn {} ({}).",
            self.game.turn_number,
            self.game.player_name(active)
        ));

        let mut step = Some(Step::FIRST);
        while let Some(current) = step {
            if self.game.is_over() {
                break;
            }
            self.run_step(current, controllers)?;
            step = self.determine_skip(current);
        }

        for player in &mut self.game.players {
            player.lands_played_this_turn = 0;
        }
        self.game.current_step = None;
        self.game.logger.event("End of Turn.");
        Ok(())
    }

    fn run_step(&mut self, step: Step, controllers: &mut [Box<dyn PlayerController>]) -> Result<()> {
        let epoch = step.epoch();
        self.game.current_step = Some(step);

        if let Some(phase) = epoch.opens_phase {
            self.game.logger.event(&format!("Start of {} Phase.", phase.name()));
        }
        self.game.logger.event(&format!("Start of {step}."));

        self.run_tba_batch(epoch.head, controllers)?;
        if !self.game.is_over() {
            self.priority_round(controllers)?;
        }
        if !self.game.is_over() {
            self.run_tba_batch(epoch.tail, controllers)?;
        }

        self.game.logger.event(&format!("End of {step}."));
        if let Some(phase) = epoch.closes_phase {
            self.game.logger.event(&format!("End of {} Phase.", phase.name()));
        }
        Ok(())
    }

    /// Run a batch of turn-based actions, last listed first
    ///
    /// Each action is solved against the state left by the one before it.
    fn run_tba_batch(
        &mut self,
        batch: &'static [TbaSlot],
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        for slot in batch.iter().rev() {
            if self.game.is_over() {
                return Ok(());
            }
            let player = self.game.player_for(slot.role);
            let options = self.game.solve_tba_bindings(slot.action, player)?;
            let binding = self.choose_tba_binding(slot.action, player, options, controllers)?;
            if binding.is_pass() {
                self.game.logger.debug(&format!(
                    "{}: nothing done by {}.",
                    slot.action.name(),
                    self.game.player_name(player)
                ));
            } else {
                binding.apply(self.game)?;
            }
        }

        self.game.run_sba()
    }

    /// Ask `player` to pick one way of performing `action`
    ///
    /// The controller is asked even when only one option exists.
    fn choose_tba_binding(
        &mut self,
        action: TurnBasedAction,
        player: PlayerId,
        mut options: Vec<Binding>,
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<Binding> {
        if options.is_empty() {
            return Err(RulesError::TbaOptionsEmpty(action.name().to_string()));
        }
        let index = self.decide(controllers, player, &options, DecisionKind::TurnBased)?;
        Ok(options.swap_remove(index))
    }

    /// The step that follows `step`, or `None` at the end of the turn
    fn determine_skip(&self, step: Step) -> Option<Step> {
        if self.game.config.skip_empty_combat
            && step == Step::DeclareAttackers
            && self.game.combat.attackers.is_empty()
        {
            self.game
                .logger
                .engine("No attackers were declared; skipping to End of Combat.");
            return Some(Step::EndOfCombat);
        }
        step.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, StatBlock, TeamId};
    use crate::game::controller::GameStateView;
    use crate::game::{Game, GameConfig, GameLogger, ZeroController};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Answers 0 everywhere and records the size of every option list
    struct Recorder {
        id: PlayerId,
        option_sizes: Rc<RefCell<Vec<usize>>>,
    }

    impl PlayerController for Recorder {
        fn player_id(&self) -> PlayerId {
            self.id
        }
        fn choose_action(&mut self, _: &GameStateView, _: &[Binding]) -> usize {
            0
        }
        fn choose_option(&mut self, _: &GameStateView, options: &[Binding]) -> usize {
            self.option_sizes.borrow_mut().push(options.len());
            0
        }
    }

    fn empty_board() -> Game {
        let players = vec![
            Player::new(PlayerId::new(0), "A", TeamId(0), StatBlock::new()),
            Player::new(PlayerId::new(1), "B", TeamId(1), StatBlock::new()),
        ];
        Game::new(players, Vec::new(), GameConfig::default().with_max_turns(1))
            .unwrap()
            .with_logger(GameLogger::silent())
    }

    #[test]
    fn test_empty_option_list_is_a_fault() {
        let mut game = empty_board();
        let mut controllers: Vec<Box<dyn PlayerController>> = vec![
            Box::new(ZeroController::new(PlayerId::new(0))),
            Box::new(ZeroController::new(PlayerId::new(1))),
        ];
        let mut game_loop = GameLoop::new(&mut game);
        let err = game_loop
            .choose_tba_binding(
                TurnBasedAction::Untap,
                PlayerId::new(0),
                Vec::new(),
                &mut controllers,
            )
            .unwrap_err();
        assert!(matches!(err, RulesError::TbaOptionsEmpty(name) if name == "TBA_Untap"));
    }

    #[test]
    fn test_single_option_is_still_offered() {
        let mut game = empty_board();
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let mut controllers: Vec<Box<dyn PlayerController>> = vec![
            Box::new(Recorder {
                id: PlayerId::new(0),
                option_sizes: Rc::clone(&sizes),
            }),
            Box::new(ZeroController::new(PlayerId::new(1))),
        ];
        GameLoop::new(&mut game).run_game(&mut controllers).unwrap();

        // Forced choices reach the controller too
        assert!(sizes.borrow().contains(&1));
    }
}
