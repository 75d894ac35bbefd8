//! State-based actions
//!
//! Run to a fixpoint before every priority grant and after every batch of
//! turn-based actions. Each pass either ends the game, moves limbo onto the
//! stack and goes round again, or finds nothing to do and stops.

use crate::game::{Game, GameEndReason};
use crate::{Result, RulesError};

impl Game {
    pub fn run_sba(&mut self) -> Result<()> {
        if self.is_over() {
            self.logger
                .debug("SBA loop called and found the game is already over.");
            return Ok(());
        }

        for _ in 0..self.config.max_sba_iterations {
            self.logger.engine("Checking state based actions...");

            if let Some(loser) = self.first_defeated_player() {
                let name = self.player_name(loser);
                self.logger.event(&format!(
                    "{name} is at {} health or below; the game ends.",
                    self.config.loss_threshold
                ));
                self.end_game(GameEndReason::PlayerDefeated(loser));
                return Ok(());
            }

            if self.limbo.is_empty() {
                return Ok(());
            }
            self.upload_triggered_abilities();
        }

        Err(RulesError::SbaLimitExceeded(self.config.max_sba_iterations))
    }

    fn first_defeated_player(&self) -> Option<crate::core::PlayerId> {
        self.players
            .iter()
            .find(|p| p.health() <= self.config.loss_threshold)
            .map(|p| p.id)
    }

    /// Move all of limbo onto the stack, keeping its order
    fn upload_triggered_abilities(&mut self) {
        self.logger.engine(&format!(
            "Moving {} triggered binding(s) from limbo onto the stack.",
            self.limbo.len()
        ));
        let pending = std::mem::take(&mut self.limbo);
        self.stack.extend(pending);
    }
}
