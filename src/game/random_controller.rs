//! Random controller
//!
//! Picks uniformly among the offered options. Seeded for reproducible games.

use crate::core::{Binding, PlayerId};
use crate::game::controller::{GameStateView, PlayerController};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomController {
    /// Random controller seeded from OS entropy
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Random controller with a fixed seed (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, options: &[Binding]) -> usize {
        if options.len() <= 1 {
            0
        } else {
            self.rng.gen_range(0..options.len())
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(&mut self, view: &GameStateView, options: &[Binding]) -> usize {
        let choice = self.pick(options);
        if let Some(binding) = options.get(choice) {
            view.logger()
                .debug(&format!("random choice {choice}: {}", view.describe(binding)));
        }
        choice
    }

    fn choose_option(&mut self, _view: &GameStateView, options: &[Binding]) -> usize {
        self.pick(options)
    }
}
