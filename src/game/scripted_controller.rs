//! Scripted player controller for testing and examples
//!
//! Follows two predetermined index scripts, one for priority decisions and
//! one for turn-based action options. An exhausted script answers 0, which
//! for priority decisions is the pass sentinel.

use crate::core::{Binding, PlayerId};
use crate::game::controller::{GameStateView, PlayerController};
use std::collections::VecDeque;

pub struct ScriptedController {
    player_id: PlayerId,
    actions: VecDeque<usize>,
    options: VecDeque<usize>,
    /// Options offered at each priority decision, for assertions
    offered_actions: Vec<usize>,
}

impl ScriptedController {
    /// Controller answering priority decisions from `actions`
    pub fn new(player_id: PlayerId, actions: Vec<usize>) -> Self {
        ScriptedController {
            player_id,
            actions: actions.into(),
            options: VecDeque::new(),
            offered_actions: Vec::new(),
        }
    }

    /// Script for turn-based action choices
    pub fn with_options(mut self, options: Vec<usize>) -> Self {
        self.options = options.into();
        self
    }

    /// Number of options offered at each priority decision so far
    pub fn offered_actions(&self) -> &[usize] {
        &self.offered_actions
    }

    pub fn is_exhausted(&self) -> bool {
        self.actions.is_empty() && self.options.is_empty()
    }
}

impl PlayerController for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn choose_action(&mut self, _view: &GameStateView, options: &[Binding]) -> usize {
        self.offered_actions.push(options.len());
        self.actions.pop_front().unwrap_or(0)
    }

    fn choose_option(&mut self, _view: &GameStateView, _options: &[Binding]) -> usize {
        self.options.pop_front().unwrap_or(0)
    }
}
