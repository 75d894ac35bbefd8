//! CCG Rules - turn-based combat rules core
//!
//! A step/phase state machine, a priority-and-stack protocol, combat
//! declaration and damage-assignment combinatorics, and a state-based
//! action fixpoint loop, modelled on collectible-card-game turn structure.

pub mod core;
pub mod error;
pub mod game;

pub use error::{Result, RulesError};
