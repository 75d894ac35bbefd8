//! Error types for the rules engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    /// An ability without a target rule was asked to enumerate targets.
    /// This is a wiring mistake, never a game condition.
    #[error("Ability '{0}' has no target rule")]
    MissingTargetRule(String),

    #[error("The pass sentinel has no targets and cannot be resolved against any")]
    PassHasNoTargets,

    #[error("Subscope does not fit action '{action}': expected {expected}")]
    SubscopeMismatch {
        action: String,
        expected: &'static str,
    },

    #[error("{player} returned option {index} of {offered} offered options")]
    IllegalDecision {
        player: String,
        index: usize,
        offered: usize,
    },

    #[error("Turn-based action '{0}' produced no options (not even a pass)")]
    TbaOptionsEmpty(String),

    #[error("Priority round exceeded max iterations ({0}), possible infinite loop")]
    PriorityLimitExceeded(usize),

    #[error("State-based action loop exceeded max iterations ({0}) without reaching a fixpoint")]
    SbaLimitExceeded(usize),

    #[error("No controller registered for player {0}")]
    ControllerMissing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RulesError>;
