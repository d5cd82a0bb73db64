//! Error types for the rule engine and search layer

use crate::game::Action;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MorrisError {
    /// The action is not in the legal action set of the state it was applied to
    #[error("illegal action: {action}")]
    IllegalAction { action: Action },

    /// A search strategy was handed a terminal or stalemated state
    #[error("no move available")]
    NoMoveAvailable,

    /// Search configuration rejected before any search started
    #[error("invalid search configuration: {0}")]
    Configuration(String),

    /// A hand-built position breaks a board invariant
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// Text could not be read as a point or action
    #[error("cannot parse action: {0}")]
    ParseAction(String),
}

pub type Result<T> = std::result::Result<T, MorrisError>;
