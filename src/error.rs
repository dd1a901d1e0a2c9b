use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

/// Cloneable so a per-file failure can be stored once and reported again.
#[derive(Error, Debug, Clone)]
pub enum NodelockError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Invalid node ID: {0}")]
    InvalidNodeId(String),

    #[error("Node ID {0} still contains bet/turn/river placeholders")]
    PlaceholderInConcrete(String),

    #[error("The shared line {0} has bet/turn/river placeholders; add file-specific moves to the board file")]
    MissingFileSpecificInfo(String),

    #[error("Board file has no shared decision line (\"all\" key)")]
    MissingSharedLine,

    #[error("Ran out of file-specific moves while filling in {0}")]
    ExhaustedMoves(String),

    #[error("Bet sizes must be whole numbers, got {0}")]
    NonNumericBet(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("{0} not specified in board file")]
    FileNotInBoardSpec(String),

    #[error("Invalid decision node - the child nodes of {parent} are: {}", siblings.join(" "))]
    UnknownDecisionNode {
        node: String,
        parent: String,
        siblings: Vec<String>,
    },

    #[error("Unknown hand or draw category: {0}")]
    UnknownCategory(String),

    #[error("Weight for {0} is invalid; cannot have negative percentage")]
    NegativeWeight(String),

    #[error("Weight for {0} must be a number")]
    NonNumericWeight(String),

    #[error("Strategy row {row} has {got} values, expected {expected}")]
    StrategyShape { row: usize, got: usize, expected: usize },

    #[error("Category list has {got} entries, expected {expected}")]
    CategoryShape { got: usize, expected: usize },

    #[error("Target action {index} out of range for {actions} actions")]
    TargetOutOfRange { index: usize, actions: usize },

    #[error("Rewriting combo {combo} would not keep its total of {total}")]
    Conservation { combo: usize, total: Decimal },

    #[error("No tree is loaded; cannot perform tree operations")]
    NoTreeLoaded,

    #[error("Solver rejected `{command}`: {message}")]
    SolverError { command: String, message: String },

    #[error("Unexpected solver output: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("JSON error: {0}")]
    JsonError(Arc<serde_json::Error>),
}

impl From<std::io::Error> for NodelockError {
    fn from(e: std::io::Error) -> Self {
        NodelockError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for NodelockError {
    fn from(e: serde_json::Error) -> Self {
        NodelockError::JsonError(Arc::new(e))
    }
}

pub type NodelockResult<T> = Result<T, NodelockError>;
