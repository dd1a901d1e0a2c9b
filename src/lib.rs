//! Batch nodelocking for solver game trees.
//!
//! Node IDs are parsed and filled in per file ([`node_id`], [`board`]), the
//! target's siblings and the board's hand categories are read from the solver
//! ([`family`], [`categories`]), and the parent's strategy is rewritten so the
//! target action is taken at the requested frequency per category
//! ([`strategy`], [`redistribute`]) before it is locked ([`nodelock`]). Root EVs and line frequencies are read
//! back after locking ([`results`]).

pub mod board;
pub mod cards;
pub mod categories;
pub mod cli;
pub mod combos;
pub mod config;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod family;
pub mod node_id;
pub mod nodelock;
pub mod redistribute;
pub mod results;
pub mod strategy;
pub mod weights;
