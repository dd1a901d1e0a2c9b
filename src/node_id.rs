//! Decision-path addressing for solver trees.
//!
//! A node ID is a `:`-separated path from the root: `r:0:c:b16:7h:c`. Template
//! IDs read from a board file may also hold placeholders (`b`, `turn`, `river`)
//! that are filled in per file before the ID is sent to the solver.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::cards::{parse_card, Card};
use crate::error::{NodelockError, NodelockResult};

pub const ROOT: &str = "r:0";
pub const DELIMITER: char = ':';

const CHECK: &str = "c";
const FOLD: &str = "f";
const BET: &str = "b";
const TURN: &str = "turn";
const RIVER: &str = "river";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Root,
    Check,
    Fold,
    /// A bet whose size is fixed in the path (`b16`).
    BetSized(u32),
    /// A bet whose size differs per file (`b`).
    BetPlaceholder,
    TurnPlaceholder,
    RiverPlaceholder,
    /// A dealt turn or river card.
    Deal(Card),
}

impl Decision {
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Decision::BetPlaceholder | Decision::TurnPlaceholder | Decision::RiverPlaceholder
        )
    }

    fn from_token(token: &str) -> NodelockResult<Decision> {
        match token {
            CHECK => return Ok(Decision::Check),
            FOLD => return Ok(Decision::Fold),
            BET => return Ok(Decision::BetPlaceholder),
            TURN => return Ok(Decision::TurnPlaceholder),
            RIVER => return Ok(Decision::RiverPlaceholder),
            _ => {}
        }

        if let Some(size) = token.strip_prefix(BET) {
            if size.chars().all(|c| c.is_ascii_digit()) {
                return size
                    .parse::<u32>()
                    .map(Decision::BetSized)
                    .map_err(|_| NodelockError::InvalidNodeId(token.to_string()));
            }
        }

        if token.len() == 2 {
            if let Ok(card) = parse_card(token) {
                return Ok(Decision::Deal(card));
            }
        }

        Err(NodelockError::InvalidNodeId(token.to_string()))
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Root => write!(f, "{}", ROOT),
            Decision::Check => write!(f, "{}", CHECK),
            Decision::Fold => write!(f, "{}", FOLD),
            Decision::BetSized(size) => write!(f, "{}{}", BET, size),
            Decision::BetPlaceholder => write!(f, "{}", BET),
            Decision::TurnPlaceholder => write!(f, "{}", TURN),
            Decision::RiverPlaceholder => write!(f, "{}", RIVER),
            Decision::Deal(card) => write!(f, "{}", card),
        }
    }
}

/// Deepest street a node ID reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BoardKind {
    #[default]
    Flop,
    Turn,
    River,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Flop => "flop",
            BoardKind::Turn => "turn",
            BoardKind::River => "river",
        }
    }
}

/// How much of the tree `dump_tree` keeps when a locked file is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    NoTurns,
    NoRivers,
    Full,
}

impl SaveMode {
    /// Smallest save that still contains the locked street.
    pub fn for_board(kind: BoardKind) -> SaveMode {
        match kind {
            BoardKind::Flop => SaveMode::NoTurns,
            BoardKind::Turn => SaveMode::NoRivers,
            BoardKind::River => SaveMode::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::NoTurns => "no_turns",
            SaveMode::NoRivers => "no_rivers",
            SaveMode::Full => "full",
        }
    }
}

/// A file-specific value substituted into a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for MoveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveValue::Number(n) => write!(f, "{}", n),
            MoveValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    decisions: Vec<Decision>,
}

impl NodeAddress {
    pub fn root() -> NodeAddress {
        NodeAddress {
            decisions: vec![Decision::Root],
        }
    }

    /// Parses a node ID, placeholders allowed.
    pub fn parse(text: &str) -> NodelockResult<NodeAddress> {
        let text = text.trim();
        let mut pieces = text.split(DELIMITER);
        if pieces.next() != Some("r") || pieces.next() != Some("0") {
            return Err(NodelockError::InvalidNodeId("missing root".to_string()));
        }

        let mut decisions = vec![Decision::Root];
        for token in pieces {
            if token.is_empty() {
                return Err(NodelockError::InvalidNodeId(format!("empty decision in {}", text)));
            }
            decisions.push(Decision::from_token(token)?);
        }
        Ok(NodeAddress { decisions })
    }

    /// Parses a node ID that can be sent to the solver as is.
    pub fn parse_concrete(text: &str) -> NodelockResult<NodeAddress> {
        let address = NodeAddress::parse(text)?;
        if address.has_placeholders() {
            return Err(NodelockError::PlaceholderInConcrete(address.to_string()));
        }
        Ok(address)
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn is_root(&self) -> bool {
        self.decisions.len() == 1
    }

    pub fn has_placeholders(&self) -> bool {
        self.decisions.iter().any(Decision::is_placeholder)
    }

    /// Placeholders name their street (`turn`, `river`) however often they
    /// repeat; dealt cards count as one street each.
    pub fn board_kind(&self) -> BoardKind {
        let named = self
            .decisions
            .iter()
            .filter_map(|d| match d {
                Decision::TurnPlaceholder => Some(BoardKind::Turn),
                Decision::RiverPlaceholder => Some(BoardKind::River),
                _ => None,
            })
            .max()
            .unwrap_or_default();
        let dealt = match self.decisions.iter().filter(|d| matches!(d, Decision::Deal(_))).count() {
            0 => BoardKind::Flop,
            1 => BoardKind::Turn,
            _ => BoardKind::River,
        };
        named.max(dealt)
    }

    pub fn last_decision(&self) -> Decision {
        self.decisions.last().copied().unwrap_or(Decision::Root)
    }

    /// The node one decision up, or `None` at the root.
    pub fn parent(&self) -> Option<NodeAddress> {
        if self.is_root() {
            return None;
        }
        let mut decisions = self.decisions.clone();
        decisions.pop();
        Some(NodeAddress { decisions })
    }

    pub fn child(&self, decision: Decision) -> NodeAddress {
        let mut decisions = self.decisions.clone();
        decisions.push(decision);
        NodeAddress { decisions }
    }

    /// Fills placeholders left to right, one move per placeholder.
    pub fn concretize(&self, moves: &mut VecDeque<MoveValue>) -> NodelockResult<NodeAddress> {
        let mut decisions = Vec::with_capacity(self.decisions.len());
        for &decision in &self.decisions {
            if !decision.is_placeholder() {
                decisions.push(decision);
                continue;
            }
            let value = moves
                .pop_front()
                .ok_or_else(|| NodelockError::ExhaustedMoves(self.to_string()))?;
            let filled = match (decision, value) {
                (Decision::BetPlaceholder, MoveValue::Number(n)) => u32::try_from(n)
                    .map(Decision::BetSized)
                    .map_err(|_| NodelockError::NonNumericBet(n.to_string()))?,
                (Decision::BetPlaceholder, MoveValue::Text(s)) => {
                    return Err(NodelockError::NonNumericBet(s));
                }
                (_, MoveValue::Text(s)) => parse_card(&s)
                    .map(Decision::Deal)
                    .map_err(|_| NodelockError::InvalidNodeId(s))?,
                (_, MoveValue::Number(n)) => {
                    return Err(NodelockError::InvalidNodeId(n.to_string()));
                }
            };
            decisions.push(filled);
        }

        if !moves.is_empty() {
            log::warn!("{} unused moves after filling {}", moves.len(), self);
        }
        Ok(NodeAddress { decisions })
    }

    /// Running bet size at each decision after the root. A fold repeats the
    /// size that was in place before the last bet.
    pub fn bet_size_trace(&self) -> Vec<u64> {
        let mut size: u64 = 0;
        let mut previous: u64 = 0;
        let mut trace = Vec::with_capacity(self.decisions.len().saturating_sub(1));
        for decision in self.decisions.iter().skip(1) {
            if *decision == Decision::Fold {
                trace.push(previous);
                continue;
            }
            previous = size;
            if let Decision::BetSized(n) = decision {
                size += u64::from(*n);
            }
            trace.push(size);
        }
        trace
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for decision in &self.decisions {
            if !first {
                write!(f, "{}", DELIMITER)?;
            }
            write!(f, "{}", decision)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for NodeAddress {
    type Err = NodelockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeAddress::parse(s)
    }
}
