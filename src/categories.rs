//! Per-combo hand and draw categories for a board texture.

use crate::cards::{board_to_string, parse_board};
use crate::combos::NUM_COMBOS;
use crate::config::CategoryKind;
use crate::endpoint::SolverEndpoint;
use crate::error::{NodelockError, NodelockResult};
use crate::node_id::NodeAddress;

/// Category index of every combo, aligned with the combo catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboCategories {
    pub hand: Vec<usize>,
    pub draw: Vec<usize>,
}

impl ComboCategories {
    /// Parses the two lines printed by `show_categories`.
    pub fn parse(lines: &[String]) -> NodelockResult<ComboCategories> {
        let mut rows = lines.iter().filter(|l| !l.trim().is_empty());
        let (hand, draw) = match (rows.next(), rows.next()) {
            (Some(hand), Some(draw)) => (hand, draw),
            _ => {
                return Err(NodelockError::Protocol(format!(
                    "show_categories returned {} lines, expected 2",
                    lines.len()
                )))
            }
        };
        Ok(ComboCategories {
            hand: parse_indices(hand)?,
            draw: parse_indices(draw)?,
        })
    }

    pub fn of_kind(&self, kind: CategoryKind) -> &[usize] {
        match kind {
            CategoryKind::Hand => &self.hand,
            CategoryKind::Draw => &self.draw,
        }
    }

    /// Combos in the given category.
    pub fn members(&self, kind: CategoryKind, index: usize) -> Vec<usize> {
        self.of_kind(kind)
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == index)
            .map(|(combo, _)| combo)
            .collect()
    }
}

fn parse_indices(line: &str) -> NodelockResult<Vec<usize>> {
    let values = line
        .split_whitespace()
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| NodelockError::Protocol(format!("bad category index {}", v)))
        })
        .collect::<NodelockResult<Vec<usize>>>()?;
    if values.len() != NUM_COMBOS {
        return Err(NodelockError::CategoryShape {
            got: values.len(),
            expected: NUM_COMBOS,
        });
    }
    Ok(values)
}

/// One `show_categories` query for a board such as `As5h3s` or `As 5h 3s`.
pub fn categorize<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    board: &str,
) -> NodelockResult<ComboCategories> {
    let cards = parse_board(board)?;
    let lines = endpoint.categories_of(&board_to_string(&cards))?;
    ComboCategories::parse(&lines)
}

/// Categories on the board at a given node.
pub fn categorize_node<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    node: &NodeAddress,
) -> NodelockResult<ComboCategories> {
    let info = endpoint.show_node(node)?;
    log::debug!("categorizing {} on {}", node, info.board);
    categorize(endpoint, &info.board)
}
