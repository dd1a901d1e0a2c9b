//! Action frequencies at a decision node.
//!
//! `show_strategy <parent>` prints one line per child of the parent with a
//! frequency for each of the 1,326 combos. Values are kept as decimals so that
//! repeated redistribution passes do not accumulate binary rounding error.

use rust_decimal::Decimal;

use crate::combos::NUM_COMBOS;
use crate::endpoint::{parse_decimal, SolverEndpoint};
use crate::error::{NodelockError, NodelockResult};
use crate::node_id::NodeAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMatrix {
    rows: Vec<Vec<Decimal>>,
}

impl StrategyMatrix {
    /// Builds a matrix from rows of exactly `NUM_COMBOS` values.
    pub fn from_rows(rows: Vec<Vec<Decimal>>) -> NodelockResult<StrategyMatrix> {
        for (row, values) in rows.iter().enumerate() {
            if values.len() != NUM_COMBOS {
                return Err(NodelockError::StrategyShape {
                    row,
                    got: values.len(),
                    expected: NUM_COMBOS,
                });
            }
        }
        Ok(StrategyMatrix { rows })
    }

    pub fn parse(lines: &[String]) -> NodelockResult<StrategyMatrix> {
        let rows = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.split_whitespace().map(parse_decimal).collect::<NodelockResult<Vec<_>>>())
            .collect::<NodelockResult<Vec<_>>>()?;
        StrategyMatrix::from_rows(rows)
    }

    pub fn load<E: SolverEndpoint + ?Sized>(
        endpoint: &mut E,
        parent: &NodeAddress,
    ) -> NodelockResult<StrategyMatrix> {
        let lines = endpoint.show_strategy(parent)?;
        StrategyMatrix::parse(&lines)
    }

    pub fn store<E: SolverEndpoint + ?Sized>(
        &self,
        endpoint: &mut E,
        parent: &NodeAddress,
    ) -> NodelockResult<()> {
        endpoint.set_strategy(parent, &self.serialize())
    }

    /// One line per action, values space-separated.
    pub fn serialize(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|v| v.normalize().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn num_actions(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, action: usize, combo: usize) -> Decimal {
        self.rows[action][combo]
    }

    pub fn set(&mut self, action: usize, combo: usize, value: Decimal) {
        self.rows[action][combo] = value;
    }

    pub fn row(&self, action: usize) -> &[Decimal] {
        &self.rows[action]
    }

    /// Sum over actions for one combo.
    pub fn combo_total(&self, combo: usize) -> Decimal {
        self.rows.iter().map(|row| row[combo]).sum()
    }

    pub fn combo_totals(&self) -> Vec<Decimal> {
        let mut totals = vec![Decimal::ZERO; NUM_COMBOS];
        for row in &self.rows {
            for (total, value) in totals.iter_mut().zip(row) {
                *total += *value;
            }
        }
        totals
    }
}
