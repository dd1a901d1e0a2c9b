//! Weights files: target frequency per hand or draw category.
//!
//! ```json
//! { "top_pair": 80, "flush_draw": 0.5, "bdfd_1card": 10 }
//! ```
//!
//! Values above 1 are percentages. Entries are applied in file order, so a
//! later entry wins for combos that sit in two listed categories.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::config::CategoryTables;
use crate::error::{NodelockError, NodelockResult};

/// How a category's weight combines with the current frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    Replace,
    Add,
}

impl WeightMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightMode::Replace => "replace",
            WeightMode::Add => "add",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightEntry {
    pub category: String,
    /// As written in the file; see [`normalize_weight`].
    pub weight: Decimal,
    pub mode: WeightMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeightSpec {
    entries: Vec<WeightEntry>,
}

impl WeightSpec {
    pub fn from_json(text: &str, tables: &CategoryTables) -> NodelockResult<WeightSpec> {
        let doc: Value = serde_json::from_str(text)?;
        WeightSpec::from_document(&doc, tables)
    }

    pub fn from_document(doc: &Value, tables: &CategoryTables) -> NodelockResult<WeightSpec> {
        let map = doc
            .as_object()
            .ok_or_else(|| NodelockError::InvalidDocument("weights file must be a JSON object".to_string()))?;

        let mut spec = WeightSpec::default();
        for (name, value) in map {
            let weight = match value {
                Value::Number(n) => parse_number(name, &n.to_string())?,
                _ => return Err(NodelockError::NonNumericWeight(name.clone())),
            };
            spec.push(name, weight, tables)?;
        }
        Ok(spec)
    }

    /// Appends an entry after checking it against the category tables.
    pub fn push(&mut self, category: &str, weight: Decimal, tables: &CategoryTables) -> NodelockResult<()> {
        if !tables.is_known(category) {
            return Err(NodelockError::UnknownCategory(category.to_string()));
        }
        if weight.is_sign_negative() && !weight.is_zero() {
            return Err(NodelockError::NegativeWeight(category.to_string()));
        }
        let mode = if tables.is_additive(category) {
            WeightMode::Add
        } else {
            WeightMode::Replace
        };
        self.entries.push(WeightEntry {
            category: category.to_string(),
            weight,
            mode,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_number(name: &str, text: &str) -> NodelockResult<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| NodelockError::NonNumericWeight(name.to_string()))
}

/// 20% may be written as `0.2` or `20`; anything above 1 is a percentage.
pub fn normalize_weight(weight: Decimal) -> Decimal {
    if weight > Decimal::ONE {
        weight / Decimal::ONE_HUNDRED
    } else {
        weight
    }
}
