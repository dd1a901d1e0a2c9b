//! Category vocabularies used to target groups of hands.
//!
//! The solver reports each combo's hand and draw category as an index into
//! these lists. The tables can be replaced from a JSON file when a solver
//! build uses a different vocabulary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NodelockResult;

const HAND_CATEGORIES: &[&str] = &[
    "nothing",
    "king_high",
    "ace_high",
    "low_pair",
    "3rd-pair",
    "2nd-pair",
    "underpair",
    "top_pair",
    "top_pair_tp",
    "overpair",
    "two_pair",
    "trips",
    "set",
    "straight",
    "flush",
    "fullhouse",
    "top_fullhouse",
    "quads",
    "straight_flush",
];

const DRAW_CATEGORIES: &[&str] = &[
    "no_draw",
    "bdfd_1card",
    "bdfd_2card",
    "4out_straight_draw",
    "8out_straight_draw",
    "flush_draw",
    "combo_draw",
];

/// Categories whose weight is added to the current frequency instead of
/// replacing it.
const ADDITIVE_CATEGORIES: &[&str] = &["bdfd_1card", "bdfd_2card"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Hand,
    Draw,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Hand => "hand",
            CategoryKind::Draw => "draw",
        }
    }
}

/// A category name resolved against one vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryRef {
    pub kind: CategoryKind,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTables {
    /// Hand categories; position is the solver's category index.
    pub hand: Vec<String>,
    /// Draw categories; position is the solver's category index.
    pub draw: Vec<String>,
    #[serde(default)]
    pub additive: Vec<String>,
}

impl Default for CategoryTables {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        CategoryTables {
            hand: owned(HAND_CATEGORIES),
            draw: owned(DRAW_CATEGORIES),
            additive: owned(ADDITIVE_CATEGORIES),
        }
    }
}

impl CategoryTables {
    pub fn from_json(text: &str) -> NodelockResult<CategoryTables> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> NodelockResult<CategoryTables> {
        let text = std::fs::read_to_string(path)?;
        let tables = CategoryTables::from_json(&text)?;
        log::debug!(
            "loaded {} hand and {} draw categories from {}",
            tables.hand.len(),
            tables.draw.len(),
            path.display()
        );
        Ok(tables)
    }

    pub fn hand_index(&self, name: &str) -> Option<usize> {
        self.hand.iter().position(|h| h == name)
    }

    pub fn draw_index(&self, name: &str) -> Option<usize> {
        self.draw.iter().position(|d| d == name)
    }

    /// Every vocabulary entry matching `name`. A name present in both lists
    /// targets both.
    pub fn lookup(&self, name: &str) -> Vec<CategoryRef> {
        let hand = self.hand_index(name).map(|index| CategoryRef {
            kind: CategoryKind::Hand,
            index,
        });
        let draw = self.draw_index(name).map(|index| CategoryRef {
            kind: CategoryKind::Draw,
            index,
        });
        hand.into_iter().chain(draw).collect()
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.hand_index(name).is_some() || self.draw_index(name).is_some()
    }

    pub fn is_additive(&self, name: &str) -> bool {
        self.additive.iter().any(|a| a == name)
    }

    pub fn name_of(&self, category: CategoryRef) -> Option<&str> {
        let names = match category.kind {
            CategoryKind::Hand => &self.hand,
            CategoryKind::Draw => &self.draw,
        };
        names.get(category.index).map(|s| s.as_str())
    }
}
