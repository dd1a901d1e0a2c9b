//! The 1,326 two-card starting hands in the solver's canonical order.
//!
//! A combo is stored high card first. Combos are ordered by the high card's
//! index and then the low card's, so the catalog starts `2d2c 2h2c 2h2d 2s2c`
//! and ends with `AsAh`. Every per-combo array the solver prints (strategies,
//! ranges, categories) is index-aligned with this catalog.

use std::fmt;

use once_cell::sync::Lazy;

use crate::cards::{parse_card, Card, NUM_CARDS};

/// Number of two-card combos: 52 choose 2.
pub const NUM_COMBOS: usize = 1326;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    pub hi: Card,
    pub lo: Card,
}

impl Combo {
    /// Builds a combo from two distinct cards in either order.
    pub fn new(a: Card, b: Card) -> Option<Combo> {
        if a == b {
            return None;
        }
        if a.index() > b.index() {
            Some(Combo { hi: a, lo: b })
        } else {
            Some(Combo { hi: b, lo: a })
        }
    }

    pub fn index(&self) -> usize {
        let hi = self.hi.index();
        hi * (hi - 1) / 2 + self.lo.index()
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hi, self.lo)
    }
}

static CATALOG: Lazy<Vec<Combo>> = Lazy::new(|| {
    (1..NUM_CARDS)
        .flat_map(|hi| (0..hi).map(move |lo| (hi, lo)))
        .filter_map(|(hi, lo)| Some(Combo { hi: Card::from_index(hi)?, lo: Card::from_index(lo)? }))
        .collect()
});

/// All combos in canonical order.
pub fn all_combos() -> &'static [Combo] {
    &CATALOG
}

pub fn combo_at(index: usize) -> Option<Combo> {
    CATALOG.get(index).copied()
}

/// Index of a specific combo such as `AhQd`; accepts both card orders.
pub fn combo_index(notation: &str) -> Option<usize> {
    let notation = notation.trim();
    if notation.len() != 4 || !notation.is_ascii() {
        return None;
    }
    let a = parse_card(&notation[..2]).ok()?;
    let b = parse_card(&notation[2..]).ok()?;
    Combo::new(a, b).map(|c| c.index())
}
