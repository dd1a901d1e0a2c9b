//! Moving frequency onto or off one action for a category of hands.
//!
//! For every combo in the category the target action's frequency is set (or
//! raised) and the remaining frequency is spread over the other actions in
//! proportion to what they held before. A combo's total over all actions never
//! changes, and combos with a total of zero (not in range here) are skipped.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::categories::ComboCategories;
use crate::combos::NUM_COMBOS;
use crate::config::{CategoryKind, CategoryRef, CategoryTables};
use crate::error::{NodelockError, NodelockResult};
use crate::strategy::StrategyMatrix;
use crate::weights::{normalize_weight, WeightMode, WeightSpec};

/// Allowed drift of a combo's total after one pass.
const CONSERVATION_TOLERANCE: Decimal = dec!(0.000000001);

/// Outcome of one weights-file entry against one vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedWeight {
    pub category: String,
    pub kind: CategoryKind,
    pub mode: WeightMode,
    /// Target frequency after normalization, before clamping.
    pub weight: Decimal,
    /// Combos in range that were rewritten.
    pub touched: usize,
}

fn check_shape(
    matrix: &StrategyMatrix,
    target_index: usize,
    categories: &ComboCategories,
) -> NodelockResult<()> {
    if target_index >= matrix.num_actions() {
        return Err(NodelockError::TargetOutOfRange {
            index: target_index,
            actions: matrix.num_actions(),
        });
    }
    for per_combo in [&categories.hand, &categories.draw] {
        if per_combo.len() != NUM_COMBOS {
            return Err(NodelockError::CategoryShape {
                got: per_combo.len(),
                expected: NUM_COMBOS,
            });
        }
    }
    Ok(())
}

/// Rewrites the target action's frequency for every combo in `category`.
/// Returns the number of combos changed. A combo whose column cannot be
/// rewritten without changing its total fails with `Conservation`; combos
/// before it have already been written.
pub fn apply_category_weight(
    matrix: &mut StrategyMatrix,
    target_index: usize,
    categories: &ComboCategories,
    category: CategoryRef,
    weight: Decimal,
    mode: WeightMode,
) -> NodelockResult<usize> {
    check_shape(matrix, target_index, categories)?;
    if weight.is_sign_negative() && !weight.is_zero() {
        return Err(NodelockError::NegativeWeight(format!(
            "{} category {}",
            category.kind.as_str(),
            category.index
        )));
    }

    let weight = normalize_weight(weight);
    let others = matrix.num_actions() - 1;
    if others == 0 {
        log::warn!("only one action at this node; nothing to redistribute");
        return Ok(0);
    }
    let spread = Decimal::from(others);

    let mut touched = 0;
    for (combo, &cat) in categories.of_kind(category.kind).iter().enumerate() {
        if cat != category.index {
            continue;
        }
        let total = matrix.combo_total(combo);
        if total.is_zero() {
            continue;
        }

        let old = matrix.get(target_index, combo);
        let requested = match mode {
            WeightMode::Replace => weight,
            WeightMode::Add => old + weight,
        };
        let new = requested.clamp(Decimal::ZERO, Decimal::ONE).min(total);

        let rest = total - new;
        let old_rest = total - old;
        let mut column = Vec::with_capacity(matrix.num_actions());
        for action in 0..matrix.num_actions() {
            let value = if action == target_index {
                Some(new)
            } else if old_rest.is_zero() {
                rest.checked_div(spread)
            } else {
                matrix
                    .get(action, combo)
                    .checked_mul(rest)
                    .and_then(|v| v.checked_div(old_rest))
            };
            column.push(value.ok_or(NodelockError::Conservation { combo, total })?);
        }

        let after: Decimal = column.iter().sum();
        if (after - total).abs() > CONSERVATION_TOLERANCE {
            return Err(NodelockError::Conservation { combo, total });
        }
        for (action, value) in column.into_iter().enumerate() {
            matrix.set(action, combo, value);
        }
        touched += 1;
    }
    Ok(touched)
}

/// Applies every entry of a weights file in order. Every entry is checked
/// first, and the matrix only changes if every entry applies.
pub fn apply_weight_spec(
    matrix: &mut StrategyMatrix,
    target_index: usize,
    categories: &ComboCategories,
    spec: &WeightSpec,
    tables: &CategoryTables,
) -> NodelockResult<Vec<AppliedWeight>> {
    check_shape(matrix, target_index, categories)?;

    let mut plan = Vec::with_capacity(spec.len());
    for entry in spec.entries() {
        let targets = tables.lookup(&entry.category);
        if targets.is_empty() {
            return Err(NodelockError::UnknownCategory(entry.category.clone()));
        }
        if entry.weight.is_sign_negative() && !entry.weight.is_zero() {
            return Err(NodelockError::NegativeWeight(entry.category.clone()));
        }
        plan.push((entry, targets));
    }

    let mut work = matrix.clone();
    let mut applied = Vec::new();
    for (entry, targets) in plan {
        for category in targets {
            let touched =
                apply_category_weight(&mut work, target_index, categories, category, entry.weight, entry.mode)?;
            log::info!(
                "{:<24}{:<8}{:>8} combos",
                entry.category,
                entry.mode.as_str(),
                touched
            );
            applied.push(AppliedWeight {
                category: entry.category.clone(),
                kind: category.kind,
                mode: entry.mode,
                weight: normalize_weight(entry.weight),
                touched,
            });
        }
    }
    *matrix = work;
    Ok(applied)
}
