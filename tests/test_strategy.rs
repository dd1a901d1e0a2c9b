//! Strategy matrices and per-combo categories as printed by the solver.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use pio_nodelock::categories::ComboCategories;
use pio_nodelock::combos::NUM_COMBOS;
use pio_nodelock::config::CategoryKind;
use pio_nodelock::error::NodelockError;
use pio_nodelock::strategy::StrategyMatrix;

fn row_of(value: &str) -> String {
    vec![value; NUM_COMBOS].join(" ")
}

#[test]
fn parse_reads_one_row_per_action() {
    let lines = vec![row_of("0.25"), row_of("0.75")];
    let matrix = StrategyMatrix::parse(&lines).unwrap();
    assert_eq!(matrix.num_actions(), 2);
    assert_eq!(matrix.get(0, 0), dec!(0.25));
    assert_eq!(matrix.get(1, NUM_COMBOS - 1), dec!(0.75));
    assert_eq!(matrix.combo_total(17), dec!(1));
}

#[test]
fn parse_skips_blank_lines() {
    let lines = vec![row_of("1"), String::new(), "   ".to_string()];
    assert_eq!(StrategyMatrix::parse(&lines).unwrap().num_actions(), 1);
}

#[test]
fn parse_accepts_scientific_notation() {
    let mut values = vec!["0"; NUM_COMBOS];
    values[3] = "2.5e-05";
    values[4] = "1e-3";
    let matrix = StrategyMatrix::parse(&[values.join(" ")]).unwrap();
    assert_eq!(matrix.get(0, 3), dec!(0.000025));
    assert_eq!(matrix.get(0, 4), dec!(0.001));
}

#[test]
fn parse_rejects_short_rows_and_garbage() {
    let short = vec![row_of("0.5"), "0.5 0.5".to_string()];
    assert!(matches!(
        StrategyMatrix::parse(&short),
        Err(NodelockError::StrategyShape { row: 1, got: 2, .. })
    ));

    let mut values = vec!["0"; NUM_COMBOS];
    values[0] = "abc";
    assert!(matches!(
        StrategyMatrix::parse(&[values.join(" ")]),
        Err(NodelockError::Protocol(_))
    ));
}

#[test]
fn serialize_round_trip() {
    let mut matrix = StrategyMatrix::parse(&[row_of("0.5"), row_of("0.5")]).unwrap();
    matrix.set(0, 10, dec!(0.142857142857142857142857));
    matrix.set(1, 10, dec!(0.857142857142857142857143));

    let text = matrix.serialize();
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().all(|l| l.split(' ').count() == NUM_COMBOS));

    let lines: Vec<String> = text.lines().map(String::from).collect();
    assert_eq!(StrategyMatrix::parse(&lines).unwrap(), matrix);
}

#[test]
fn serialize_drops_trailing_zeros() {
    let matrix = StrategyMatrix::parse(&[row_of("0.50000")]).unwrap();
    assert!(matrix.serialize().starts_with("0.5 0.5 "));
}

#[test]
fn combo_totals_cover_every_combo() {
    let mut matrix = StrategyMatrix::parse(&[row_of("0.6"), row_of("0.4")]).unwrap();
    matrix.set(0, 0, Decimal::ZERO);
    matrix.set(1, 0, Decimal::ZERO);
    let totals = matrix.combo_totals();
    assert_eq!(totals.len(), NUM_COMBOS);
    assert_eq!(totals[0], Decimal::ZERO);
    assert!(totals[1..].iter().all(|t| *t == Decimal::ONE));
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn categories_parse_hand_then_draw() {
    let hand: Vec<String> = (0..NUM_COMBOS).map(|i| (i % 19).to_string()).collect();
    let draw: Vec<String> = (0..NUM_COMBOS).map(|i| (i % 7).to_string()).collect();
    let cats = ComboCategories::parse(&[hand.join(" "), draw.join(" ")]).unwrap();

    assert_eq!(cats.hand[20], 1);
    assert_eq!(cats.draw[20], 6);
    assert_eq!(cats.of_kind(CategoryKind::Draw)[8], 1);

    let members = cats.members(CategoryKind::Hand, 18);
    assert_eq!(members[0], 18);
    assert!(members.iter().all(|c| c % 19 == 18));
}

#[test]
fn categories_shape_errors() {
    let full = row_of("0");
    assert!(matches!(
        ComboCategories::parse(&[full.clone()]),
        Err(NodelockError::Protocol(_))
    ));
    assert!(matches!(
        ComboCategories::parse(&[full.clone(), "0 1 2".to_string()]),
        Err(NodelockError::CategoryShape { got: 3, .. })
    ));
    assert!(matches!(
        ComboCategories::parse(&[full, row_of("x")]),
        Err(NodelockError::Protocol(_))
    ));
}
