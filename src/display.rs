use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;
use rust_decimal::Decimal;

use crate::board::{NodeBook, ResolvedBoard};
use crate::cards::{Card, Suit};
use crate::config::CategoryTables;
use crate::node_id::NodeAddress;
use crate::redistribute::AppliedWeight;
use crate::strategy::StrategyMatrix;
use crate::weights::{normalize_weight, WeightSpec};

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let rank = card.rank.to_char();
            let symbol = card.suit.symbol();
            match card.suit {
                Suit::Spades => format!("{}{}", rank, symbol).white().to_string(),
                Suit::Hearts => format!("{}{}", rank, symbol).red().to_string(),
                Suit::Diamonds => format!("{}{}", rank, symbol).blue().to_string(),
                Suit::Clubs => format!("{}{}", rank, symbol).green().to_string(),
            }
        })
        .join(" ")
}

fn pct(value: Decimal) -> String {
    format!("{:.1}%", value * Decimal::ONE_HUNDRED)
}

pub fn address_table(node: &NodeAddress) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Decision".bold().to_string()),
        Cell::new("Bet size").set_alignment(CellAlignment::Right),
    ]);

    let trace = node.bet_size_trace();
    for (i, decision) in node.decisions().iter().enumerate() {
        let size = if i == 0 {
            String::new()
        } else {
            trace.get(i - 1).map(|s| s.to_string()).unwrap_or_default()
        };
        let label = if decision.is_placeholder() {
            decision.to_string().yellow().to_string()
        } else {
            decision.to_string()
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(label),
            Cell::new(size).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn node_book_table(board: &ResolvedBoard) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("File".bold().to_string()), Cell::new("Node ID")]);

    match &board.nodes {
        NodeBook::Shared(node) => {
            table.add_row(vec![Cell::new("(all files)".dimmed().to_string()), Cell::new(node)]);
        }
        NodeBook::PerFile(nodes) => {
            for (file, node) in nodes {
                let cell = match node {
                    Ok(node) => Cell::new(node.to_string().green().to_string()),
                    Err(e) => Cell::new(e.to_string().red().to_string()),
                };
                table.add_row(vec![Cell::new(file), cell]);
            }
        }
    }
    table.to_string()
}

pub fn weights_table(spec: &WeightSpec, tables: &CategoryTables) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category".bold().to_string()),
        Cell::new("Kind"),
        Cell::new("Mode"),
        Cell::new("Weight").set_alignment(CellAlignment::Right),
    ]);
    for entry in spec.entries() {
        let kinds = tables
            .lookup(&entry.category)
            .iter()
            .map(|c| c.kind.as_str())
            .join("+");
        table.add_row(vec![
            Cell::new(&entry.category),
            Cell::new(kinds),
            Cell::new(entry.mode.as_str()),
            Cell::new(pct(normalize_weight(entry.weight))).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn applied_table(applied: &[AppliedWeight]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Category".bold().to_string()),
        Cell::new("Kind"),
        Cell::new("Mode"),
        Cell::new("Weight").set_alignment(CellAlignment::Right),
        Cell::new("Combos").set_alignment(CellAlignment::Right),
    ]);
    for a in applied {
        let touched = if a.touched == 0 {
            a.touched.to_string().dimmed().to_string()
        } else {
            a.touched.to_string()
        };
        table.add_row(vec![
            Cell::new(&a.category),
            Cell::new(a.kind.as_str()),
            Cell::new(a.mode.as_str()),
            Cell::new(pct(a.weight)).set_alignment(CellAlignment::Right),
            Cell::new(touched).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Average frequency of each action over the combos in range.
pub fn action_summary(matrix: &StrategyMatrix, labels: &[String]) -> String {
    let totals = matrix.combo_totals();
    let in_range: Decimal = totals.iter().sum();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Action".bold().to_string()),
        Cell::new("Frequency").set_alignment(CellAlignment::Right),
    ]);
    for action in 0..matrix.num_actions() {
        let label = labels
            .get(action)
            .cloned()
            .unwrap_or_else(|| format!("action {}", action));
        let freq = if in_range.is_zero() {
            Decimal::ZERO
        } else {
            matrix.row(action).iter().sum::<Decimal>() / in_range
        };
        table.add_row(vec![
            Cell::new(label),
            Cell::new(pct(freq)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

pub fn categories_table(tables: &CategoryTables) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Hand".bold().to_string()),
        Cell::new("Draw".bold().to_string()),
    ]);
    let rows = tables.hand.len().max(tables.draw.len());
    for i in 0..rows {
        let draw = tables
            .draw
            .get(i)
            .map(|d| {
                if tables.is_additive(d) {
                    format!("{} (add)", d).cyan().to_string()
                } else {
                    d.clone()
                }
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(i),
            Cell::new(tables.hand.get(i).cloned().unwrap_or_default()),
            Cell::new(draw),
        ]);
    }
    table.to_string()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

pub fn print_success(msg: &str) {
    println!("{}", msg.green().bold());
}
