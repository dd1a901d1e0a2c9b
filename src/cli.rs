use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

use crate::board::BoardSpec;
use crate::cards::parse_board;
use crate::categories::ComboCategories;
use crate::combos::{combo_at, combo_index};
use crate::config::CategoryTables;
use crate::display::{
    action_summary, address_table, applied_table, board_display, categories_table,
    node_book_table, print_error, print_section, print_success, weights_table,
};
use crate::error::{NodelockError, NodelockResult};
use crate::node_id::{Decision, NodeAddress, SaveMode};
use crate::redistribute::apply_weight_spec;
use crate::strategy::StrategyMatrix;
use crate::weights::WeightSpec;

#[derive(Parser)]
#[command(name = "nodelock", version = "1.0.0", about = "Batch nodelocking for solver trees: node IDs, board files, weights files.")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Category tables JSON (defaults to the standard solver vocabulary)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Break a node ID into decisions with running bet sizes
    Parse {
        /// Node ID (e.g., r:0:c:b16:c)
        node: String,
        /// Flop at the root, to show the board at the node
        #[arg(long)]
        board: Option<String>,
    },
    /// Resolve a board file into one node ID per solver file
    Resolve {
        /// Board file (JSON)
        board_file: PathBuf,
        /// Solver files to look up; names may omit the extension
        files: Vec<String>,
    },
    /// Validate a weights file against the category tables
    Weights {
        /// Weights file (JSON)
        weights_file: PathBuf,
    },
    /// Apply a weights file to a dumped strategy, offline
    Apply {
        /// `show_strategy` output of the parent node
        #[arg(long)]
        strategy: PathBuf,
        /// `show_categories` output for the node's board
        #[arg(long)]
        categories: PathBuf,
        /// Index of the locked action among the parent's children
        #[arg(long)]
        target: usize,
        /// Weights file (JSON)
        #[arg(long)]
        weights: PathBuf,
        /// Where to write the rewritten strategy
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Show one combo's frequencies before and after (e.g., AsKd)
        #[arg(long)]
        combo: Option<String>,
    },
    /// List hand and draw categories
    Categories,
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dispatch(cli);
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn dispatch(cli: Cli) {
    let tables = match load_tables(cli.tables.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    match cli.command {
        Commands::Parse { node, board } => cmd_parse(node, board),
        Commands::Resolve { board_file, files } => cmd_resolve(&board_file, files),
        Commands::Weights { weights_file } => cmd_weights(&weights_file, &tables),
        Commands::Apply {
            strategy,
            categories,
            target,
            weights,
            out,
            combo,
        } => cmd_apply(&strategy, &categories, target, &weights, out, combo, &tables),
        Commands::Categories => cmd_categories(&tables),
    }
}

fn load_tables(path: Option<&Path>) -> NodelockResult<CategoryTables> {
    match path {
        Some(p) => CategoryTables::load(p),
        None => Ok(CategoryTables::default()),
    }
}

fn read_lines(path: &Path) -> NodelockResult<Vec<String>> {
    Ok(std::fs::read_to_string(path)?
        .lines()
        .map(|l| l.to_string())
        .collect())
}

fn cmd_parse(node: String, board: Option<String>) {
    let address = match NodeAddress::parse(&node) {
        Ok(a) => a,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!();
    println!("{}", address_table(&address));

    let kind = address.board_kind();
    let concrete = if address.has_placeholders() {
        "template".yellow().to_string()
    } else {
        "concrete".green().to_string()
    };
    println!(
        "  {} node on the {}, saved as {}",
        concrete,
        kind.as_str().bold(),
        SaveMode::for_board(kind).as_str()
    );

    if let Some(flop) = board {
        let mut cards = match parse_board(&flop) {
            Ok(c) => c,
            Err(e) => {
                print_error(&e.to_string());
                return;
            }
        };
        cards.extend(address.decisions().iter().filter_map(|d| match d {
            Decision::Deal(card) => Some(*card),
            _ => None,
        }));
        println!("  Board: {}", board_display(&cards));
    }
    println!();
}

fn cmd_resolve(board_file: &Path, files: Vec<String>) {
    let resolved = match std::fs::read_to_string(board_file)
        .map_err(NodelockError::from)
        .and_then(|text| BoardSpec::from_json(&text))
        .and_then(|spec| spec.resolve())
    {
        Ok(r) => r,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!();
    println!("{}", node_book_table(&resolved));
    println!(
        "  {} board, saved as {}",
        resolved.board_kind.as_str().bold(),
        SaveMode::for_board(resolved.board_kind).as_str()
    );

    for file in &files {
        match resolved.node_for(file) {
            Ok(node) => println!("  {:<28} {}", file, node.to_string().green()),
            Err(e) => print_error(&e.to_string()),
        }
    }
    println!();
}

fn cmd_weights(weights_file: &Path, tables: &CategoryTables) {
    let spec = match std::fs::read_to_string(weights_file)
        .map_err(NodelockError::from)
        .and_then(|text| WeightSpec::from_json(&text, tables))
    {
        Ok(s) => s,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!();
    println!("{}", weights_table(&spec, tables));
    print_success(&format!("  {} entries OK", spec.len()));
    println!();
}

fn cmd_apply(
    strategy: &Path,
    categories: &Path,
    target: usize,
    weights: &Path,
    out: Option<PathBuf>,
    combo: Option<String>,
    tables: &CategoryTables,
) {
    let result = (|| -> NodelockResult<_> {
        let matrix = StrategyMatrix::parse(&read_lines(strategy)?)?;
        let cats = ComboCategories::parse(&read_lines(categories)?)?;
        let spec = WeightSpec::from_json(&std::fs::read_to_string(weights)?, tables)?;
        Ok((matrix, cats, spec))
    })();
    let (mut matrix, cats, spec) = match result {
        Ok(r) => r,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    let combo_idx = match combo.as_deref().map(|c| (c, combo_index(c))) {
        Some((c, None)) => {
            print_error(&format!("Invalid combo: {}", c));
            return;
        }
        Some((_, Some(i))) => Some(i),
        None => None,
    };

    let labels: Vec<String> = (0..matrix.num_actions())
        .map(|a| {
            if a == target {
                format!("action {} (target)", a)
            } else {
                format!("action {}", a)
            }
        })
        .collect();
    let before = matrix.clone();

    let applied = match apply_weight_spec(&mut matrix, target, &cats, &spec, tables) {
        Ok(a) => a,
        Err(e) => {
            print_error(&e.to_string());
            return;
        }
    };

    println!();
    println!("{}", applied_table(&applied));
    print_section("Before", &action_summary(&before, &labels).replace('\n', "\n  "));
    print_section("After", &action_summary(&matrix, &labels).replace('\n', "\n  "));

    if let Some(i) = combo_idx {
        let name = combo_at(i).map(|c| c.to_string()).unwrap_or_default();
        let freqs = |m: &StrategyMatrix| {
            (0..m.num_actions())
                .map(|a| m.get(a, i).round_dp(4).to_string())
                .collect::<Vec<_>>()
                .join(" / ")
        };
        print_section(
            &format!("Combo {}", name),
            &format!("{}  ->  {}", freqs(&before), freqs(&matrix)),
        );
    }

    match out {
        Some(path) => match std::fs::write(&path, matrix.serialize()) {
            Ok(()) => print_success(&format!("\n  Wrote {}", path.display())),
            Err(e) => print_error(&e.to_string()),
        },
        None => println!("\n  {}", "Dry run: pass --out to write the strategy".dimmed()),
    }
    println!();
}

fn cmd_categories(tables: &CategoryTables) {
    println!();
    println!("{}", categories_table(tables));
    println!();
}
