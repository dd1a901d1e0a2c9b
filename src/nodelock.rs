//! Locking a node, and locking the same line across a folder of solver files.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::board::{remove_extension, ResolvedBoard};
use crate::categories::categorize;
use crate::config::CategoryTables;
use crate::endpoint::SolverEndpoint;
use crate::error::{NodelockError, NodelockResult};
use crate::family::{resolve_family, Family};
use crate::node_id::{NodeAddress, SaveMode};
use crate::redistribute::{apply_weight_spec, AppliedWeight};
use crate::results::{collect_results, NodeResults};
use crate::strategy::StrategyMatrix;
use crate::weights::{normalize_weight, WeightSpec};

/// Solve target as a fraction of the starting pot.
pub const DEFAULT_ACCURACY: Decimal = dec!(0.02);

#[derive(Debug, Clone)]
pub struct NodelockReport {
    pub family: Family,
    /// Board at the locked node (`As5h3s`).
    pub board: String,
    pub applied: Vec<AppliedWeight>,
}

/// Rewrites the strategy at `node`'s parent so `node` is taken at the weights'
/// frequencies, then locks the parent.
///
/// The new strategy is built before anything is sent, so a bad strategy or
/// weights file leaves the parent exactly as it was. Once unlocked, the parent
/// is locked again even if the write fails.
pub fn nodelock_node<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    node: &NodeAddress,
    weights: &WeightSpec,
    tables: &CategoryTables,
) -> NodelockResult<NodelockReport> {
    if !endpoint.is_tree_present()? {
        return Err(NodelockError::NoTreeLoaded);
    }

    let family = resolve_family(endpoint, node)?;
    let info = endpoint.show_node(node)?;
    let categories = categorize(endpoint, &info.board)?;

    let mut matrix = StrategyMatrix::load(endpoint, &family.parent)?;
    if matrix.num_actions() != family.siblings.len() {
        return Err(NodelockError::Protocol(format!(
            "{} has {} children but its strategy has {} rows",
            family.parent,
            family.siblings.len(),
            matrix.num_actions()
        )));
    }

    let applied = apply_weight_spec(&mut matrix, family.target_index, &categories, weights, tables)?;

    endpoint.unlock_node(&family.parent)?;
    let stored = matrix.store(endpoint, &family.parent);
    endpoint.lock_node(&family.parent)?;
    stored?;

    Ok(NodelockReport {
        family,
        board: info.board,
        applied,
    })
}

/// Sets the solve target to `fraction` of the tree's starting pot. Returns
/// the target in chips.
pub fn set_relative_accuracy<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    fraction: Decimal,
) -> NodelockResult<Decimal> {
    let chips = endpoint.tree_pot()? * normalize_weight(fraction);
    endpoint.set_accuracy(chips)?;
    Ok(chips)
}

/// A folder of solver files and where the locked copies go.
#[derive(Debug)]
pub struct BatchPlan {
    pub folder: PathBuf,
    pub output: PathBuf,
    pub files: Vec<String>,
    pub board: ResolvedBoard,
    /// Re-solve each tree after locking and save it again.
    pub solve: bool,
    /// Fraction of the pot; `None` keeps the accuracy stored in the tree.
    pub accuracy: Option<Decimal>,
}

impl BatchPlan {
    /// Locked copies go to [`BatchPlan::output_folder`]; no solve, default
    /// accuracy.
    pub fn new(
        folder: impl Into<PathBuf>,
        files: Vec<String>,
        board: ResolvedBoard,
        weights_file: &Path,
        board_file: &Path,
    ) -> Self {
        let folder = folder.into();
        Self {
            output: Self::output_folder(&folder, weights_file, board_file),
            folder,
            files,
            board,
            solve: false,
            accuracy: Some(DEFAULT_ACCURACY),
        }
    }

    /// Output folder named after the weights and board files, inside `folder`.
    pub fn output_folder(folder: &Path, weights_file: &Path, board_file: &Path) -> PathBuf {
        let stem = |p: &Path| {
            p.file_name()
                .map(|n| remove_extension(&n.to_string_lossy()).to_string())
                .unwrap_or_default()
        };
        folder.join(format!("NODELOCK_{}__{}", stem(weights_file), stem(board_file)))
    }

    pub fn save_mode(&self) -> SaveMode {
        SaveMode::for_board(self.board.board_kind)
    }
}

#[derive(Debug, Clone)]
pub struct FileResults {
    /// Right after locking, before any solve.
    pub unsolved: NodeResults,
    /// After the re-solve, when the plan asks for one.
    pub solved: Option<NodeResults>,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub file: String,
    pub node: Option<NodeAddress>,
    pub result: NodelockResult<NodelockReport>,
    /// Present whenever `result` is `Ok`.
    pub results: Option<FileResults>,
}

/// Locks every file in turn: load, lock, save, read results, optionally
/// solve and save again, free. A failing file is recorded and the batch
/// moves on.
pub fn run_batch<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    plan: &BatchPlan,
    weights: &WeightSpec,
    tables: &CategoryTables,
) -> Vec<FileOutcome> {
    let mode = plan.save_mode();
    let mut outcomes = Vec::with_capacity(plan.files.len());

    for file in &plan.files {
        let node = match plan.board.node_for(file) {
            Ok(node) => node.clone(),
            Err(e) => {
                log::warn!("skipping {}: {}", file, e);
                outcomes.push(FileOutcome {
                    file: file.clone(),
                    node: None,
                    result: Err(e),
                    results: None,
                });
                continue;
            }
        };

        log::info!("{:<32}{}", file, node);
        let (result, results) = match lock_file(endpoint, plan, file, &node, mode, weights, tables) {
            Ok((report, results)) => {
                log::info!(
                    "{:<32}saved ({} entries applied, {}) EV OOP {} IP {}",
                    file,
                    report.applied.len(),
                    mode.as_str(),
                    results.unsolved.root.ev_oop,
                    results.unsolved.root.ev_ip
                );
                (Ok(report), Some(results))
            }
            Err(e) => {
                log::warn!("{:<32}{}", file, e);
                (Err(e), None)
            }
        };
        outcomes.push(FileOutcome {
            file: file.clone(),
            node: Some(node),
            result,
            results,
        });
    }
    outcomes
}

fn lock_file<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    plan: &BatchPlan,
    file: &str,
    node: &NodeAddress,
    mode: SaveMode,
    weights: &WeightSpec,
    tables: &CategoryTables,
) -> NodelockResult<(NodelockReport, FileResults)> {
    endpoint.load_tree(&plan.folder.join(file))?;
    let locked = lock_loaded(endpoint, plan, file, node, mode, weights, tables);
    let freed = endpoint.free_tree();
    let locked = locked?;
    freed?;
    Ok(locked)
}

fn lock_loaded<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    plan: &BatchPlan,
    file: &str,
    node: &NodeAddress,
    mode: SaveMode,
    weights: &WeightSpec,
    tables: &CategoryTables,
) -> NodelockResult<(NodelockReport, FileResults)> {
    if let Some(fraction) = plan.accuracy {
        let chips = set_relative_accuracy(endpoint, fraction)?;
        log::debug!("{}: accuracy {} chips", file, chips);
    }

    let report = nodelock_node(endpoint, node, weights, tables)?;
    let saved = plan.output.join(file);
    endpoint.dump_tree(&saved, mode)?;
    let unsolved = collect_results(endpoint, &report.family)?;

    let solved = if plan.solve {
        log::info!("{:<32}solving", file);
        endpoint.solve()?;
        let solved = collect_results(endpoint, &report.family)?;
        endpoint.dump_tree(&saved, mode)?;
        Some(solved)
    } else {
        None
    };

    Ok((report, FileResults { unsolved, solved }))
}
