//! In-memory solver that answers the text protocol for a tiny tree.
//!
//! Tree (flop As 5h 3s):
//!   r:0          -> r:0:c, r:0:b30
//!   r:0:c        -> r:0:c:c, r:0:c:b16, r:0:c:b55
//!   r:0:c:b16    -> r:0:c:b16:f, r:0:c:b16:c
//!
//! Strategy at r:0:c is 0.5 / 0.3 / 0.2 for every combo except the first
//! ten, which are out of range (all zero). Hand category of combo i is
//! i % 19 and draw category is i % 7.
//!
//! Line frequencies: r:0:c 0.6, then c / b16 / b55 at 0.3 / 0.24 / 0.06 and
//! b16's f / c at 0.06 / 0.18. The pot is 55. EVs move once `go` has run.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use pio_nodelock::combos::NUM_COMBOS;
use pio_nodelock::endpoint::SolverEndpoint;
use pio_nodelock::error::{NodelockError, NodelockResult};

pub const BOARD: &str = "As 5h 3s";
pub const OUT_OF_RANGE: usize = 10;

pub struct MockSolver {
    pub children: HashMap<String, Vec<String>>,
    pub strategies: HashMap<String, Vec<String>>,
    pub categories: HashMap<String, Vec<String>>,
    pub locked: HashSet<String>,
    pub fail_load: HashSet<String>,
    pub line_freqs: HashMap<String, String>,
    pub tree_present: bool,
    pub solved: bool,
    pub log: Vec<String>,
}

pub fn uniform_row(value: &str) -> String {
    (0..NUM_COMBOS)
        .map(|i| if i < OUT_OF_RANGE { "0" } else { value })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn category_lines() -> Vec<String> {
    let hand = (0..NUM_COMBOS).map(|i| (i % 19).to_string()).collect::<Vec<_>>().join(" ");
    let draw = (0..NUM_COMBOS).map(|i| (i % 7).to_string()).collect::<Vec<_>>().join(" ");
    vec![hand, draw]
}

impl MockSolver {
    pub fn new() -> MockSolver {
        let mut children = HashMap::new();
        children.insert("r:0".to_string(), vec!["r:0:c".to_string(), "r:0:b30".to_string()]);
        children.insert(
            "r:0:c".to_string(),
            vec!["r:0:c:c".to_string(), "r:0:c:b16".to_string(), "r:0:c:b55".to_string()],
        );
        children.insert(
            "r:0:c:b16".to_string(),
            vec!["r:0:c:b16:f".to_string(), "r:0:c:b16:c".to_string()],
        );

        let mut strategies = HashMap::new();
        strategies.insert(
            "r:0:c".to_string(),
            vec![uniform_row("0.5"), uniform_row("0.3"), uniform_row("0.2")],
        );

        let mut categories = HashMap::new();
        categories.insert(BOARD.replace(' ', ""), category_lines());

        let line_freqs = [
            ("r:0", "1"),
            ("r:0:c", "0.6"),
            ("r:0:b30", "0.4"),
            ("r:0:c:c", "0.3"),
            ("r:0:c:b16", "0.24"),
            ("r:0:c:b55", "0.06"),
            ("r:0:c:b16:f", "0.06"),
            ("r:0:c:b16:c", "0.18"),
        ]
        .iter()
        .map(|(n, f)| (n.to_string(), f.to_string()))
        .collect();

        MockSolver {
            children,
            strategies,
            categories,
            locked: HashSet::new(),
            fail_load: HashSet::new(),
            line_freqs,
            tree_present: true,
            solved: false,
            log: Vec::new(),
        }
    }

    pub fn commands_starting_with(&self, prefix: &str) -> Vec<&String> {
        self.log.iter().filter(|c| c.starts_with(prefix)).collect()
    }

    fn reject(line: &str) -> NodelockResult<Vec<String>> {
        Err(NodelockError::SolverError {
            command: line.to_string(),
            message: "ERROR: mock cannot answer".to_string(),
        })
    }
}

impl SolverEndpoint for MockSolver {
    fn command(&mut self, line: &str) -> NodelockResult<Vec<String>> {
        self.log.push(line.to_string());
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));

        match verb {
            "is_tree_present" => Ok(vec![self.tree_present.to_string()]),
            "show_children" => {
                let kids = self.children.get(rest).cloned().unwrap_or_default();
                let mut out = Vec::new();
                for (i, id) in kids.iter().enumerate() {
                    let grandkids = self.children.get(id).map(|k| k.len()).unwrap_or(0);
                    out.push(format!("child {}:", i));
                    out.push(id.clone());
                    out.push("OOP_DEC".to_string());
                    out.push(BOARD.to_string());
                    out.push("0 0 55".to_string());
                    out.push(format!("{} children", grandkids));
                    out.push("flags: PIO_CFR".to_string());
                    out.push(String::new());
                }
                Ok(out)
            }
            "show_node" => {
                let kids = self.children.get(rest).map(|k| k.len()).unwrap_or(0);
                Ok(vec![
                    rest.to_string(),
                    "IP_DEC".to_string(),
                    BOARD.to_string(),
                    "0 0 55".to_string(),
                    format!("{} children", kids),
                    "flags: PIO_CFR".to_string(),
                ])
            }
            "show_categories" => match self.categories.get(rest) {
                Some(lines) => Ok(lines.clone()),
                None => MockSolver::reject(line),
            },
            "show_strategy" => match self.strategies.get(rest) {
                Some(lines) => Ok(lines.clone()),
                None => MockSolver::reject(line),
            },
            "set_strategy" => {
                let (node, values) = rest.split_once(' ').unwrap_or((rest, ""));
                let values: Vec<&str> = values.split_whitespace().collect();
                if values.is_empty() || values.len() % NUM_COMBOS != 0 {
                    return MockSolver::reject(line);
                }
                let rows = values.chunks(NUM_COMBOS).map(|c| c.join(" ")).collect();
                self.strategies.insert(node.to_string(), rows);
                Ok(vec!["set_strategy ok!".to_string()])
            }
            "lock_node" => {
                self.locked.insert(rest.to_string());
                Ok(vec!["lock_node ok!".to_string()])
            }
            "unlock_node" => {
                self.locked.remove(rest);
                Ok(vec!["unlock_node ok!".to_string()])
            }
            "load_tree" => {
                if self.fail_load.contains(rest.trim_matches('"')) {
                    return MockSolver::reject(line);
                }
                self.tree_present = true;
                self.solved = false;
                Ok(vec!["load_tree ok!".to_string()])
            }
            "load_all_nodes" | "rebuild_forgotten_streets" | "dump_tree" => {
                Ok(vec![format!("{} ok!", verb)])
            }
            "show_tree_info" => Ok(vec![
                "#TreeVersion#2".to_string(),
                "#Pot#55".to_string(),
                format!("#Board#{}", BOARD),
            ]),
            "set_accuracy" => Ok(vec!["set_accuracy ok!".to_string()]),
            "go" => {
                self.solved = true;
                Ok(vec!["go ok!".to_string()])
            }
            "wait_for_solver" => Ok(vec!["wait_for_solver ok!".to_string()]),
            "calc_results" => {
                let (oop, ip) = if self.solved { ("21.25", "33.75") } else { ("20.5", "34.5") };
                Ok(vec![
                    format!("EV OOP: {}", oop),
                    format!("EV IP: {}", ip),
                    "OOP's MES: 20.4".to_string(),
                    "IP's MES: 34.6".to_string(),
                    "Exploitable for: 0.11".to_string(),
                ])
            }
            "calc_line_freq" => match self.line_freqs.get(rest) {
                Some(freq) => Ok(vec![freq.clone()]),
                None => MockSolver::reject(line),
            },
            "free_tree" => {
                self.tree_present = false;
                Ok(vec!["free_tree ok!".to_string()])
            }
            _ => MockSolver::reject(line),
        }
    }
}
