//! The solver as a request/response text service.
//!
//! Every solver interaction goes through [`SolverEndpoint::command`]: one
//! command line in, the lines printed before the end marker out. The provided
//! methods wrap the handful of commands nodelocking needs. A solver holds one
//! tree at a time and is not reentrant, so every method takes `&mut self`.

use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{NodelockError, NodelockResult};
use crate::node_id::{NodeAddress, SaveMode};

pub const DEFAULT_END_STRING: &str = "END";

/// Summary of a node as printed by `show_node`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node: String,
    pub node_type: String,
    /// Compact board (`As5h3s`).
    pub board: String,
    pub pot: String,
    pub children: usize,
}

impl NodeInfo {
    // r:0:c / IP_DEC / As 5h 3s / 0 0 55 / 2 children / flags: PIO_CFR
    pub fn parse(lines: &[String]) -> NodelockResult<NodeInfo> {
        if lines.len() < 5 {
            return Err(NodelockError::Protocol(format!(
                "show_node returned {} lines, expected at least 5",
                lines.len()
            )));
        }
        let children = lines[4]
            .split_whitespace()
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| NodelockError::Protocol(format!("bad child count: {}", lines[4])))?;
        Ok(NodeInfo {
            node: lines[0].trim().to_string(),
            node_type: lines[1].trim().to_string(),
            board: lines[2].replace(' ', ""),
            pot: lines[3].trim().to_string(),
            children,
        })
    }
}

/// Node IDs from `show_children` output, in the order the solver lists them.
///
/// Each child is a block starting with `child N:` followed by its node ID.
pub fn parse_children(lines: &[String]) -> NodelockResult<Vec<NodeAddress>> {
    let mut ids = Vec::new();
    let mut iter = lines.iter();
    while let Some(line) = iter.next() {
        let line = line.trim();
        if line.starts_with("child ") && line.ends_with(':') {
            let id = iter
                .next()
                .ok_or_else(|| NodelockError::Protocol(format!("{} has no node ID", line)))?;
            ids.push(NodeAddress::parse_concrete(id)?);
        }
    }
    Ok(ids)
}

/// Plain (`0.25`) or scientific (`2.5e-05`) number as the solver prints it.
pub fn parse_decimal(text: &str) -> NodelockResult<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| NodelockError::Protocol(format!("bad number {}", text)))
}

/// Starting pot from `show_tree_info` (`#Pot#55`). A pot printed as several
/// amounts (`#Pot#0 0 55`) is their sum.
pub fn tree_info_pot(lines: &[String]) -> NodelockResult<Decimal> {
    let pot = lines
        .iter()
        .find_map(|l| l.trim().strip_prefix("#Pot#"))
        .ok_or_else(|| NodelockError::Protocol("show_tree_info has no #Pot# line".to_string()))?;
    let mut total = Decimal::ZERO;
    for amount in pot.split_whitespace() {
        total += parse_decimal(amount)?;
    }
    Ok(total)
}

pub trait SolverEndpoint {
    /// Sends one command, returns the output lines before the end marker.
    fn command(&mut self, line: &str) -> NodelockResult<Vec<String>>;

    fn is_tree_present(&mut self) -> NodelockResult<bool> {
        let out = self.command("is_tree_present")?;
        Ok(out.first().map(|l| l.trim()) == Some("true"))
    }

    fn children_of(&mut self, node: &NodeAddress) -> NodelockResult<Vec<NodeAddress>> {
        let out = self.command(&format!("show_children {}", node))?;
        parse_children(&out)
    }

    /// Raw `show_categories` output: hand indices, then draw indices.
    fn categories_of(&mut self, board: &str) -> NodelockResult<Vec<String>> {
        self.command(&format!("show_categories {}", board))
    }

    fn show_node(&mut self, node: &NodeAddress) -> NodelockResult<NodeInfo> {
        let out = self.command(&format!("show_node {}", node))?;
        NodeInfo::parse(&out)
    }

    /// Raw `show_strategy` output: one line per child, one value per combo.
    fn show_strategy(&mut self, node: &NodeAddress) -> NodelockResult<Vec<String>> {
        self.command(&format!("show_strategy {}", node))
    }

    /// `set_strategy` takes every child's values on a single line.
    fn set_strategy(&mut self, node: &NodeAddress, strategy: &str) -> NodelockResult<()> {
        let values = strategy.split_whitespace().collect::<Vec<_>>().join(" ");
        self.command(&format!("set_strategy {} {}", node, values))?;
        Ok(())
    }

    fn lock_node(&mut self, node: &NodeAddress) -> NodelockResult<()> {
        self.command(&format!("lock_node {}", node))?;
        Ok(())
    }

    fn unlock_node(&mut self, node: &NodeAddress) -> NodelockResult<()> {
        self.command(&format!("unlock_node {}", node))?;
        Ok(())
    }

    fn load_tree(&mut self, path: &Path) -> NodelockResult<()> {
        self.command(&format!("load_tree \"{}\"", path.display()))?;
        self.command("load_all_nodes")?;
        self.command("rebuild_forgotten_streets")?;
        Ok(())
    }

    fn dump_tree(&mut self, path: &Path, mode: SaveMode) -> NodelockResult<()> {
        self.command(&format!("dump_tree \"{}\" {}", path.display(), mode.as_str()))?;
        Ok(())
    }

    fn free_tree(&mut self) -> NodelockResult<()> {
        self.command("free_tree")?;
        Ok(())
    }

    /// Starts the solver and blocks until it stops.
    fn solve(&mut self) -> NodelockResult<()> {
        self.command("go")?;
        self.command("wait_for_solver")?;
        Ok(())
    }

    /// Raw `calc_results` output: EVs and MES at the root.
    fn calc_results(&mut self) -> NodelockResult<Vec<String>> {
        self.command("calc_results")
    }

    /// Share of all play that reaches `node`.
    fn line_frequency(&mut self, node: &NodeAddress) -> NodelockResult<Decimal> {
        let out = self.command(&format!("calc_line_freq {}", node))?;
        let first = out
            .iter()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| NodelockError::Protocol(format!("calc_line_freq {} printed nothing", node)))?;
        parse_decimal(first)
    }

    fn tree_pot(&mut self) -> NodelockResult<Decimal> {
        let out = self.command("show_tree_info")?;
        tree_info_pot(&out)
    }

    /// Target exploitability, in chips.
    fn set_accuracy(&mut self, chips: Decimal) -> NodelockResult<()> {
        self.command(&format!("set_accuracy {}", chips.normalize()))?;
        Ok(())
    }
}

/// Line protocol over any reader/writer pair, e.g. a solver's stdio pipes.
pub struct LineEndpoint<R: BufRead, W: Write> {
    reader: R,
    writer: W,
    end_string: String,
}

impl<R: BufRead, W: Write> LineEndpoint<R, W> {
    /// Wraps streams whose end marker is already configured.
    pub fn new(reader: R, writer: W, end_string: &str) -> Self {
        LineEndpoint {
            reader,
            writer,
            end_string: end_string.to_string(),
        }
    }

    /// Wraps fresh streams and tells the solver which end marker to print.
    pub fn connect(reader: R, writer: W, end_string: &str) -> NodelockResult<Self> {
        let mut endpoint = LineEndpoint::new(reader, writer, end_string);
        endpoint.command(&format!("set_end_string {}", end_string))?;
        Ok(endpoint)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> SolverEndpoint for LineEndpoint<R, W> {
    fn command(&mut self, line: &str) -> NodelockResult<Vec<String>> {
        log::debug!("-> {}", abbreviate(line));
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;

        let mut out = Vec::new();
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(NodelockError::Protocol(format!(
                    "solver closed the stream while answering `{}`",
                    abbreviate(line)
                )));
            }
            let received = buf.trim_end_matches(['\r', '\n']);
            if received.trim() == self.end_string {
                break;
            }
            out.push(received.to_string());
        }

        if let Some(err) = out.iter().find(|l| l.starts_with("ERROR")) {
            return Err(NodelockError::SolverError {
                command: abbreviate(line),
                message: err.clone(),
            });
        }
        Ok(out)
    }
}

/// Strategy pushes run to tens of thousands of characters.
fn abbreviate(line: &str) -> String {
    const MAX: usize = 80;
    match line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}
