//! Board files: which node to lock in each solver file.
//!
//! ```json
//! { "all": "r:0:c:b:turn", "KsQd8h.cfr": [40, "9h"], "Ah9c4d.cfr": [55, "2c"] }
//! ```
//!
//! `all` holds the shared line. Every other key names a file and lists the
//! moves that fill the shared line's placeholders for that file, in order.

use std::collections::VecDeque;

use serde_json::Value;

use crate::error::{NodelockError, NodelockResult};
use crate::node_id::{BoardKind, MoveValue, NodeAddress};

pub const SHARED_KEY: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub enum BoardSpec {
    Shared(NodeAddress),
    PerFile {
        template: NodeAddress,
        moves: Vec<(String, Vec<MoveValue>)>,
    },
}

impl BoardSpec {
    pub fn from_json(text: &str) -> NodelockResult<BoardSpec> {
        let doc: Value = serde_json::from_str(text)?;
        BoardSpec::from_document(&doc)
    }

    pub fn from_document(doc: &Value) -> NodelockResult<BoardSpec> {
        let map = doc
            .as_object()
            .ok_or_else(|| NodelockError::InvalidDocument("board file must be a JSON object".to_string()))?;

        let line = map.get(SHARED_KEY).ok_or(NodelockError::MissingSharedLine)?;
        let line = line.as_str().ok_or_else(|| {
            NodelockError::InvalidDocument(format!("\"{}\" must be a node ID string", SHARED_KEY))
        })?;
        let template = NodeAddress::parse(line)?;

        if map.len() == 1 {
            return Ok(BoardSpec::Shared(template));
        }

        let mut moves = Vec::with_capacity(map.len() - 1);
        for (file, value) in map.iter().filter(|(k, _)| k.as_str() != SHARED_KEY) {
            moves.push((file.clone(), parse_moves(file, value)?));
        }
        Ok(BoardSpec::PerFile { template, moves })
    }

    pub fn template(&self) -> &NodeAddress {
        match self {
            BoardSpec::Shared(template) => template,
            BoardSpec::PerFile { template, .. } => template,
        }
    }

    /// Turns the board file into one node ID per file.
    ///
    /// A shared line with placeholders fails for the whole batch. Per-file
    /// failures are kept next to their file so the other files still run.
    pub fn resolve(&self) -> NodelockResult<ResolvedBoard> {
        let board_kind = self.template().board_kind();
        match self {
            BoardSpec::Shared(template) => {
                if template.has_placeholders() {
                    return Err(NodelockError::MissingFileSpecificInfo(template.to_string()));
                }
                Ok(ResolvedBoard {
                    board_kind,
                    nodes: NodeBook::Shared(template.clone()),
                })
            }
            BoardSpec::PerFile { template, moves } => {
                let nodes = moves
                    .iter()
                    .map(|(file, file_moves)| {
                        let mut queue: VecDeque<MoveValue> = file_moves.iter().cloned().collect();
                        let node = template.concretize(&mut queue);
                        if let Err(e) = &node {
                            log::warn!("{}: {}", file, e);
                        }
                        (file.clone(), node)
                    })
                    .collect();
                Ok(ResolvedBoard {
                    board_kind,
                    nodes: NodeBook::PerFile(nodes),
                })
            }
        }
    }
}

fn parse_moves(file: &str, value: &Value) -> NodelockResult<Vec<MoveValue>> {
    let items = value
        .as_array()
        .ok_or_else(|| NodelockError::InvalidDocument(format!("moves for {} must be a list", file)))?;
    items
        .iter()
        .map(|item| match item {
            // fractional sizes are rejected per file when a bet consumes them
            Value::Number(n) => Ok(n
                .as_i64()
                .map(MoveValue::Number)
                .unwrap_or_else(|| MoveValue::Text(n.to_string()))),
            Value::String(s) => Ok(MoveValue::Text(s.clone())),
            other => Err(NodelockError::InvalidDocument(format!(
                "move {} for {} must be a number or a string",
                other, file
            ))),
        })
        .collect()
}

#[derive(Debug)]
pub enum NodeBook {
    Shared(NodeAddress),
    PerFile(Vec<(String, NodelockResult<NodeAddress>)>),
}

#[derive(Debug)]
pub struct ResolvedBoard {
    pub board_kind: BoardKind,
    pub nodes: NodeBook,
}

impl ResolvedBoard {
    /// Node ID for a solver file. Per-file entries may omit the extension.
    /// A file whose moves did not fit the template gets its own error back.
    pub fn node_for(&self, file: &str) -> NodelockResult<&NodeAddress> {
        match &self.nodes {
            NodeBook::Shared(node) => Ok(node),
            NodeBook::PerFile(nodes) => {
                let stem = remove_extension(file);
                let entry = nodes
                    .iter()
                    .find(|(name, _)| name == file)
                    .or_else(|| nodes.iter().find(|(name, _)| name == stem));
                match entry {
                    Some((_, Ok(node))) => Ok(node),
                    Some((_, Err(e))) => Err(e.clone()),
                    None => Err(NodelockError::FileNotInBoardSpec(file.to_string())),
                }
            }
        }
    }
}

pub fn remove_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
