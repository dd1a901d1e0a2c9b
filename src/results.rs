//! EVs at the root and action frequencies around a locked node.

use rust_decimal::Decimal;

use crate::endpoint::{parse_decimal, SolverEndpoint};
use crate::error::{NodelockError, NodelockResult};
use crate::family::Family;
use crate::node_id::NodeAddress;

/// `calc_results` at the root. MES and exploitability are only printed by
/// some solver versions.
#[derive(Debug, Clone, PartialEq)]
pub struct RootResults {
    pub ev_oop: Decimal,
    pub ev_ip: Decimal,
    pub mes_oop: Option<Decimal>,
    pub mes_ip: Option<Decimal>,
    pub exploitability: Option<Decimal>,
}

impl RootResults {
    /// Reads `key: value` lines (`EV OOP: 20.36`, `OOP's MES: 20.21`).
    /// Unknown keys are skipped.
    pub fn parse(lines: &[String]) -> NodelockResult<Self> {
        let (mut ev_oop, mut ev_ip) = (None, None);
        let (mut mes_oop, mut mes_ip, mut exploitability) = (None, None, None);

        for line in lines {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let slot = match key.trim().replace("'s", "").as_str() {
                "EV OOP" => &mut ev_oop,
                "EV IP" => &mut ev_ip,
                "OOP MES" => &mut mes_oop,
                "IP MES" => &mut mes_ip,
                "Exploitable for" => &mut exploitability,
                _ => continue,
            };
            *slot = Some(parse_decimal(value)?);
        }

        let missing = |what: &str| NodelockError::Protocol(format!("calc_results has no {}", what));
        Ok(Self {
            ev_oop: ev_oop.ok_or_else(|| missing("EV OOP"))?,
            ev_ip: ev_ip.ok_or_else(|| missing("EV IP"))?,
            mes_oop,
            mes_ip,
            exploitability,
        })
    }
}

/// Results for one locked node. Frequencies are percentages of the parent
/// line, rounded to two decimals, in solver child order.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResults {
    pub root: RootResults,
    /// The node and its siblings, as reached from their parent.
    pub siblings: Vec<Decimal>,
    /// The node's own children, as reached from the node.
    pub children: Vec<Decimal>,
}

/// `line / parent_line` as a percentage. A line the parent never reaches
/// is played 0% of the time.
pub fn action_frequency(line: Decimal, parent_line: Decimal) -> Decimal {
    if parent_line.is_zero() {
        return Decimal::ZERO;
    }
    (line / parent_line).round_dp(4) * Decimal::ONE_HUNDRED
}

fn frequencies<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    nodes: &[NodeAddress],
    parent_line: Decimal,
) -> NodelockResult<Vec<Decimal>> {
    nodes
        .iter()
        .map(|n| -> NodelockResult<Decimal> { Ok(action_frequency(endpoint.line_frequency(n)?, parent_line)) })
        .collect()
}

/// Reads root EVs, then how often each sibling and each child is played.
pub fn collect_results<E: SolverEndpoint + ?Sized>(
    endpoint: &mut E,
    family: &Family,
) -> NodelockResult<NodeResults> {
    let root = RootResults::parse(&endpoint.calc_results()?)?;

    let parent_line = endpoint.line_frequency(&family.parent)?;
    let siblings = frequencies(endpoint, &family.siblings, parent_line)?;

    let node_line = endpoint.line_frequency(&family.node)?;
    let children = frequencies(endpoint, &family.children, node_line)?;

    log::debug!("{} siblings {:?} children {:?}", family.node, siblings, children);
    Ok(NodeResults {
        root,
        siblings,
        children,
    })
}
