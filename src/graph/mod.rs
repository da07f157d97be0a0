//! Organization graph builder
//!
//! Turns a roster snapshot into the weighted undirected [`GraphView`] the
//! embedding stage samples from. Node indices are roster positions; direct
//! and functional supervisor links become edges at their configured weights.
//! The graph is rebuilt fresh on every run and never persisted.

use crate::roster::{EmployeeId, Roster};
use panorama_algorithms::GraphView;
use tracing::warn;

/// Default weight of a (employee, direct supervisor) edge
pub const DEFAULT_DIRECT_WEIGHT: f64 = 1.3;
/// Default weight of a (employee, functional supervisor) edge
pub const DEFAULT_FUNCTIONAL_WEIGHT: f64 = 1.0;

/// Build the weighted org graph for one roster.
///
/// One node per employee, isolated employees included. Self-referencing or
/// unresolvable supervisor ids skip the edge with a warning and never abort
/// the run. When the same person holds both supervisor roles the two
/// parallel edges are kept distinct.
pub fn build_org_graph(roster: &Roster, direct_weight: f64, functional_weight: f64) -> GraphView {
    let mut edges = Vec::new();

    for (index, record) in roster.iter().enumerate() {
        if let Some(supervisor_id) = &record.direct_supervisor_id {
            if let Some(target) = resolve(roster, &record.id, supervisor_id, "direct") {
                edges.push((index, target, direct_weight));
            }
        }
        if let Some(supervisor_id) = &record.functional_supervisor_id {
            if let Some(target) = resolve(roster, &record.id, supervisor_id, "functional") {
                edges.push((index, target, functional_weight));
            }
        }
    }

    GraphView::from_edges(roster.len(), &edges)
}

fn resolve(
    roster: &Roster,
    employee_id: &EmployeeId,
    supervisor_id: &EmployeeId,
    kind: &str,
) -> Option<usize> {
    if supervisor_id == employee_id {
        warn!(employee_id = %employee_id, kind, "employee references itself as supervisor, skipping edge");
        return None;
    }
    match roster.position(supervisor_id) {
        Some(index) => Some(index),
        None => {
            warn!(
                employee_id = %employee_id,
                supervisor_id = %supervisor_id,
                kind,
                "supervisor not in roster, skipping edge"
            );
            None
        }
    }
}
