//! GML (Graph Modeling Language) serialization: a pure function from a
//! [`NetworkSnapshot`] to the text format described by the workspace's
//! external-interface contract.

use std::collections::HashMap;

use crate::domain::{Identifier, NetworkSnapshot};

/// Renders `id` as minimal-length lowercase hex, dropping leading zero
/// digits but keeping at least one.
fn minimal_hex(id: &Identifier) -> String {
    let full = format!("{id}");
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Serializes a network snapshot to GML, assigning every node a 0-based
/// integer id in join order and emitting one directed edge per
/// `(observer, observed)` routing-table membership.
pub fn to_gml(snapshot: &NetworkSnapshot) -> String {
    let ids: HashMap<Identifier, usize> =
        snapshot.nodes.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut out = String::new();
    out.push_str("graph\n[\n");

    for id in &snapshot.nodes {
        let numeric = ids[id];
        out.push_str("  node\n  [\n");
        out.push_str(&format!("    id {numeric}\n"));
        out.push_str(&format!("    comment \"{}\"\n", minimal_hex(id)));
        out.push_str("  ]\n");
    }

    for (owner, target) in &snapshot.edges {
        let source = ids[owner];
        let dest = ids[target];
        out.push_str("  edge\n  [\n");
        out.push_str(&format!("    source {source}\n"));
        out.push_str(&format!("    target {dest}\n"));
        out.push_str(&format!(
            "    comment \"{} -> {}\"\n",
            minimal_hex(owner),
            minimal_hex(target)
        ));
        out.push_str("  ]\n");
    }

    out.push_str("]\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(bits: u32, v: u64) -> Identifier {
        Identifier::from_u64(bits, v).unwrap()
    }

    #[test]
    fn empty_network_has_no_nodes_or_edges() {
        let snapshot = NetworkSnapshot { m: 8, k: 4, nodes: vec![], edges: vec![] };
        let gml = to_gml(&snapshot);
        assert!(!gml.contains("node"));
        assert!(!gml.contains("edge"));
    }

    #[test]
    fn single_node_round_trips_its_identifier_as_minimal_hex() {
        let snapshot = NetworkSnapshot { m: 8, k: 4, nodes: vec![id(8, 1)], edges: vec![] };
        let gml = to_gml(&snapshot);
        assert!(gml.contains("id 0"));
        assert!(gml.contains("comment \"1\""));
    }

    #[test]
    fn edges_reference_0_based_join_order_ids() {
        let a = id(8, 1);
        let b = id(8, 2);
        let snapshot =
            NetworkSnapshot { m: 8, k: 4, nodes: vec![a, b], edges: vec![(b, a)] };
        let gml = to_gml(&snapshot);
        assert!(gml.contains("source 1"));
        assert!(gml.contains("target 0"));
        assert!(gml.contains("comment \"2 -> 1\""));
    }
}
