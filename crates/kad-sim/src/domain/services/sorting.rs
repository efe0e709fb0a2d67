//! Pure helpers for ranking identifiers by distance to a target.

use crate::domain::errors::SimError;
use crate::domain::value_objects::{DistanceNode, Identifier};

/// Sorts `candidates` by XOR distance to `target`, closest first.
pub fn sort_by_distance(candidates: &[Identifier], target: &Identifier) -> Result<Vec<Identifier>, SimError> {
    let mut ranked: Vec<DistanceNode> = candidates
        .iter()
        .map(|id| DistanceNode::new(*id, *target))
        .collect::<Result<_, _>>()?;
    ranked.sort();
    Ok(ranked.into_iter().map(|dn| dn.node_id).collect())
}
