//! Routing-table implementation: k-buckets keyed by XOR-distance bit length.

mod bucket;
mod table;

pub use bucket::{Bucket, InsertOutcome};
pub use table::{RoutingTable, RoutingTableStats};
