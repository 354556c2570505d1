//! Schema definitions for malgraph output formats.
//!
//! This crate contains the flat records written by both malgraph pipelines.
//! Each record is serialized to one JSON object per file:
//!
//! - [`GedSample`]: a pair of graphs labelled with an approximate graph edit
//!   distance, in the layout SimGNN trains on.
//! - [`GeometricData`] and [`Features`]: a call graph as an edge list with
//!   `[in_degree, out_degree]` node labels, plus a syscall count.
//!
//! Records are plain values. They are constructed, serialized and dropped;
//! nothing mutates them after construction.

mod features;
mod ged_sample;
#[cfg(test)]
mod testutil;

use schemars::schema::RootSchema;

#[doc(inline)]
pub use features::*;
#[doc(inline)]
pub use ged_sample::*;

/// A directed edge between two dense node indices: `[source, target]`.
pub type Edge = [u32; 2];

/// Returns the JSON Schema of every record, keyed by record name.
///
/// Names are sorted so the output is stable across runs.
pub fn record_schemas() -> Vec<(&'static str, RootSchema)> {
    vec![
        ("Features", schemars::schema_for!(Features)),
        ("GedSample", schemars::schema_for!(GedSample)),
        ("GeometricData", schemars::schema_for!(GeometricData)),
    ]
}
