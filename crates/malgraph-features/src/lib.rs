//! Feature extraction from executable binaries.
//!
//! For each binary this crate records the global function call graph, in
//! the same edge-list form the graph-pair datasets use but labelled with
//! `[in_degree, out_degree]`, plus the number of system call instructions
//! (`syscall` on x86, `svc` on ARM) found in the disassembly.
//!
//! Disassembly is delegated to a [`BinaryAnalyzer`]. [`Radare2`] drives the
//! `r2` command line tool; tests substitute canned output.
//!
//! ## Usage
//!
//! ```
//! use malgraph_features::dot_to_geometric;
//!
//! let data = dot_to_geometric("digraph { main -> puts; main -> exit }").unwrap();
//! assert_eq!(data.num_nodes, 3);
//! assert_eq!(data.labels, vec![[0, 2], [1, 0], [1, 0]]);
//! ```

mod analyzer;
mod error;
mod extract;

#[doc(inline)]
pub use crate::analyzer::{AnalysisOutput, BinaryAnalyzer, Radare2};
#[doc(inline)]
pub use crate::error::FeaturesError;
#[doc(inline)]
pub use crate::extract::{dot_to_geometric, extract_all, file_to_features};
