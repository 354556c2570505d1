//! Approximate graph edit distance.
//!
//! Exact graph edit distance is NP-hard. Instead, an
//! [`EditDistanceGenerator`] produces a sequence of improving upper bounds,
//! and [`approximate`] keeps the last one it sees within a fixed budget of
//! estimates.
//!
//! ## Usage
//!
//! ```
//! use malgraph_ged::{Approximator, LocalSearchGed};
//! use malgraph_graph::EdgeGraph;
//!
//! let path = EdgeGraph::from_labelled([0, 1, 2], [(0, 1), (1, 2)]).unwrap();
//! let edge = EdgeGraph::from_labelled([0, 1], [(0, 1)]).unwrap();
//!
//! let approximator = Approximator::new(LocalSearchGed::default(), 10);
//! assert_eq!(approximator.approximate(&path, &edge).unwrap(), 2);
//! ```

mod error;
mod local_search;

use malgraph_graph::EdgeGraph;
use tracing::{debug_span, trace};

#[doc(inline)]
pub use crate::error::GedError;
#[doc(inline)]
pub use crate::local_search::{LocalSearch, LocalSearchGed};

/// Number of estimates requested per graph pair unless configured otherwise.
pub const DEFAULT_MAX_ESTIMATES: usize = 10;

/// A source of successively better graph edit distance estimates.
///
/// Each value the iterator yields must be an upper bound on the true
/// distance and no larger than the value before it. The iterator may end at
/// any point, including before yielding anything.
pub trait EditDistanceGenerator {
    fn estimates<'a>(
        &'a self,
        g1: &'a EdgeGraph,
        g2: &'a EdgeGraph,
    ) -> impl Iterator<Item = u64> + 'a;
}

/// Returns the last of at most `max_estimates` estimates from `generator`.
///
/// The generator is never asked for more than `max_estimates` values. Fails
/// if it produced nothing before running out or if `max_estimates` is zero.
pub fn approximate<G: EditDistanceGenerator>(
    generator: &G,
    g1: &EdgeGraph,
    g2: &EdgeGraph,
    max_estimates: usize,
) -> Result<u64, GedError> {
    let _span = debug_span!(
        "approximate",
        nodes_1 = g1.node_count(),
        nodes_2 = g2.node_count(),
        max_estimates
    )
    .entered();

    let mut last = None;
    for (i, estimate) in
        generator.estimates(g1, g2).take(max_estimates).enumerate()
    {
        trace!(iteration = i + 1, estimate, "edit distance estimate");
        last = Some(estimate);
    }
    last.ok_or_else(|| GedError::no_estimate(max_estimates))
}

/// A generator paired with an estimate cap, applied to many graph pairs.
#[derive(Debug, Clone)]
pub struct Approximator<G> {
    generator: G,
    max_estimates: usize,
}

impl<G: EditDistanceGenerator> Approximator<G> {
    pub fn new(generator: G, max_estimates: usize) -> Self {
        Self {
            generator,
            max_estimates,
        }
    }

    pub fn max_estimates(&self) -> usize {
        self.max_estimates
    }

    /// See [`approximate`].
    pub fn approximate(
        &self,
        g1: &EdgeGraph,
        g2: &EdgeGraph,
    ) -> Result<u64, GedError> {
        approximate(&self.generator, g1, g2, self.max_estimates)
    }
}

impl Default for Approximator<LocalSearchGed> {
    fn default() -> Self {
        Self::new(LocalSearchGed::default(), DEFAULT_MAX_ESTIMATES)
    }
}
