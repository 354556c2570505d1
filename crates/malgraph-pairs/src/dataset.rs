//! Indexed collections of graphs to sample from.

use malgraph_graph::EdgeGraph;

use crate::error::PairsError;

/// A fixed-size collection of graphs addressable by index.
pub trait GraphDataset {
    /// Number of graphs in the dataset.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads graph `index`, which must be below [`len`](Self::len).
    fn get(&self, index: usize) -> Result<EdgeGraph, PairsError>;
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    graphs: Vec<EdgeGraph>,
}

impl InMemoryDataset {
    pub fn new(graphs: Vec<EdgeGraph>) -> Self {
        Self { graphs }
    }
}

impl FromIterator<EdgeGraph> for InMemoryDataset {
    fn from_iter<I: IntoIterator<Item = EdgeGraph>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GraphDataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.graphs.len()
    }

    fn get(&self, index: usize) -> Result<EdgeGraph, PairsError> {
        self.graphs.get(index).cloned().ok_or_else(|| {
            PairsError::dataset(format!(
                "graph index {index} out of range for {} graphs",
                self.graphs.len()
            ))
        })
    }
}
