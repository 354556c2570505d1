//! Graph-pair dataset generation.
//!
//! Samples pairs of graphs from a malware call graph dataset, labels each
//! pair with an approximate graph edit distance, and writes one
//! [`GedSample`](malgraph_schemas::GedSample) JSON object per file. The
//! output is the training layout SimGNN reads: a directory of files named
//! `0`, `1`, `2`, ...
//!
//! ## Pipeline
//!
//! ```text
//! MalnetTiny split -> random pair -> Approximator -> GedSample -> <dir>/<idx>
//! ```
//!
//! Everything runs sequentially on the calling thread.

mod dataset;
mod error;
mod generate;
mod malnet;

use std::path::Path;

use malgraph_ged::{Approximator, LocalSearchGed};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info_span;

#[doc(inline)]
pub use crate::dataset::{GraphDataset, InMemoryDataset};
#[doc(inline)]
pub use crate::error::PairsError;
#[doc(inline)]
pub use crate::generate::{
    GenerateConfig, GenerateSummary, generate, sample_pair,
};
#[doc(inline)]
pub use malgraph_ged::DEFAULT_MAX_ESTIMATES;
#[doc(inline)]
pub use crate::malnet::{MalnetTiny, Split, parse_edgelist};

/// Settings for [`run`]. Defaults produce 8000 training and 2000 test
/// samples with at most 10 estimates per pair.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub train_samples: usize,
    pub test_samples: usize,
    pub max_estimates: usize,
    /// Seed for pair selection. `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub generate: GenerateConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            train_samples: 8000,
            test_samples: 2000,
            max_estimates: DEFAULT_MAX_ESTIMATES,
            seed: None,
            generate: GenerateConfig::default(),
        }
    }
}

/// Generates the training and test sample directories.
///
/// Reads the MalNet-Tiny `train` and `test` splits under `root` and writes
/// `output/train/<idx>` and `output/test/<idx>`. Returns one summary per
/// split, training first.
pub fn run(
    root: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &RunOptions,
) -> Result<Vec<GenerateSummary>, PairsError> {
    let (root, output) = (root.as_ref(), output.as_ref());
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let approximator =
        Approximator::new(LocalSearchGed::default(), options.max_estimates);

    let mut summaries = Vec::new();
    for (split, num_samples) in [
        (Split::Train, options.train_samples),
        (Split::Test, options.test_samples),
    ] {
        let _span = info_span!("split", %split).entered();
        let dataset = MalnetTiny::open(root, split)?;
        summaries.push(generate(
            &output.join(split.as_str()),
            &dataset,
            num_samples,
            &approximator,
            &options.generate,
            &mut rng,
        )?);
    }
    Ok(summaries)
}
