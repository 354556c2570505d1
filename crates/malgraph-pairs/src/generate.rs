//! Writing labelled graph-pair samples to disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use malgraph_ged::{Approximator, EditDistanceGenerator};
use malgraph_schemas::GedSample;
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::dataset::GraphDataset;
use crate::error::{PairsError, PairsErrorKind};

/// Output options for [`generate`].
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Pretty-print each sample instead of writing compact JSON.
    pub pretty: bool,
    /// Log progress after this many samples. Zero disables progress logs.
    pub progress_every: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            progress_every: 500,
        }
    }
}

/// What a call to [`generate`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Number of sample files written.
    pub written: usize,
    pub elapsed: Duration,
}

/// Draws two graphs uniformly at random (with replacement) and labels the
/// pair with its approximate edit distance.
pub fn sample_pair<D, G, R>(
    dataset: &D,
    approximator: &Approximator<G>,
    rng: &mut R,
) -> Result<GedSample, PairsError>
where
    D: GraphDataset + ?Sized,
    G: EditDistanceGenerator,
    R: Rng + ?Sized,
{
    if dataset.is_empty() {
        return Err(PairsError::new(PairsErrorKind::EmptyDataset));
    }
    let first = rng.gen_range(0..dataset.len());
    let second = rng.gen_range(0..dataset.len());
    let g1 = dataset.get(first)?;
    let g2 = dataset.get(second)?;

    let ged = approximator.approximate(&g1, &g2)?;
    debug!(first, second, ged, "labelled pair");

    Ok(GedSample {
        graph_1: g1.edge_list(),
        graph_2: g2.edge_list(),
        labels_1: g1.degree_labels(),
        labels_2: g2.degree_labels(),
        ged,
    })
}

/// Writes `num_samples` labelled pairs to `directory/0`, `directory/1`, ...
///
/// The directory and its parents are created if missing. Samples are
/// produced one at a time: each is drawn, labelled and written before the
/// next begins. Existing files with the same names are overwritten.
#[instrument(skip(dataset, approximator, config, rng), fields(directory = %directory.display()))]
pub fn generate<D, G, R>(
    directory: &Path,
    dataset: &D,
    num_samples: usize,
    approximator: &Approximator<G>,
    config: &GenerateConfig,
    rng: &mut R,
) -> Result<GenerateSummary, PairsError>
where
    D: GraphDataset + ?Sized,
    G: EditDistanceGenerator,
    R: Rng + ?Sized,
{
    let start = Instant::now();
    fs::create_dir_all(directory)
        .map_err(|err| PairsError::io(directory, err))?;
    if num_samples > 0 && dataset.is_empty() {
        return Err(PairsError::new(PairsErrorKind::EmptyDataset));
    }

    info!(
        num_samples,
        graphs = dataset.len(),
        max_estimates = approximator.max_estimates(),
        "generating samples"
    );

    for idx in 0..num_samples {
        let sample = sample_pair(dataset, approximator, rng)?;
        write_sample(&directory.join(idx.to_string()), &sample, config.pretty)?;

        if config.progress_every > 0 && (idx + 1) % config.progress_every == 0 {
            info!(written = idx + 1, num_samples, "progress");
        }
    }

    let summary = GenerateSummary {
        written: num_samples,
        elapsed: start.elapsed(),
    };
    info!(
        written = summary.written,
        elapsed_ms = summary.elapsed.as_millis(),
        "finished"
    );
    Ok(summary)
}

fn write_sample(
    path: &Path,
    sample: &GedSample,
    pretty: bool,
) -> Result<(), PairsError> {
    let file = File::create(path).map_err(|err| PairsError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, sample)?;
    } else {
        serde_json::to_writer(&mut writer, sample)?;
    }
    writer.flush().map_err(|err| PairsError::io(path, err))
}

#[cfg(test)]
mod tests {
    use malgraph_ged::LocalSearchGed;
    use malgraph_graph::EdgeGraph;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::dataset::InMemoryDataset;

    fn approximator() -> Approximator<LocalSearchGed> {
        Approximator::default()
    }

    fn path_graph(n: u32) -> EdgeGraph {
        let mut graph = EdgeGraph::with_nodes(n);
        for i in 1..n {
            graph.add_edge(i - 1, i).unwrap();
        }
        graph
    }

    #[test]
    fn sample_from_single_graph_dataset() {
        let dataset = InMemoryDataset::new(vec![path_graph(3)]);
        let approximator = approximator();
        let mut rng = SmallRng::seed_from_u64(7);

        let sample = sample_pair(&dataset, &approximator, &mut rng).unwrap();
        assert_eq!(sample.graph_1, vec![[0, 1], [1, 2]]);
        assert_eq!(sample.graph_2, sample.graph_1);
        assert_eq!(sample.labels_1, vec![1, 2, 1]);
        assert_eq!(sample.labels_2, vec![1, 2, 1]);
        assert_eq!(sample.ged, 0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate(
            dir.path(),
            &InMemoryDataset::default(),
            1,
            &approximator(),
            &GenerateConfig::default(),
            &mut SmallRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(err.is_empty_dataset());
    }

    #[test]
    fn zero_samples_only_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let summary = generate(
            &out,
            &InMemoryDataset::default(),
            0,
            &approximator(),
            &GenerateConfig::default(),
            &mut SmallRng::seed_from_u64(0),
        )
        .unwrap();

        assert_eq!(summary.written, 0);
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn failed_approximation_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = InMemoryDataset::new(vec![path_graph(2)]);
        let err = generate(
            dir.path(),
            &dataset,
            3,
            &Approximator::new(LocalSearchGed::default(), 0),
            &GenerateConfig::default(),
            &mut SmallRng::seed_from_u64(0),
        )
        .unwrap_err();

        assert!(err.is_ged());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn pretty_output_parses() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = InMemoryDataset::new(vec![path_graph(4), path_graph(2)]);
        let config = GenerateConfig {
            pretty: true,
            progress_every: 1,
        };
        generate(
            dir.path(),
            &dataset,
            2,
            &approximator(),
            &config,
            &mut SmallRng::seed_from_u64(3),
        )
        .unwrap();

        let text = fs::read_to_string(dir.path().join("1")).unwrap();
        assert!(text.contains('\n'));
        let sample: GedSample = serde_json::from_str(&text).unwrap();
        assert_eq!(sample.labels_1.len(), sample.graph_1.len() + 1);
    }
}
