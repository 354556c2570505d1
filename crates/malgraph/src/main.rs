use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use malgraph_features::{Radare2, dot_to_geometric, extract_all, file_to_features};
use malgraph_pairs::{GenerateConfig, RunOptions};
use mimalloc::MiMalloc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Build graph-similarity training data from malware call graphs.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate SimGNN graph-pair samples from MalNet-Tiny
    ///
    /// Draws random pairs of graphs from the train and test splits, labels
    /// each pair with an approximate graph edit distance, and writes one
    /// JSON file per pair to <OUTPUT>/train/<i> and <OUTPUT>/test/<i>.
    Pairs {
        /// Dataset root containing `malnet-graphs-tiny` (directly or under `raw/`)
        #[arg(long, default_value = "data")]
        root: PathBuf,

        /// Directory to write the sample directories into
        #[arg(short, long, default_value = "simgnn/dataset")]
        output: PathBuf,

        /// Number of training samples
        #[arg(long, default_value_t = 8000)]
        train: usize,

        /// Number of test samples
        #[arg(long, default_value_t = 2000)]
        test: usize,

        /// Edit distance estimates to compute per pair before taking the last
        #[arg(long, default_value_t = malgraph_pairs::DEFAULT_MAX_ESTIMATES)]
        max_estimates: usize,

        /// Seed for pair selection (random if not specified)
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print sample files
        #[arg(long)]
        pretty: bool,
    },

    /// Extract call graph and syscall features from binaries with radare2
    ///
    /// With one binary and no --output, the record is printed to stdout.
    /// With several, one record per line. With --output, records are
    /// written to <OUTPUT>/<i> in argument order.
    Features {
        /// Binaries to analyse
        #[arg(required = true)]
        binaries: Vec<PathBuf>,

        /// Directory to write indexed feature files into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// radare2 executable
        #[arg(long, default_value = "r2")]
        r2: PathBuf,

        /// Do not save each call graph next to its binary as `.dot`
        #[arg(long)]
        no_dot: bool,
    },

    /// Convert a DOT call graph into an edge list with in/out degree labels
    Dot {
        /// DOT file to convert
        file: PathBuf,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the JSON Schema of every record this tool writes
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Output goes to stderr so JSON on stdout stays clean for piping.
    // Default to warn, allowlist our crates.
    const CRATES: &[&str] = &[
        "malgraph",
        "malgraph_features",
        "malgraph_ged",
        "malgraph_graph",
        "malgraph_pairs",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .init();

    match cli.command {
        Commands::Pairs {
            root,
            output,
            train,
            test,
            max_estimates,
            seed,
            pretty,
        } => {
            let options = RunOptions {
                train_samples: train,
                test_samples: test,
                max_estimates,
                seed,
                generate: GenerateConfig {
                    pretty,
                    ..GenerateConfig::default()
                },
            };
            let summaries = malgraph_pairs::run(&root, &output, &options)
                .with_context(|| {
                    format!("failed to generate samples from {}", root.display())
                })?;
            let written: usize = summaries.iter().map(|s| s.written).sum();
            info!(written, output = %output.display(), "done");
            Ok(())
        }
        Commands::Features {
            binaries,
            output,
            r2,
            no_dot,
        } => {
            let analyzer = Radare2::new(r2).with_dot_output(!no_dot);
            match output {
                Some(dir) => {
                    extract_all(&analyzer, binaries.as_slice(), &dir).with_context(|| {
                        format!("failed to extract features into {}", dir.display())
                    })?;
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut writer = stdout.lock();
                    for binary in &binaries {
                        let features = file_to_features(&analyzer, binary)
                            .with_context(|| {
                                format!("failed to analyse {}", binary.display())
                            })?;
                        serde_json::to_writer(&mut writer, &features)?;
                        writeln!(writer)?;
                    }
                }
            }
            Ok(())
        }
        Commands::Dot { file, output } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let data = dot_to_geometric(&text)
                .with_context(|| format!("failed to convert {}", file.display()))?;
            write_json(output.as_deref(), &data)
        }
        Commands::Schema => {
            let mut schemas = serde_json::Map::new();
            for (name, schema) in malgraph_schemas::record_schemas() {
                schemas.insert(name.to_owned(), serde_json::to_value(schema)?);
            }
            write_json(None, &schemas)
        }
    }
}

/// Writes `value` as pretty JSON to `path`, or to stdout.
fn write_json(path: Option<&Path>, value: &impl serde::Serialize) -> Result<()> {
    // Stdout must outlive the lock, so we bind it here first.
    let stdout = std::io::stdout();
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(stdout.lock()),
    };
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
