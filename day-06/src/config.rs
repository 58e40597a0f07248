use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, WrapErr};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use crate::search::Candidates;

const DEFAULT_DIRECTIVE: &str = "day_06=info";

#[derive(Debug, Parser)]
#[command(about = "Follow the lab guard's patrol and hunt for loop-inducing obstacles")]
pub struct Args {
    /// Puzzle input; defaults to the part's own input file
    pub input: Option<PathBuf>,

    /// Cells to try when placing the extra obstacle (part 2 only)
    #[arg(short, long, value_enum, default_value_t = CandidateSet::Path)]
    pub candidates: CandidateSet,

    /// Print the map with the walked route drawn on it
    #[arg(long)]
    pub render: bool,

    /// List every loop-inducing cell (part 2 only)
    #[arg(long)]
    pub placements: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CandidateSet {
    /// Every empty cell
    All,
    /// Cells on the guard's unobstructed route
    Path,
    /// The route plus its empty neighbours
    Neighbours,
}

impl From<CandidateSet> for Candidates {
    fn from(set: CandidateSet) -> Self {
        match set {
            CandidateSet::All => Candidates::AllEmpty,
            CandidateSet::Path => Candidates::OriginalPath,
            CandidateSet::Neighbours => Candidates::PathNeighbours,
        }
    }
}

impl Args {
    /// Reads the input file, falling back to `default` when none was given.
    pub fn read_input(&self, default: &str) -> miette::Result<String> {
        let path = self
            .input
            .clone()
            .unwrap_or_else(|| PathBuf::from(default));
        std::fs::read_to_string(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path.display()))
    }
}

/// Installs the fmt subscriber, honouring `RUST_LOG` when it is set.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .try_init();
}
