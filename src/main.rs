use anyhow::Context;
use clap::Parser;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::exit;
use tu_reduce::{load_single_entry, ReduceError, ReductionSession};

const DEFAULT_PATTERN: &str = r"Exception::raise\(\)";

/// Exit code for failures before the minimizer ever runs; the minimizer's
/// own exit code is propagated verbatim.
const SETUP_FAILURE: i32 = 2;

/// Reduce an indexer-crashing translation unit to a minimal reproducer.
#[derive(Parser)]
#[command(name = "tu-reduce", version)]
struct Cli {
    /// Path to a compilation database containing a single entry
    compdb: PathBuf,

    /// Extended regexp matched against the indexer's stdout+stderr
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Path to the indexer binary
    #[arg(long)]
    indexer: PathBuf,

    /// Source minimizer binary to drive
    #[arg(long, default_value = "creduce")]
    minimizer: PathBuf,

    /// Project root the main file must live under (default: current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Extra arguments passed through verbatim to the minimizer
    #[arg(last = true)]
    minimizer_args: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        let code = match err.downcast_ref::<ReduceError>() {
            Some(ReduceError::MinimizerFailure { code }) => *code,
            _ => SETUP_FAILURE,
        };
        exit(code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let entry = load_single_entry(&cli.compdb)
        .with_context(|| format!("Failed to load {}", cli.compdb.display()))?;
    let pattern = Regex::new(&cli.pattern).context("Invalid failure pattern")?;
    // The verification script runs from the sandbox, so both paths must
    // survive a change of working directory.
    let indexer = fs::canonicalize(&cli.indexer)
        .with_context(|| format!("Indexer not found at {}", cli.indexer.display()))?;
    let project_root = match cli.project_root {
        Some(root) => fs::canonicalize(&root)
            .with_context(|| format!("Project root not found at {}", root.display()))?,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let session = ReductionSession {
        entry,
        indexer,
        minimizer: cli.minimizer,
        project_root,
        failure_pattern: pattern,
        extra_args: cli.minimizer_args,
    };
    let seed = session.prepare_seed()?;
    session.run(seed.path())?;
    Ok(())
}
