//! Check that cubes load the same by two routes.
//!
//! Main entry point for the `cubecmp-scan` command.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cubecmp::{Comparator, Tolerance};
use cubecmp_scan::{
    compare_files, find_targets, read_list, JsonLoader, Result, ScanConfig, Scanner, Summary,
    Target, DEFAULT_MAX_MEGABYTES,
};

/// Tolerant comparison of cube lists
#[derive(Parser, Debug)]
#[command(name = "cubecmp-scan")]
#[command(author, version, about = "Compare cubes loaded by two routes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Relative tolerance for coordinate values
    #[arg(long = "rtol", global = true, default_value_t = 1e-5)]
    rtol: f64,

    /// Absolute tolerance for coordinate values
    #[arg(long = "atol", global = true, default_value_t = 1e-8)]
    atol: f64,

    /// Verbose output, repeat for more
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare two JSON cube list files
    Compare {
        /// Reference cube list
        reference: PathBuf,

        /// Candidate cube list
        candidate: PathBuf,
    },

    /// Compare every file named in a list, or found under a directory
    Scan {
        /// File listing one path per line, '#' to skip an entry
        #[arg(long = "list", conflicts_with = "dir", required_unless_present = "dir")]
        list: Option<PathBuf>,

        /// Directory to walk for files
        #[arg(long = "dir")]
        dir: Option<PathBuf>,

        /// Only walk files with this extension
        #[arg(long = "extension", requires = "dir")]
        extension: Option<String>,

        /// Read candidates from the same relative paths under this directory
        #[arg(long = "candidate-root")]
        candidate_root: Option<PathBuf>,

        /// Skip files bigger than this many megabytes
        #[arg(long = "max-megabytes", default_value_t = DEFAULT_MAX_MEGABYTES)]
        max_megabytes: f64,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let tolerance = Tolerance::new(args.rtol, args.atol);
    let result = match args.command {
        Command::Compare {
            reference,
            candidate,
        } => run_compare(&reference, &candidate, tolerance),
        Command::Scan {
            list,
            dir,
            extension,
            candidate_root,
            max_megabytes,
        } => {
            let config = ScanConfig {
                max_megabytes,
                tolerance,
            };
            run_scan(list, dir, extension, candidate_root, config)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("cubecmp-scan: {err}");
            ExitCode::FAILURE
        }
    }
}

/// `-v` flags win over `RUST_LOG`, which wins over the quiet default.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_compare(reference: &Path, candidate: &Path, tolerance: Tolerance) -> Result<bool> {
    let comparator = Comparator::new(tolerance);
    let comparison = compare_files(&JsonLoader::new(), reference, candidate, &comparator)?;
    println!("{comparison}");

    Ok(comparison.equal)
}

fn run_scan(
    list: Option<PathBuf>,
    dir: Option<PathBuf>,
    extension: Option<String>,
    candidate_root: Option<PathBuf>,
    config: ScanConfig,
) -> Result<bool> {
    let (base, mut targets) = match (list, dir) {
        (Some(list), _) => {
            let base = list.parent().map(Path::to_path_buf).unwrap_or_default();
            (base, read_list(&list)?)
        }
        (None, Some(dir)) => {
            let targets = find_targets(&dir, extension.as_deref())?;
            (dir, targets)
        }
        // clap requires one or the other
        (None, None) => unreachable!(),
    };

    if let Some(root) = candidate_root {
        targets = targets
            .into_iter()
            .map(|target| target.relocate(&base, &root))
            .collect::<Result<Vec<Target>>>()?;
    }

    let scanner = Scanner::new(
        JsonLoader::named("reference"),
        JsonLoader::named("candidate"),
        config,
    );
    let mut summary = Summary::default();
    for target in &targets {
        let entry = scanner.scan_target(target);
        println!();
        println!("{entry}");
        summary.add(&entry.outcome);
    }
    println!();
    println!("{summary}");

    Ok(summary.all_matched())
}
