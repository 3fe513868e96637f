//! Batch checking that two ways of loading the same files produce equivalent cubes.
//!
//! Files are found by walking a directory tree or by reading a list, then each one is loaded by
//! a reference loader and by a candidate loader, and the two cube lists are compared with
//! `cubecmp::compare_cubelists`. The report has one entry per file: a header line giving its size,
//! then a line giving the outcome.
//!
use std::path::Path;

use cubecmp::{Comparator, Comparison};

mod discover;
mod errors;
mod loader;
mod scan;

#[cfg(test)]
mod testing;

pub use discover::{find_targets, parse_list, read_list, walk, Target, SKIP_MARKER};
pub use errors::{Error, Result};
pub use loader::{JsonLoader, Loader};
pub use scan::{Outcome, ScanConfig, ScanEntry, Scanner, SkipReason, Summary, DEFAULT_MAX_MEGABYTES};

/// Load two files with the same loader and compare what comes out.
///
/// Unlike a scan, failures to load are errors rather than outcomes.
///
pub fn compare_files<L: Loader>(
    loader: &L,
    reference: &Path,
    candidate: &Path,
    comparator: &Comparator,
) -> Result<Comparison> {
    let reference = loader.load(reference)?;
    let candidate = loader.load(candidate)?;

    Ok(comparator.compare_cubelists(&reference, &candidate)?)
}
