use std::fmt;
use std::fs;

use cubecmp::{Comparator, Tolerance};
use tracing::{debug, info, warn};

use crate::discover::Target;
use crate::loader::Loader;

/// Files bigger than this are skipped without being loaded.
pub const DEFAULT_MAX_MEGABYTES: f64 = 350.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanConfig {
    /// Size limit, in units of 10^6 bytes.
    pub max_megabytes: f64,

    pub tolerance: Tolerance,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_megabytes: DEFAULT_MAX_MEGABYTES,
            tolerance: Tolerance::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Excluded by a marker in the file list.
    Marked,
    TooLarge,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Marked => write!(f, "marked"),
            SkipReason::TooLarge => write!(f, "too large"),
        }
    }
}

/// What happened to one file.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Match,

    /// Matched, with notes about cosmetic differences.
    SoftMatch(String),

    Mismatch(String),

    /// The reference loader failed. The candidate loader was never tried.
    ReferenceLoadError(String),

    CandidateLoadError(String),

    Skipped(SkipReason),
}

impl Outcome {
    /// Whether this outcome should fail a run. Skipped files don't.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::Mismatch(_) | Outcome::ReferenceLoadError(_) | Outcome::CandidateLoadError(_)
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Match => write!(f, "  + OK"),
            Outcome::SoftMatch(notes) => write!(f, "  + OK ({notes})"),
            Outcome::Mismatch(diagnostic) => write!(f, "  -- MATCH FAIL: {diagnostic}"),
            Outcome::ReferenceLoadError(msg) => write!(f, "  XXX reference load fails : {msg}"),
            Outcome::CandidateLoadError(msg) => write!(f, "  --- candidate load fails : {msg}"),
            Outcome::Skipped(_) => write!(f, "  ((skip))"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScanEntry {
    pub label: String,
    pub megabytes: f64,
    pub outcome: Outcome,
}

impl ScanEntry {
    pub fn header(&self) -> String {
        format!("{:<60}   {:8.3}Mb", self.label, self.megabytes)
    }
}

impl fmt::Display for ScanEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.header(), self.outcome)
    }
}

/// Count of each kind of outcome over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub matched: usize,
    pub soft_matched: usize,
    pub mismatched: usize,
    pub reference_failed: usize,
    pub candidate_failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn add(&mut self, outcome: &Outcome) {
        let count = match outcome {
            Outcome::Match => &mut self.matched,
            Outcome::SoftMatch(_) => &mut self.soft_matched,
            Outcome::Mismatch(_) => &mut self.mismatched,
            Outcome::ReferenceLoadError(_) => &mut self.reference_failed,
            Outcome::CandidateLoadError(_) => &mut self.candidate_failed,
            Outcome::Skipped(_) => &mut self.skipped,
        };
        *count += 1;
    }

    pub fn total(&self) -> usize {
        self.matched
            + self.soft_matched
            + self.mismatched
            + self.reference_failed
            + self.candidate_failed
            + self.skipped
    }

    /// Every file that was compared matched.
    pub fn all_matched(&self) -> bool {
        self.mismatched + self.reference_failed + self.candidate_failed == 0
    }
}

impl<'a> FromIterator<&'a ScanEntry> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a ScanEntry>>(entries: I) -> Self {
        let mut summary = Summary::default();
        for entry in entries {
            summary.add(&entry.outcome);
        }

        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} OK, {} OK with notes, {} MATCH FAIL, {} reference load fails, \
             {} candidate load fails, {} skipped",
            self.total(),
            self.matched,
            self.soft_matched,
            self.mismatched,
            self.reference_failed,
            self.candidate_failed,
            self.skipped
        )
    }
}

/// Loads files through two loaders and checks that they agree.
pub struct Scanner<R, T> {
    reference: R,
    candidate: T,
    config: ScanConfig,
}

impl<R, T> Scanner<R, T>
where
    R: Loader,
    T: Loader<Cube = R::Cube>,
{
    pub fn new(reference: R, candidate: T, config: ScanConfig) -> Self {
        Self {
            reference,
            candidate,
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Compare a single file.
    ///
    /// The reference file is sized first, even when it's marked to be skipped. A file that can't
    /// be sized is reported as a reference load failure.
    ///
    pub fn scan_target(&self, target: &Target) -> ScanEntry {
        let entry = |megabytes, outcome| ScanEntry {
            label: target.label.clone(),
            megabytes,
            outcome,
        };

        let megabytes = match fs::metadata(&target.reference) {
            Ok(meta) => meta.len() as f64 * 1.0e-6,
            Err(err) => {
                warn!(path = %target.reference.display(), %err, "can't size file");
                let msg = format!("{}: {err}", target.reference.display());
                return entry(0.0, Outcome::ReferenceLoadError(msg));
            }
        };

        let outcome = if target.skip {
            Outcome::Skipped(SkipReason::Marked)
        } else if megabytes > self.config.max_megabytes {
            Outcome::Skipped(SkipReason::TooLarge)
        } else {
            self.compare(target)
        };
        match &outcome {
            Outcome::Skipped(reason) => debug!(label = %target.label, %reason, "skipped"),
            outcome if outcome.is_failure() => info!(label = %target.label, "{outcome}"),
            _ => debug!(label = %target.label, "matched"),
        }

        entry(megabytes, outcome)
    }

    fn compare(&self, target: &Target) -> Outcome {
        let reference = match self.reference.load(&target.reference) {
            Ok(cubes) => cubes,
            Err(err) => return Outcome::ReferenceLoadError(err.to_string()),
        };
        let candidate = match self.candidate.load(&target.candidate) {
            Ok(cubes) => cubes,
            Err(err) => return Outcome::CandidateLoadError(err.to_string()),
        };
        debug!(
            reference = self.reference.name(),
            candidate = self.candidate.name(),
            "comparing {} cubes with {}",
            reference.len(),
            candidate.len()
        );

        let comparator = Comparator::new(self.config.tolerance);
        match comparator.compare_cubelists(&reference, &candidate) {
            Ok(comparison) if comparison.is_clean() => Outcome::Match,
            Ok(comparison) if comparison.equal => Outcome::SoftMatch(comparison.diagnostic),
            Ok(comparison) => Outcome::Mismatch(comparison.diagnostic),
            Err(err) => Outcome::Mismatch(format!("cubes could not be compared: {err}")),
        }
    }

    /// Compare every target, in order.
    pub fn scan<I>(&self, targets: I) -> Vec<ScanEntry>
    where
        I: IntoIterator<Item = Target>,
    {
        targets
            .into_iter()
            .map(|target| self.scan_target(&target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::path::Path;
    use std::rc::Rc;

    use cubecmp::{CubeList, MemCoord, MemCube};

    use super::*;
    use crate::errors::{Error, Result};
    use crate::loader::JsonLoader;
    use crate::testing;

    /// A loader that always fails.
    struct Broken;

    impl Loader for Broken {
        type Cube = MemCube;

        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self, path: &Path) -> Result<Vec<MemCube>> {
            Err(Error::io(path, io::Error::new(io::ErrorKind::Other, "unreadable")))
        }
    }

    /// Counts how often it's asked to load.
    struct Counting {
        calls: Rc<Cell<usize>>,
        inner: JsonLoader,
    }

    impl Loader for Counting {
        type Cube = MemCube;

        fn name(&self) -> &str {
            self.inner.name()
        }

        fn load(&self, path: &Path) -> Result<Vec<MemCube>> {
            self.calls.set(self.calls.get() + 1);
            self.inner.load(path)
        }
    }

    fn json_scanner() -> Scanner<JsonLoader, JsonLoader> {
        Scanner::new(
            JsonLoader::named("normal"),
            JsonLoader::named("structured"),
            ScanConfig::default(),
        )
    }

    fn pair(dir: &Path, reference: Vec<MemCube>, candidate: Vec<MemCube>) -> Target {
        let ref_path = dir.join("ref/file.json");
        testing::write_cubes(&ref_path, &CubeList::from(reference));
        testing::write_cubes(&dir.join("cand/file.json"), &CubeList::from(candidate));

        Target::new(ref_path)
            .relocate(&dir.join("ref"), &dir.join("cand"))
            .unwrap()
    }

    #[test]
    fn test_match() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(
            dir.path(),
            vec![testing::cube("a"), testing::cube("b")],
            vec![testing::cube("b"), testing::cube("a")],
        );

        let entry = json_scanner().scan_target(&target);
        assert_eq!(entry.outcome, Outcome::Match);
        assert!(entry.megabytes > 0.0);
        assert!(entry.to_string().ends_with("Mb\n  + OK"));
    }

    #[test]
    fn test_soft_match() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(
            dir.path(),
            vec![testing::cube("a")],
            vec![testing::inverted("a")],
        );

        let entry = json_scanner().scan_target(&target);
        assert_eq!(
            entry.outcome,
            Outcome::SoftMatch(String::from("Coord 'x' differs under exact comparison."))
        );
        assert_eq!(
            entry.outcome.to_string(),
            "  + OK (Coord 'x' differs under exact comparison.)"
        );
    }

    #[test]
    fn test_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(
            dir.path(),
            vec![testing::cube("a"), testing::cube("b")],
            vec![testing::cube("a")],
        );

        let entry = json_scanner().scan_target(&target);
        assert_eq!(
            entry.outcome,
            Outcome::Mismatch(String::from("cubelists of different lengths"))
        );
        assert_eq!(
            entry.outcome.to_string(),
            "  -- MATCH FAIL: cubelists of different lengths"
        );
        assert!(entry.outcome.is_failure());
    }

    #[test]
    fn test_comparison_aborted() {
        let dir = tempfile::tempdir().unwrap();
        let mut broken = testing::cube("a");
        let extra = MemCoord::aux(ndarray::arr1(&[1_i32, 2, 3])).with_long_name("x");
        broken.add_aux_coord(extra, &[0]).unwrap();
        let target = pair(dir.path(), vec![testing::cube("a")], vec![broken]);

        let entry = json_scanner().scan_target(&target);
        match entry.outcome {
            Outcome::Mismatch(msg) => assert!(msg.starts_with("cubes could not be compared: ")),
            outcome => panic!("unexpected outcome {outcome:?}"),
        }
    }

    #[test]
    fn test_reference_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(dir.path(), vec![testing::cube("a")], vec![testing::cube("a")]);

        let calls = Rc::new(Cell::new(0));
        let candidate = Counting {
            calls: Rc::clone(&calls),
            inner: JsonLoader::new(),
        };
        let scanner = Scanner::new(Broken, candidate, ScanConfig::default());
        let entry = scanner.scan_target(&target);
        let expected = format!("{}: unreadable", target.reference.display());
        assert_eq!(entry.outcome, Outcome::ReferenceLoadError(expected.clone()));
        assert_eq!(
            entry.outcome.to_string(),
            format!("  XXX reference load fails : {expected}")
        );
        assert_eq!(calls.get(), 0);

        // The same loader is used once both sides load
        let counting = Counting {
            calls: Rc::clone(&calls),
            inner: JsonLoader::new(),
        };
        let scanner = Scanner::new(JsonLoader::new(), counting, ScanConfig::default());
        assert_eq!(scanner.scan_target(&target).outcome, Outcome::Match);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_misshapen_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(dir.path(), vec![testing::cube("a")], vec![testing::cube("a")]);

        testing::write_misshapen_bounds(&target.reference, "a");
        let entry = json_scanner().scan_target(&target);
        match entry.outcome {
            Outcome::ReferenceLoadError(msg) => assert!(msg.contains("bounds shape []"), "{msg}"),
            outcome => panic!("unexpected outcome {outcome:?}"),
        }

        testing::write_cubes(&target.reference, &CubeList::from(vec![testing::cube("a")]));
        testing::write_misshapen_bounds(&target.candidate, "a");
        let entry = json_scanner().scan_target(&target);
        assert!(matches!(entry.outcome, Outcome::CandidateLoadError(_)));
    }

    #[test]
    fn test_candidate_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(dir.path(), vec![testing::cube("a")], vec![testing::cube("a")]);

        let scanner = Scanner::new(JsonLoader::new(), Broken, ScanConfig::default());
        let entry = scanner.scan_target(&target);
        let expected = format!("{}: unreadable", target.candidate.display());
        assert_eq!(entry.outcome, Outcome::CandidateLoadError(expected.clone()));
        assert_eq!(
            entry.outcome.to_string(),
            format!("  --- candidate load fails : {expected}")
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = Target::new(dir.path().join("nope.json"));

        let entry = json_scanner().scan_target(&target);
        assert_eq!(entry.megabytes, 0.0);
        assert!(matches!(entry.outcome, Outcome::ReferenceLoadError(_)));
    }

    #[test]
    fn test_skip_marked() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = pair(dir.path(), vec![testing::cube("a")], vec![]);
        target.skip = true;
        target.label = format!("#{}", target.label);

        // Would be a mismatch, and the broken loader would fail, if anything were loaded.
        let scanner = Scanner::new(Broken, Broken, ScanConfig::default());
        let entry = scanner.scan_target(&target);
        assert_eq!(entry.outcome, Outcome::Skipped(SkipReason::Marked));
        assert!(entry.megabytes > 0.0);
        assert_eq!(entry.outcome.to_string(), "  ((skip))");
        assert!(entry.header().starts_with('#'));
    }

    #[test]
    fn test_skip_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let target = pair(dir.path(), vec![testing::cube("a")], vec![testing::cube("a")]);

        let config = ScanConfig {
            max_megabytes: 1.0e-6,
            ..ScanConfig::default()
        };
        let scanner = Scanner::new(Broken, Broken, config);
        let entry = scanner.scan_target(&target);
        assert_eq!(entry.outcome, Outcome::Skipped(SkipReason::TooLarge));
        assert!(!entry.outcome.is_failure());
    }

    #[test]
    fn test_header() {
        let entry = ScanEntry {
            label: String::from("dir/file.pp"),
            megabytes: 1.25,
            outcome: Outcome::Match,
        };
        assert_eq!(
            entry.header(),
            format!("{:<60}      1.250Mb", "dir/file.pp")
        );
        assert_eq!(entry.header().len(), 60 + 3 + 8 + 2);
    }

    #[test]
    fn test_scan_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let short = dir.path().join("short.json");
        testing::write_cubes(&good, &CubeList::from(vec![testing::cube("a")]));
        testing::write_cubes(&short, &CubeList::default());
        let mut skipped = Target::new(&good);
        skipped.skip = true;

        let targets = vec![
            Target::new(&good),
            Target::new(&short),
            skipped,
            Target::new(dir.path().join("missing.json")),
        ];
        let entries = json_scanner().scan(targets);
        assert_eq!(entries.len(), 4);

        let summary: Summary = entries.iter().collect();
        assert_eq!(
            summary,
            Summary {
                matched: 2,
                soft_matched: 0,
                mismatched: 0,
                reference_failed: 1,
                candidate_failed: 0,
                skipped: 1,
            }
        );
        assert!(!summary.all_matched());
        assert_eq!(
            summary.to_string(),
            "4 files: 2 OK, 0 OK with notes, 0 MATCH FAIL, 1 reference load fails, \
             0 candidate load fails, 1 skipped"
        );
    }

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.max_megabytes, 350.0);
        assert_eq!(config.tolerance, Tolerance::default());
    }
}
