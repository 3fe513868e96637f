//! Tolerant equivalence checks between cubes loaded by two different routes.
//!
//! Each check yields a `Comparison`: a verdict plus a diagnostic. A failed verdict always comes
//! with a diagnostic naming what is wrong. A successful verdict may also carry a diagnostic,
//! listing "soft" differences that don't change the physical content, such as dimensions stored
//! in a different order.
//!
mod coords;
mod cubelists;
mod cubes;

use std::fmt;

use crate::{
    errors::Result,
    tolerance::Tolerance,
    traits::{Coord, Cube},
};

pub use coords::{corner_values, endpoint_values, soft_differences};

/// Outcome of comparing two things.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub equal: bool,
    pub diagnostic: String,
}

impl Comparison {
    /// Equal, nothing to report.
    pub fn matched() -> Self {
        Self {
            equal: true,
            diagnostic: String::new(),
        }
    }

    /// Equal, with notes about cosmetic differences. No notes is the same as `matched`.
    pub fn soft<I>(notes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let notes: Vec<String> = notes.into_iter().collect();
        Self {
            equal: true,
            diagnostic: notes.join("; "),
        }
    }

    pub fn mismatch<S: Into<String>>(diagnostic: S) -> Self {
        Self {
            equal: false,
            diagnostic: diagnostic.into(),
        }
    }

    /// Equal with nothing at all to report.
    pub fn is_clean(&self) -> bool {
        self.equal && self.diagnostic.is_empty()
    }

    pub fn as_tuple(&self) -> (bool, &str) {
        (self.equal, &self.diagnostic)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.equal, self.diagnostic.is_empty()) {
            (true, true) => write!(f, "match"),
            (true, false) => write!(f, "match ({})", self.diagnostic),
            (false, _) => write!(f, "mismatch: {}", self.diagnostic),
        }
    }
}

/// Runs comparisons with a given numeric tolerance.
///
/// The tolerance only applies to the end point values of coordinates. Metadata is always compared
/// exactly.
///
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Comparator {
    pub tolerance: Tolerance,
}

impl Comparator {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Compare two coordinates, allowing for different storage types and for the direction of
    /// any axis to be inverted.
    ///
    pub fn compare_coords<C: Coord>(&self, reference: &C, candidate: &C) -> Comparison {
        coords::compare_coords(reference, candidate, &self.tolerance)
    }

    /// Compare two cubes, allowing for transposed and inverted dimensions.
    ///
    /// Only fails with `Err` if one of the cubes is malformed, eg has two coordinates with the
    /// same name.
    ///
    pub fn compare_cubes<C: Cube>(&self, reference: &C, candidate: &C) -> Result<Comparison> {
        cubes::compare_cubes(reference, candidate, &self.tolerance)
    }

    /// Compare two collections of cubes without regard to their order.
    ///
    /// Each reference cube is paired with the first remaining candidate cube that compares equal.
    ///
    pub fn compare_cubelists<C: Cube>(
        &self,
        reference: &[C],
        candidate: &[C],
    ) -> Result<Comparison> {
        cubelists::compare_cubelists(reference, candidate, &self.tolerance)
    }
}

/// `Comparator::compare_coords` with default tolerances.
pub fn compare_coords<C: Coord>(reference: &C, candidate: &C) -> Comparison {
    Comparator::default().compare_coords(reference, candidate)
}

/// `Comparator::compare_cubes` with default tolerances.
pub fn compare_cubes<C: Cube>(reference: &C, candidate: &C) -> Result<Comparison> {
    Comparator::default().compare_cubes(reference, candidate)
}

/// `Comparator::compare_cubelists` with default tolerances.
pub fn compare_cubelists<C: Cube>(reference: &[C], candidate: &[C]) -> Result<Comparison> {
    Comparator::default().compare_cubelists(reference, candidate)
}
