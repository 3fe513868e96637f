//! The capabilities the comparators need from a dataset container.
//!
//! Cubes produced by different loaders may come in entirely different concrete types. The
//! comparators only ever talk to them through these traits.
//!
use std::fmt::{Debug, Display};

use ndarray::ArrayD;

/// A named axis descriptor attached to a cube.
///
/// `PartialEq` is the container's own, exact notion of equality. The comparators only use it as a
/// last-resort cross check after their tolerant checks have passed.
///
pub trait Coord: Clone + PartialEq + Debug {
    /// Descriptive metadata. Its `PartialEq` decides whether two coordinates "mean" the same
    /// thing, independent of their values.
    type Metadata: PartialEq + Debug;

    fn name(&self) -> String;

    fn metadata(&self) -> Self::Metadata;

    /// Sample points, promoted to `f64`.
    fn points(&self) -> ArrayD<f64>;

    /// Cell bounds, shaped like the points with a trailing axis for the bound values.
    fn bounds(&self) -> Option<ArrayD<f64>>;

    fn has_bounds(&self) -> bool {
        self.bounds().is_some()
    }

    fn shape(&self) -> Vec<usize> {
        self.points().shape().to_vec()
    }

    fn ndim(&self) -> usize {
        self.points().ndim()
    }

    /// A copy of this coordinate with the order of points, and bounds, reversed along `axis`.
    ///
    /// Equivalent to indexing with `[..., ::-1, ...]`. Panics if `axis >= self.ndim()`.
    ///
    fn reversed(&self, axis: usize) -> Self;
}

/// A labeled N-dimensional array with coordinates.
///
/// `PartialEq` is the container's native value equality. `Display` should produce a short human
/// readable summary, which is embedded in diagnostics.
///
pub trait Cube: PartialEq + Debug + Display {
    type Coord: Coord;
    type Metadata: PartialEq + Debug;

    fn name(&self) -> String;

    fn shape(&self) -> Vec<usize>;

    fn ndim(&self) -> usize {
        self.shape().len()
    }

    fn metadata(&self) -> Self::Metadata;

    fn coords(&self) -> Vec<&Self::Coord>;

    fn coord(&self, name: &str) -> Option<&Self::Coord>;

    /// The cube dimensions spanned by `coord`, in the order of the coordinate's own axes.
    ///
    /// Empty for a scalar coordinate.
    ///
    fn coord_dims(&self, coord: &Self::Coord) -> Vec<usize>;
}
