use std::result;

use ndarray::ShapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Two arrays handed to the tolerance routine don't hold the same number of values.
    #[error("operands could not be broadcast together with shapes ({0},) ({1},)")]
    ShapeMismatch(usize, usize),

    /// Corner sampling needs at least one value along every axis.
    #[error("axis {axis} has length zero, there are no end points to sample")]
    EmptyAxis { axis: usize },

    /// A coordinate doesn't fit the dimensions it was attached to.
    #[error("coord {name:?} has shape {coord_shape:?} but spans cube extents {extents:?}")]
    CoordShape {
        name: String,
        coord_shape: Vec<usize>,
        extents: Vec<usize>,
    },

    /// Bounds must be shaped like the points plus one trailing axis.
    #[error("coord {name:?} has points shape {points_shape:?} but bounds shape {bounds_shape:?}")]
    BoundsShape {
        name: String,
        points_shape: Vec<usize>,
        bounds_shape: Vec<usize>,
    },

    /// A dimension index outside the cube.
    #[error("dimension {dim} is out of range for a cube with {ndim} dimensions")]
    DimOutOfRange { dim: usize, ndim: usize },

    #[error("{0:?} is not a permutation of the cube dimensions")]
    BadTranspose(Vec<usize>),

    #[error("cannot guess bounds for coord {0:?}: need a 1-d coord with at least 2 points")]
    GuessBounds(String),

    /// Two coordinates on one cube share a name, so they can't be told apart.
    #[error("cube {cube:?} has more than one coord named {name:?}")]
    DuplicateCoordName { cube: String, name: String },

    /// A cube lists a coordinate by name but can't produce it.
    #[error("cube {cube:?} has no coord named {name:?}")]
    MissingCoord { cube: String, name: String },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

pub type Result<T> = result::Result<T, Error>;
