//! Tolerant structural comparison of cubes: labeled, coordinate-indexed N-dimensional arrays.
//!
//! Two loaders reading the same file can produce cubes that hold the same physical content but
//! differ in dimension order, axis direction, storage types or coordinate kinds. The comparators
//! here look past those differences, and explain whatever differences remain.
//!
mod compare;
mod coord;
mod cube;
mod errors;
mod helpers;
mod metadata;
mod tolerance;
mod traits;
mod values;

#[cfg(test)]
mod testing;

pub use compare::compare_coords;
pub use compare::compare_cubelists;
pub use compare::compare_cubes;
pub use compare::corner_values;
pub use compare::endpoint_values;
pub use compare::soft_differences;
pub use compare::Comparator;
pub use compare::Comparison;

pub use coord::CoordKind;
pub use coord::MemCoord;
pub use cube::CubeList;
pub use cube::MemCube;
pub use metadata::AttrValue;
pub use metadata::CoordMetadata;
pub use metadata::CoordSystem;
pub use metadata::Metadata;
pub use values::DType;
pub use values::Values;

pub use errors::Error;
pub use errors::Result;
pub use helpers::fmt_summaries;
pub use tolerance::Tolerance;
pub use traits::Coord;
pub use traits::Cube;
