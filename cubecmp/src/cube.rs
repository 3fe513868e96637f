use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use serde::{Deserialize, Serialize};

use crate::{
    coord::{CoordKind, MemCoord},
    errors::{Error, Result},
    helpers::fmt_summaries,
    metadata::{AttrValue, Metadata},
    traits::{Coord, Cube},
    values::Values,
};

/// An in-memory cube: a data array, its metadata, and the coordinates that describe its axes.
///
/// Coordinate names are not required to be unique here. A cube built with two coordinates of the
/// same name is a legal value, just one that the comparators will refuse to work with.
///
/// Deserializing attaches each coordinate through `add_aux_coord`, so loaded coordinates are
/// checked against the data shape.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCube")]
pub struct MemCube {
    pub metadata: Metadata,

    data: Values,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    coords: Vec<CoordEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct CoordEntry {
    coord: MemCoord,

    /// Cube dimensions spanned, one per coordinate axis
    dims: Vec<usize>,
}

/// A `MemCube` as written, before its coordinates are checked.
#[derive(Deserialize)]
struct RawCube {
    metadata: Metadata,
    data: Values,

    #[serde(default)]
    coords: Vec<CoordEntry>,
}

impl TryFrom<RawCube> for MemCube {
    type Error = Error;

    fn try_from(raw: RawCube) -> Result<Self> {
        let mut cube = MemCube::new(raw.data, raw.metadata);
        for entry in raw.coords {
            cube.add_aux_coord(entry.coord, &entry.dims)?;
        }

        Ok(cube)
    }
}

impl MemCube {
    pub fn new<V: Into<Values>>(data: V, metadata: Metadata) -> Self {
        Self {
            metadata,
            data: data.into(),
            coords: vec![],
        }
    }

    pub fn data(&self) -> &Values {
        &self.data
    }

    /// Replace the data array. The shape may not change, since coordinates are mapped onto it.
    pub fn set_data<V: Into<Values>>(&mut self, data: V) -> Result<()> {
        let data = data.into();
        if data.shape() != self.data.shape() {
            return Err(Error::CoordShape {
                name: self.metadata.name(),
                coord_shape: data.shape().to_vec(),
                extents: self.data.shape().to_vec(),
            });
        }
        self.data = data;

        Ok(())
    }

    pub fn rename<S: Into<String>>(&mut self, name: S) {
        self.metadata.rename(name);
    }

    pub fn set_attribute<S, V>(&mut self, key: S, value: V)
    where
        S: Into<String>,
        V: Into<AttrValue>,
    {
        self.metadata.attributes.insert(key.into(), value.into());
    }

    pub fn add_dim_coord(&mut self, coord: MemCoord, dim: usize) -> Result<()> {
        self.add_aux_coord(coord, &[dim])
    }

    /// Attach `coord`, mapping its axes onto `dims` in order.
    ///
    /// A scalar coordinate (`dims` empty) must hold exactly one point.
    ///
    pub fn add_aux_coord(&mut self, coord: MemCoord, dims: &[usize]) -> Result<()> {
        let shape = self.data.shape();
        let mut extents = Vec::with_capacity(dims.len());
        for &dim in dims {
            if dim >= shape.len() {
                return Err(Error::DimOutOfRange {
                    dim,
                    ndim: shape.len(),
                });
            }
            extents.push(shape[dim]);
        }

        let fits = if dims.is_empty() {
            coord.values().len() == 1
        } else {
            coord.values().shape() == extents.as_slice()
        };
        if !fits {
            return Err(Error::CoordShape {
                name: coord.name(),
                coord_shape: coord.values().shape().to_vec(),
                extents,
            });
        }

        self.coords.push(CoordEntry {
            coord,
            dims: dims.to_vec(),
        });

        Ok(())
    }

    /// Detach the first coordinate called `name` and return it.
    pub fn remove_coord(&mut self, name: &str) -> Option<MemCoord> {
        let index = self
            .coords
            .iter()
            .position(|entry| entry.coord.name() == name)?;

        Some(self.coords.remove(index).coord)
    }

    pub fn coord_mut(&mut self, name: &str) -> Option<&mut MemCoord> {
        self.coords
            .iter_mut()
            .find(|entry| entry.coord.name() == name)
            .map(|entry| &mut entry.coord)
    }

    /// Reorder the cube's dimensions so that new dimension `i` is old dimension `order[i]`.
    ///
    /// Coordinates keep their own axis order; only the cube dimensions they map to change.
    ///
    pub fn transpose(&mut self, order: &[usize]) -> Result<()> {
        let ndim = self.data.ndim();
        let mut seen = vec![false; ndim];
        for &dim in order {
            if dim >= ndim || seen[dim] {
                return Err(Error::BadTranspose(order.to_vec()));
            }
            seen[dim] = true;
        }
        if order.len() != ndim {
            return Err(Error::BadTranspose(order.to_vec()));
        }

        self.data.permute_axes(order);
        for entry in self.coords.iter_mut() {
            for dim in entry.dims.iter_mut() {
                if let Some(new_dim) = order.iter().position(|&old| old == *dim) {
                    *dim = new_dim;
                }
            }
        }

        Ok(())
    }

    /// A copy of this cube with dimension `dim` running backwards.
    ///
    /// The data and every coordinate that spans `dim` are inverted together, so the result
    /// describes exactly the same physical content.
    ///
    pub fn reversed(&self, dim: usize) -> Result<Self> {
        let ndim = self.data.ndim();
        if dim >= ndim {
            return Err(Error::DimOutOfRange { dim, ndim });
        }

        let mut cube = self.clone();
        cube.data.invert_axis(dim);
        for entry in cube.coords.iter_mut() {
            if let Some(axis) = entry.dims.iter().position(|&d| d == dim) {
                entry.coord = entry.coord.reversed(axis);
            }
        }

        Ok(cube)
    }

    /// Name used for dimension `dim` in the summary: a 1-d coordinate on just that dimension,
    /// preferring dimension coordinates.
    ///
    fn dim_label(&self, dim: usize) -> String {
        let on_dim = |entry: &&CoordEntry| entry.dims == [dim];
        self.coords
            .iter()
            .filter(on_dim)
            .find(|entry| entry.coord.kind == CoordKind::Dim)
            .or_else(|| self.coords.iter().find(on_dim))
            .map(|entry| entry.coord.name())
            .unwrap_or_else(|| String::from("--"))
    }
}

impl Cube for MemCube {
    type Coord = MemCoord;
    type Metadata = Metadata;

    fn name(&self) -> String {
        self.metadata.name()
    }

    fn shape(&self) -> Vec<usize> {
        self.data.shape().to_vec()
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    fn coords(&self) -> Vec<&MemCoord> {
        self.coords.iter().map(|entry| &entry.coord).collect()
    }

    fn coord(&self, name: &str) -> Option<&MemCoord> {
        self.coords
            .iter()
            .map(|entry| &entry.coord)
            .find(|coord| coord.name() == name)
    }

    fn coord_dims(&self, coord: &MemCoord) -> Vec<usize> {
        let name = coord.name();
        self.coords
            .iter()
            .find(|entry| std::ptr::eq(&entry.coord, coord))
            .or_else(|| self.coords.iter().find(|entry| entry.coord.name() == name))
            .map(|entry| entry.dims.clone())
            .unwrap_or_default()
    }
}

/// Native value equality: metadata, data values, and the same coordinates on the same dimensions
/// in any order.
///
impl PartialEq for MemCube {
    fn eq(&self, other: &Self) -> bool {
        if self.metadata != other.metadata
            || self.data != other.data
            || self.coords.len() != other.coords.len()
        {
            return false;
        }

        let mut used = vec![false; other.coords.len()];
        self.coords.iter().all(|entry| {
            let found = other
                .coords
                .iter()
                .enumerate()
                .position(|(i, candidate)| !used[i] && candidate == entry);
            match found {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

impl fmt::Display for MemCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / ({})", self.metadata.name(), self.metadata.units())?;

        let shape = self.data.shape();
        if shape.is_empty() {
            return write!(f, " (scalar cube)");
        }
        let dims: Vec<String> = shape
            .iter()
            .enumerate()
            .map(|(dim, extent)| format!("{}: {}", self.dim_label(dim), extent))
            .collect();

        write!(f, " ({})", dims.join("; "))
    }
}

/// An ordered collection of cubes, as returned by a loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubeList(pub Vec<MemCube>);

impl CubeList {
    pub fn new() -> Self {
        Self(vec![])
    }
}

impl From<Vec<MemCube>> for CubeList {
    fn from(cubes: Vec<MemCube>) -> Self {
        Self(cubes)
    }
}

impl Deref for CubeList {
    type Target = Vec<MemCube>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CubeList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for CubeList {
    type Item = MemCube;
    type IntoIter = std::vec::IntoIter<MemCube>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for CubeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "< No cubes >")
        } else {
            write!(f, "{}", fmt_summaries(&self.0))
        }
    }
}
