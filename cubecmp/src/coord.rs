use ndarray::{Array2, ArrayD};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{Error, Result},
    metadata::{AttrValue, CoordMetadata, CoordSystem, Metadata},
    traits::Coord,
    values::Values,
};

/// Whether a coordinate describes a single dimension or is auxiliary.
///
/// Loaders disagree on this for the same physical coordinate, so it never takes part in equality.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordKind {
    Dim,
    #[default]
    Aux,
}

/// An in-memory coordinate.
///
/// Deserializing runs the same bounds check as `set_bounds`.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCoord")]
pub struct MemCoord {
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coord_system: Option<CoordSystem>,

    #[serde(default)]
    pub kind: CoordKind,

    points: Values,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<Values>,
}

/// A `MemCoord` as written, before its bounds are checked.
#[derive(Deserialize)]
struct RawCoord {
    metadata: Metadata,

    #[serde(default)]
    coord_system: Option<CoordSystem>,

    #[serde(default)]
    kind: CoordKind,

    points: Values,

    #[serde(default)]
    bounds: Option<Values>,
}

impl TryFrom<RawCoord> for MemCoord {
    type Error = Error;

    fn try_from(raw: RawCoord) -> Result<Self> {
        let mut coord = MemCoord::new(raw.points, raw.kind);
        coord.metadata = raw.metadata;
        coord.coord_system = raw.coord_system;
        coord.set_bounds(raw.bounds)?;

        Ok(coord)
    }
}

impl MemCoord {
    pub fn new<V: Into<Values>>(points: V, kind: CoordKind) -> Self {
        Self {
            metadata: Metadata::new(),
            coord_system: None,
            kind,
            points: points.into(),
            bounds: None,
        }
    }

    pub fn dim<V: Into<Values>>(points: V) -> Self {
        Self::new(points, CoordKind::Dim)
    }

    pub fn aux<V: Into<Values>>(points: V) -> Self {
        Self::new(points, CoordKind::Aux)
    }

    pub fn with_long_name<S: Into<String>>(mut self, name: S) -> Self {
        self.metadata.long_name = Some(name.into());
        self
    }

    pub fn with_standard_name<S: Into<String>>(mut self, name: S) -> Self {
        self.metadata.standard_name = Some(name.into());
        self
    }

    pub fn with_var_name<S: Into<String>>(mut self, name: S) -> Self {
        self.metadata.var_name = Some(name.into());
        self
    }

    pub fn with_units<S: Into<String>>(mut self, units: S) -> Self {
        self.metadata.units = Some(units.into());
        self
    }

    pub fn with_attribute<S, V>(mut self, key: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<AttrValue>,
    {
        self.metadata.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_coord_system(mut self, coord_system: CoordSystem) -> Self {
        self.coord_system = Some(coord_system);
        self
    }

    pub fn with_bounds<V: Into<Values>>(mut self, bounds: V) -> Result<Self> {
        self.set_bounds(Some(bounds))?;
        Ok(self)
    }

    pub fn rename<S: Into<String>>(&mut self, name: S) {
        self.metadata.rename(name);
    }

    pub fn values(&self) -> &Values {
        &self.points
    }

    pub fn bound_values(&self) -> Option<&Values> {
        self.bounds.as_ref()
    }

    /// Replace the points. Any existing bounds must still fit the new points.
    pub fn set_points<V: Into<Values>>(&mut self, points: V) -> Result<()> {
        let points = points.into();
        if let Some(bounds) = &self.bounds {
            self.check_bounds(points.shape(), bounds.shape())?;
        }
        self.points = points;

        Ok(())
    }

    pub fn set_bounds<V: Into<Values>>(&mut self, bounds: Option<V>) -> Result<()> {
        let bounds = bounds.map(Into::into);
        if let Some(bounds) = &bounds {
            self.check_bounds(self.points.shape(), bounds.shape())?;
        }
        self.bounds = bounds;

        Ok(())
    }

    /// Add contiguous bounds halfway between neighbouring points, with the outermost bounds
    /// extrapolated by half a step.
    ///
    pub fn guess_bounds(&mut self) -> Result<()> {
        let points = self.points.to_f64();
        let n = points.len();
        if points.ndim() != 1 || n < 2 {
            return Err(Error::GuessBounds(self.metadata.name()));
        }
        let points: Vec<f64> = points.iter().copied().collect();

        let mut edges = Vec::with_capacity(n + 1);
        edges.push(points[0] - (points[1] - points[0]) / 2.0);
        for pair in points.windows(2) {
            edges.push((pair[0] + pair[1]) / 2.0);
        }
        edges.push(points[n - 1] + (points[n - 1] - points[n - 2]) / 2.0);

        let bounds = Array2::from_shape_fn((n, 2), |(i, side)| edges[i + side]);
        self.set_bounds(Some(bounds))
    }

    fn check_bounds(&self, points_shape: &[usize], bounds_shape: &[usize]) -> Result<()> {
        let fits = bounds_shape.len() == points_shape.len() + 1
            && bounds_shape[..points_shape.len()] == *points_shape;
        if fits {
            Ok(())
        } else {
            Err(Error::BoundsShape {
                name: self.metadata.name(),
                points_shape: points_shape.to_vec(),
                bounds_shape: bounds_shape.to_vec(),
            })
        }
    }
}

impl Coord for MemCoord {
    type Metadata = CoordMetadata;

    fn name(&self) -> String {
        self.metadata.name()
    }

    fn metadata(&self) -> CoordMetadata {
        CoordMetadata {
            metadata: self.metadata.clone(),
            coord_system: self.coord_system.clone(),
        }
    }

    fn points(&self) -> ArrayD<f64> {
        self.points.to_f64()
    }

    fn bounds(&self) -> Option<ArrayD<f64>> {
        self.bounds.as_ref().map(Values::to_f64)
    }

    fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    fn shape(&self) -> Vec<usize> {
        self.points.shape().to_vec()
    }

    fn ndim(&self) -> usize {
        self.points.ndim()
    }

    fn reversed(&self, axis: usize) -> Self {
        let mut coord = self.clone();
        coord.points.invert_axis(axis);
        if let Some(bounds) = coord.bounds.as_mut() {
            bounds.invert_axis(axis);
        }

        coord
    }
}

/// Coordinates are equal if metadata and values match, whatever their kind or storage type.
impl PartialEq for MemCoord {
    fn eq(&self, other: &Self) -> bool {
        self.metadata == other.metadata
            && self.coord_system == other.coord_system
            && self.points == other.points
            && self.bounds == other.bounds
    }
}
