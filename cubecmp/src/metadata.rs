use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Names recognised as CF standard names by `Metadata::rename`.
///
/// Only the handful of names that turn up in the file types we compare. Anything else is treated
/// as a long name.
///
const STANDARD_NAMES: &[&str] = &[
    "air_pressure",
    "air_pressure_at_sea_level",
    "air_temperature",
    "altitude",
    "eastward_wind",
    "forecast_period",
    "forecast_reference_time",
    "grid_latitude",
    "grid_longitude",
    "height",
    "latitude",
    "longitude",
    "model_level_number",
    "northward_wind",
    "precipitation_flux",
    "pressure",
    "realization",
    "specific_humidity",
    "surface_altitude",
    "time",
];

/// A free-form attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::Float(value) => write!(f, "{value}"),
            AttrValue::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// The descriptive part of a cube or coordinate: everything except the numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standard_name<S: Into<String>>(mut self, name: S) -> Self {
        self.standard_name = Some(name.into());
        self
    }

    pub fn with_long_name<S: Into<String>>(mut self, name: S) -> Self {
        self.long_name = Some(name.into());
        self
    }

    pub fn with_var_name<S: Into<String>>(mut self, name: S) -> Self {
        self.var_name = Some(name.into());
        self
    }

    pub fn with_units<S: Into<String>>(mut self, units: S) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_attribute<S, V>(mut self, key: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<AttrValue>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The most descriptive name available: standard name, then long name, then variable name.
    pub fn name(&self) -> String {
        self.standard_name
            .as_ref()
            .or(self.long_name.as_ref())
            .or(self.var_name.as_ref())
            .cloned()
            .unwrap_or_else(|| String::from("unknown"))
    }

    /// Give this object a new name.
    ///
    /// A recognised standard name becomes the standard name, anything else becomes the long name.
    /// Either way the other two names are cleared so that `name()` returns `name`.
    ///
    pub fn rename<S: Into<String>>(&mut self, name: S) {
        let name = name.into();
        if STANDARD_NAMES.contains(&name.as_str()) {
            self.standard_name = Some(name);
            self.long_name = None;
        } else {
            self.standard_name = None;
            self.long_name = Some(name);
        }
        self.var_name = None;
    }

    pub fn units(&self) -> &str {
        self.units.as_deref().unwrap_or("unknown")
    }
}

/// Describes the coordinate reference system a coordinate is expressed in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordSystem {
    pub grid_mapping_name: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, f64>,
}

impl CoordSystem {
    pub fn new<S: Into<String>>(grid_mapping_name: S) -> Self {
        Self {
            grid_mapping_name: grid_mapping_name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter<S: Into<String>>(mut self, key: S, value: f64) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }
}

/// Everything about a coordinate that is compared as "metadata".
#[derive(Clone, Debug, PartialEq)]
pub struct CoordMetadata {
    pub metadata: Metadata,
    pub coord_system: Option<CoordSystem>,
}
