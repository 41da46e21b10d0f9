//! Vector data structures
//!
//! A `Zone` is one polygonal feature with a stable identifier and named
//! numeric attributes; a `ZoneLayer` is an ordered collection of zones with
//! a declared CRS and a declared attribute column order. Zones within a
//! layer are assumed not to overlap one another (the overlay engine checks
//! this via share sums, it does not enforce it).

use std::collections::HashMap;

use geo_types::Geometry;

use crate::crs::CRS;
use crate::error::{Error, Result};

/// A polygonal feature with numeric attributes
#[derive(Debug, Clone)]
pub struct Zone {
    /// Stable record identifier
    pub id: String,
    /// Polygon or MultiPolygon geometry
    pub geometry: Geometry<f64>,
    values: HashMap<String, f64>,
}

impl Zone {
    /// Create a zone with no attributes
    pub fn new(id: impl Into<String>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
            values: HashMap::new(),
        }
    }

    /// Builder-style attribute assignment
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Get an attribute value. Missing attributes read as 0.
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Set an attribute value
    pub fn set_value(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }
}

/// Ordered collection of zones sharing one CRS
#[derive(Debug, Clone)]
pub struct ZoneLayer {
    crs: CRS,
    columns: Vec<String>,
    zones: Vec<Zone>,
}

impl ZoneLayer {
    /// Create an empty layer with the given CRS and attribute columns
    pub fn new(crs: CRS, columns: Vec<String>) -> Self {
        Self {
            crs,
            columns,
            zones: Vec::new(),
        }
    }

    pub fn crs(&self) -> &CRS {
        &self.crs
    }

    /// Attribute column names, in declared order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Append a zone during layer construction
    pub fn push(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    /// Return a new layer with a numeric attribute column appended.
    ///
    /// `values` must be aligned with the zone order.
    pub fn with_numeric_column(&self, name: impl Into<String>, values: Vec<f64>) -> Result<ZoneLayer> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if values.len() != self.zones.len() {
            return Err(Error::LengthMismatch {
                expected: self.zones.len(),
                actual: values.len(),
            });
        }
        let mut out = self.clone();
        out.columns.push(name.clone());
        for (zone, value) in out.zones.iter_mut().zip(values) {
            zone.set_value(name.clone(), value);
        }
        Ok(out)
    }
}

impl IntoIterator for ZoneLayer {
    type Item = Zone;
    type IntoIter = std::vec::IntoIter<Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.into_iter()
    }
}
