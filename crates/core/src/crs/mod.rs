//! Coordinate Reference System handling
//!
//! Both layers of an overlay must declare the same CRS; areas are only
//! comparable inside one projection, so the library never reprojects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The concrete definition backing a CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum CrsDef {
    /// EPSG code, e.g. 4326
    Epsg(u32),
    /// Well-known text definition
    Wkt(String),
    /// PROJ pipeline string
    Proj(String),
}

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    def: CrsDef,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self { def: CrsDef::Epsg(code) }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self { def: CrsDef::Wkt(wkt.into()) }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        Self { def: CrsDef::Proj(proj.into()) }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        match &self.def {
            CrsDef::Epsg(code) => Some(*code),
            _ => None,
        }
    }

    /// Check if two CRS are equivalent.
    ///
    /// Definitions of different kinds (EPSG vs WKT vs PROJ) are never
    /// considered equivalent, even when they describe the same projection.
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        self.def == other.def
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        match &self.def {
            CrsDef::Epsg(code) => format!("EPSG:{}", code),
            CrsDef::Proj(proj) => proj.clone(),
            // WKT can run to kilobytes; keep the identifier short
            CrsDef::Wkt(wkt) => format!("WKT:{}", &wkt[..wkt.len().min(50)]),
        }
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}
