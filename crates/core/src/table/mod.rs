//! Tabular data structures
//!
//! `ValueTable` is the record collection the share/control pipeline runs on:
//! an ordered list of record identifiers with named numeric columns and named
//! label columns. Identifiers and column order round-trip through every
//! derivation; all derivations return a new table rather than mutating.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered table of records keyed by a stable identifier.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    ids: Vec<String>,
    /// Column names in insertion order, numeric and label alike
    order: Vec<String>,
    numeric: HashMap<String, Vec<f64>>,
    labels: HashMap<String, Vec<String>>,
}

impl ValueTable {
    /// Create a table with the given record identifiers and no columns
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            order: Vec::new(),
            numeric: HashMap::new(),
            labels: HashMap::new(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Record identifiers, in order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Column names, in insertion order
    pub fn columns(&self) -> &[String] {
        &self.order
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.numeric.contains_key(name) || self.labels.contains_key(name)
    }

    /// Get a numeric column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        self.numeric
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Get a label column
    pub fn label(&self, name: &str) -> Result<&[String]> {
        self.labels
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Return a new table with a numeric column appended
    pub fn with_numeric(&self, name: impl Into<String>, values: Vec<f64>) -> Result<ValueTable> {
        let name = name.into();
        self.check_new_column(&name, values.len())?;
        let mut out = self.clone();
        out.order.push(name.clone());
        out.numeric.insert(name, values);
        Ok(out)
    }

    /// Return a new table with a label column appended
    pub fn with_label(&self, name: impl Into<String>, values: Vec<String>) -> Result<ValueTable> {
        let name = name.into();
        self.check_new_column(&name, values.len())?;
        let mut out = self.clone();
        out.order.push(name.clone());
        out.labels.insert(name, values);
        Ok(out)
    }

    fn check_new_column(&self, name: &str, len: usize) -> Result<()> {
        if self.has_column(name) {
            return Err(Error::DuplicateColumn(name.to_string()));
        }
        if len != self.ids.len() {
            return Err(Error::LengthMismatch {
                expected: self.ids.len(),
                actual: len,
            });
        }
        Ok(())
    }
}

/// An externally authoritative total that proportional shares are rescaled
/// to match: one scalar for an ungrouped series, or one total per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControlTotal {
    Scalar(f64),
    PerGroup(HashMap<String, f64>),
}

impl ControlTotal {
    pub fn is_scalar(&self) -> bool {
        matches!(self, ControlTotal::Scalar(_))
    }

    /// Total for one group label; errors when the label has no entry
    pub fn for_group(&self, group: &str) -> Result<f64> {
        match self {
            ControlTotal::Scalar(v) => Ok(*v),
            ControlTotal::PerGroup(map) => map
                .get(group)
                .copied()
                .ok_or_else(|| Error::MissingControlGroup(group.to_string())),
        }
    }
}
