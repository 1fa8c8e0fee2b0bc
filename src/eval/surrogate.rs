//! The surrogate predictor seam.
//!
//! A surrogate answers "what would this architecture score?" without
//! training it. Queries may fail for any reason; the evaluator absorbs
//! every failure.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::MetricSet;
use crate::arch::{ArchHash, Architecture};
use crate::error::MonasError;

/// Why a surrogate could not score an architecture.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurrogateError {
    #[error("architecture {0} is not in the benchmark table")]
    NotFound(ArchHash),

    #[error("field '{field}' is not numeric: {value}")]
    InvalidField { field: String, value: String },

    #[error("surrogate query failed: {0}")]
    Query(String),
}

/// Raw predictor response: a loosely typed record, as surrogate backends
/// hand them out.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SurrogateRecord(pub Map<String, Value>);

impl SurrogateRecord {
    pub const ACCURACY_FIELD: &'static str = "validation_accuracy";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Read a field as `f64`. Missing fields read as `0.0`; numbers, booleans
    /// and numeric strings are coerced; anything else is an error, and so is
    /// a string that parses to NaN.
    pub fn field(&self, field: &str) -> Result<f64, SurrogateError> {
        let invalid = |value: &Value| SurrogateError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
        };
        match self.0.get(field) {
            None => Ok(0.0),
            Some(v @ Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(v)),
            Some(Value::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
            Some(v @ Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(x) if !x.is_nan() => Ok(x),
                _ => Err(invalid(v)),
            },
            Some(other) => Err(invalid(other)),
        }
    }

    /// Extract the four objectives.
    pub fn metrics(&self) -> Result<MetricSet, SurrogateError> {
        Ok(MetricSet {
            accuracy: self.field(Self::ACCURACY_FIELD)?,
            latency: self.field("latency")?,
            params: self.field("params")?,
            flops: self.field("flops")?,
        })
    }
}

/// A performance predictor for architectures.
pub trait Surrogate {
    fn query(&self, arch: &Architecture) -> Result<SurrogateRecord, SurrogateError>;
}

impl<S: Surrogate + ?Sized> Surrogate for &S {
    fn query(&self, arch: &Architecture) -> Result<SurrogateRecord, SurrogateError> {
        (**self).query(arch)
    }
}

impl<S: Surrogate + ?Sized> Surrogate for Box<S> {
    fn query(&self, arch: &Architecture) -> Result<SurrogateRecord, SurrogateError> {
        (**self).query(arch)
    }
}

// ─── Lookup-table surrogate ────────────────────────────────────────

/// A surrogate backed by a table of pre-measured architectures, keyed by
/// content hash. Architectures outside the table fail to query.
#[derive(Clone, Debug, Default)]
pub struct TableSurrogate {
    entries: HashMap<ArchHash, SurrogateRecord>,
}

#[derive(Deserialize)]
struct TableEntry {
    architecture: Architecture,
    metrics: SurrogateRecord,
}

impl TableSurrogate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, arch: &Architecture, record: SurrogateRecord) {
        self.entries.insert(arch.hash(), record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `[{"architecture": {...}, "metrics": {...}}, ...]`.
    pub fn from_json(content: &str, origin: &Path) -> Result<Self, MonasError> {
        let rows: Vec<TableEntry> =
            serde_json::from_str(content).map_err(|e| MonasError::json(origin, e))?;
        let mut table = Self::new();
        for row in rows {
            table.insert(&row.architecture, row.metrics);
        }
        log::debug!(
            "loaded {} benchmark entries from {}",
            table.len(),
            origin.display()
        );
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, MonasError> {
        let content = std::fs::read_to_string(path).map_err(|e| MonasError::io(path, e))?;
        Self::from_json(&content, path)
    }
}

impl Surrogate for TableSurrogate {
    fn query(&self, arch: &Architecture) -> Result<SurrogateRecord, SurrogateError> {
        let key = arch.hash();
        self.entries
            .get(&key)
            .cloned()
            .ok_or(SurrogateError::NotFound(key))
    }
}
