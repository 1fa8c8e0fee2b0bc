//! Architecture encodings.
//!
//! An architecture is an opaque pair of sequences: the input node of each
//! edge and the operation applied on that edge. Nothing in this crate
//! interprets the topology; the sampler only looks at the operation names
//! and counts, and the evaluator only looks at the content hash.

pub mod hash;

pub use hash::{hash_architecture, ArchHash};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MonasError, Result};

/// Version tag mixed into the canonical byte form.
const ENCODING_VERSION: u8 = 1;

/// An immutable architecture encoding.
///
/// Two architectures with the same nodes and operations are the same
/// architecture, regardless of where they came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Architecture {
    nodes: Vec<u32>,
    ops: Vec<String>,
}

impl Architecture {
    pub fn new(nodes: Vec<u32>, ops: Vec<String>) -> Self {
        Self { nodes, ops }
    }

    /// Build from string slices; handy in tests and fixtures.
    pub fn from_parts(nodes: &[u32], ops: &[&str]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            ops: ops.iter().map(|op| op.to_string()).collect(),
        }
    }

    pub fn nodes(&self) -> &[u32] {
        &self.nodes
    }

    /// Operation names, one per edge.
    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Deterministic byte form used for hashing.
    ///
    /// Every sequence is length-prefixed and every string is length-prefixed,
    /// so `["ab", "c"]` and `["a", "bc"]` never serialize identically.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16 + self.nodes.len() * 4 + self.ops.len() * 16);
        buf.push(ENCODING_VERSION);
        buf.extend_from_slice(&(self.nodes.len() as u64).to_le_bytes());
        for node in &self.nodes {
            buf.extend_from_slice(&node.to_le_bytes());
        }
        buf.extend_from_slice(&(self.ops.len() as u64).to_le_bytes());
        for op in &self.ops {
            buf.extend_from_slice(&(op.len() as u64).to_le_bytes());
            buf.extend_from_slice(op.as_bytes());
        }
        buf
    }

    /// Plain-text description handed to the code generator.
    pub fn describe(&self) -> String {
        format!("Nodes: {:?}\nOperations: {:?}", self.nodes, self.ops)
    }

    pub fn hash(&self) -> ArchHash {
        hash_architecture(self)
    }
}

// ─── Population files ──────────────────────────────────────────────

/// Read a population saved as a JSON array of architectures.
pub fn load_population(path: &Path) -> Result<Vec<Architecture>> {
    let content = std::fs::read_to_string(path).map_err(|e| MonasError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| MonasError::json(path, e))
}

/// Write a population as a JSON array of architectures.
pub fn save_population(path: &Path, population: &[Architecture]) -> Result<()> {
    let json = serde_json::to_string_pretty(population).map_err(|e| MonasError::json(path, e))?;
    std::fs::write(path, json + "\n").map_err(|e| MonasError::io(path, e))
}
