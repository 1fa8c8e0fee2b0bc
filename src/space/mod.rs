//! Search-space providers.
//!
//! The sampler only needs uniform random draws; the topology behind them is
//! the provider's business. [`CellSpace`] is a DARTS-style cell space used
//! by the binary, the benches and the tests.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::SeedableRng;

use crate::arch::Architecture;
use crate::error::{MonasError, Result};

/// Source of uniformly random architectures.
pub trait SearchSpace {
    fn sample_random(&mut self) -> Architecture;
}

impl<T: SearchSpace + ?Sized> SearchSpace for &mut T {
    fn sample_random(&mut self) -> Architecture {
        (**self).sample_random()
    }
}

/// Candidate operations of the DARTS space.
pub const DARTS_OPS: [&str; 7] = [
    "max_pool_3x3",
    "avg_pool_3x3",
    "skip_connect",
    "sep_conv_3x3",
    "sep_conv_5x5",
    "dil_conv_3x3",
    "dil_conv_5x5",
];

/// A normal cell and a reduction cell, each with `intermediate_nodes` nodes.
/// Every intermediate node takes two distinct inputs from the two cell
/// inputs or earlier nodes, with one operation per input edge.
///
/// Encoding: `nodes[i]` is the input index of edge `i`, `ops[i]` its
/// operation. Edges are listed cell by cell, node by node.
#[derive(Clone, Debug)]
pub struct CellSpace {
    ops: Vec<String>,
    intermediate_nodes: usize,
    rng: StdRng,
}

impl CellSpace {
    pub const CELLS: usize = 2;
    pub const INPUTS_PER_NODE: usize = 2;
    /// Cell inputs: outputs of the two previous cells.
    const CELL_INPUTS: usize = 2;

    pub fn new(ops: &[&str], intermediate_nodes: usize, seed: u64) -> Result<Self> {
        if ops.is_empty() {
            return Err(MonasError::InvalidSearchSpace(
                "at least one candidate operation is required".to_string(),
            ));
        }
        if intermediate_nodes == 0 {
            return Err(MonasError::InvalidSearchSpace(
                "a cell needs at least one intermediate node".to_string(),
            ));
        }
        Ok(Self {
            ops: ops.iter().map(|op| op.to_string()).collect(),
            intermediate_nodes,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The standard DARTS space: 7 operations, 4 intermediate nodes,
    /// 16 edges per architecture.
    pub fn darts(seed: u64) -> Self {
        Self {
            ops: DARTS_OPS.iter().map(|op| op.to_string()).collect(),
            intermediate_nodes: 4,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn edges_per_architecture(&self) -> usize {
        Self::CELLS * self.intermediate_nodes * Self::INPUTS_PER_NODE
    }

    pub fn candidate_ops(&self) -> &[String] {
        &self.ops
    }
}

impl SearchSpace for CellSpace {
    fn sample_random(&mut self) -> Architecture {
        let edges = self.edges_per_architecture();
        let mut nodes = Vec::with_capacity(edges);
        let mut ops = Vec::with_capacity(edges);
        for _cell in 0..Self::CELLS {
            for node in 0..self.intermediate_nodes {
                let predecessors = Self::CELL_INPUTS + node;
                for input in index::sample(&mut self.rng, predecessors, Self::INPUTS_PER_NODE) {
                    nodes.push(input as u32);
                    // `ops` is non-empty by construction
                    if let Some(op) = self.ops.choose(&mut self.rng) {
                        ops.push(op.clone());
                    }
                }
            }
        }
        Architecture::new(nodes, ops)
    }
}
