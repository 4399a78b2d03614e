use serde::Deserialize;
use std::{fs::File, path::Path};

use crate::Weight;
use crate::network::{Capacity, Cost, ResidualNetwork};

/// On-disk description of a directed flow network.
#[derive(Deserialize, Debug)]
pub struct NetworkDescription {
    pub vertices: usize,
    pub edges: Vec<EdgeDescription>,
}

#[derive(Deserialize, Debug)]
pub struct EdgeDescription {
    pub from: usize,
    pub to: usize,
    pub capacity: Capacity,
    #[serde(default)]
    pub cost: Cost,
}

impl NetworkDescription {
    pub fn load<S: AsRef<Path>>(path: S) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        simd_json::from_reader(file).map_err(Into::into)
    }

    pub fn build(&self) -> crate::error::Result<ResidualNetwork> {
        let mut network = ResidualNetwork::new(self.vertices)?;
        for edge in self.edges.iter() {
            network.add_edge_with_cost(edge.from, edge.to, edge.capacity, edge.cost)?;
        }
        Ok(network)
    }
}

/// On-disk description of an undirected weighted graph for the global
/// min-cut solvers.
#[derive(Deserialize, Debug)]
pub struct UndirectedGraphDescription {
    pub vertices: usize,
    pub edges: Vec<(usize, usize, Weight)>,
}

impl UndirectedGraphDescription {
    pub fn load<S: AsRef<Path>>(path: S) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        simd_json::from_reader(file).map_err(Into::into)
    }
}
