use crate::dinic;
use crate::error::Result;
use crate::network::ResidualNetwork;

/// Bipartite graph given as admissible left-right pairs.
pub struct BipartiteGraph {
    left: usize,
    right: usize,
    pairs: Vec<(usize, usize)>,
}

/// A maximum matching, one `(left, right)` entry per matched pair.
pub struct Matching {
    pub pairs: Vec<(usize, usize)>,
}

impl Matching {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl BipartiteGraph {
    pub fn new(left: usize, right: usize) -> Self {
        BipartiteGraph {
            left,
            right,
            pairs: vec![],
        }
    }

    pub fn add_pair(&mut self, left: usize, right: usize) -> Result<()> {
        if left >= self.left {
            return Err(crate::error::FlowError::OutOfRange {
                vertex: left,
                vertices: self.left,
            });
        }
        if right >= self.right {
            return Err(crate::error::FlowError::OutOfRange {
                vertex: right,
                vertices: self.right,
            });
        }
        self.pairs.push((left, right));
        Ok(())
    }

    /// Reduces the matching problem to unit-capacity maximum flow: a
    /// super-source feeds every left vertex, every right vertex drains
    /// into a super-sink, and the matched pairs are read back off the
    /// forward edges that ended up carrying flow.
    pub fn maximum_matching(&self) -> Result<Matching> {
        let source = self.left + self.right;
        let sink = source + 1;
        let mut network = ResidualNetwork::new(self.left + self.right + 2)?;
        for left in 0..self.left {
            network.add_edge(source, left, 1)?;
        }
        for right in 0..self.right {
            network.add_edge(self.left + right, sink, 1)?;
        }
        for &(left, right) in self.pairs.iter() {
            network.add_edge(left, self.left + right, 1)?;
        }
        dinic::max_flow(&mut network, source, sink)?;
        let pairs = network
            .flow_edges()
            .filter(|&(from, to, _)| from < self.left && to >= self.left && to < source)
            .map(|(from, to, _)| (from, to - self.left))
            .collect();
        Ok(Matching { pairs })
    }
}
