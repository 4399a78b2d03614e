use crate::error::{FlowError, Result};

pub type Capacity = i64;
pub type Cost = i64;

/// Opaque handle to a forward edge, returned by [`ResidualNetwork::add_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) usize);

struct Edge {
    points: (usize, usize),
    cap: Capacity,
    cost: Cost,
    flow: Capacity,
}

/// Directed capacitated graph stored as a contiguous edge arena.
///
/// Every forward edge is appended together with its reverse residual edge;
/// the pair lives at indices `m` and `m ^ 1`, so augmenting one updates the
/// other in place. Edges are append-only and the vertex count is fixed at
/// construction.
pub struct ResidualNetwork {
    /// number of vertices
    vertices: usize,
    /// map from node to edge indices
    adjacency: Vec<Vec<usize>>,
    /// edge storage, forward edges at even indices
    edges: Vec<Edge>,
    /// set once a max-flow or min-cost-flow run has completed
    solved: bool,
}

impl ResidualNetwork {
    pub fn new(vertices: usize) -> Result<Self> {
        if vertices == 0 {
            return Err(FlowError::InvalidArgument(
                "vertex count must be positive".into(),
            ));
        }
        Ok(ResidualNetwork {
            vertices,
            adjacency: vec![vec![]; vertices],
            edges: vec![],
            solved: false,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    /// Number of forward edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn add_edge(&mut self, from: usize, to: usize, capacity: Capacity) -> Result<EdgeId> {
        self.add_edge_with_cost(from, to, capacity, 0)
    }

    pub fn add_edge_with_cost(
        &mut self,
        from: usize,
        to: usize,
        capacity: Capacity,
        cost: Cost,
    ) -> Result<EdgeId> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(FlowError::InvalidArgument(format!(
                "negative capacity {capacity} on edge {from} -> {to}"
            )));
        }
        let m = self.edges.len();
        self.edges.push(Edge {
            points: (from, to),
            cap: capacity,
            cost,
            flow: 0,
        });
        self.edges.push(Edge {
            points: (to, from),
            cap: 0,
            cost: -cost,
            flow: 0,
        });
        self.adjacency[from].push(m);
        self.adjacency[to].push(m + 1);
        Ok(EdgeId(m))
    }

    pub fn endpoints(&self, edge: EdgeId) -> (usize, usize) {
        self.edges[edge.0].points
    }

    pub fn capacity(&self, edge: EdgeId) -> Capacity {
        self.edges[edge.0].cap
    }

    pub fn cost(&self, edge: EdgeId) -> Cost {
        self.edges[edge.0].cost
    }

    pub fn flow(&self, edge: EdgeId) -> Capacity {
        self.edges[edge.0].flow
    }

    pub fn residual_capacity(&self, edge: EdgeId) -> Capacity {
        self.residual(edge.0)
    }

    /// Pushes `amount` units over the edge and symmetrically withdraws them
    /// from its paired reverse edge. The caller must keep `amount` within
    /// the edge's residual capacity.
    pub fn augment(&mut self, edge: EdgeId, amount: Capacity) {
        debug_assert!(amount >= 0 && amount <= self.residual(edge.0));
        self.push(edge.0, amount);
    }

    /// Forward edges carrying positive flow, as `(from, to, flow)`.
    pub fn flow_edges(&self) -> impl Iterator<Item = (usize, usize, Capacity)> + '_ {
        self.edges.iter().step_by(2).filter_map(|edge| {
            if edge.flow < 1 {
                return None;
            }
            Some((edge.points.0, edge.points.1, edge.flow))
        })
    }

    /// Forward edges whose residual capacity is exhausted.
    pub fn saturated_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .step_by(2)
            .filter(|(_, edge)| edge.cap > 0 && edge.flow == edge.cap)
            .map(|(id, _)| EdgeId(id))
    }

    /// Zeroes all flow so a different solver can run on the same topology.
    pub fn reset_flow(&mut self) {
        for edge in self.edges.iter_mut() {
            edge.flow = 0;
        }
        self.solved = false;
    }

    pub fn flow_computed(&self) -> bool {
        self.solved
    }

    /// Net flow into a vertex over forward edges.
    pub fn excess(&self, vertex: usize) -> Capacity {
        let mut balance = 0;
        for edge in self.edges.iter().step_by(2) {
            if edge.points.1 == vertex {
                balance += edge.flow;
            }
            if edge.points.0 == vertex {
                balance -= edge.flow;
            }
        }
        balance
    }

    /// Every vertex other than `source` and `sink` has zero excess.
    pub fn conserves_flow(&self, source: usize, sink: usize) -> bool {
        (0..self.vertices)
            .filter(|&v| v != source && v != sink)
            .all(|v| self.excess(v) == 0)
    }

    /// Every forward edge keeps its flow within `[0, capacity]`.
    pub fn respects_capacities(&self) -> bool {
        self.edges
            .iter()
            .step_by(2)
            .all(|edge| 0 <= edge.flow && edge.flow <= edge.cap)
    }

    pub(crate) fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex >= self.vertices {
            return Err(FlowError::OutOfRange {
                vertex,
                vertices: self.vertices,
            });
        }
        Ok(())
    }

    pub(crate) fn adjacency(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn tail(&self, id: usize) -> usize {
        self.edges[id].points.0
    }

    pub(crate) fn head(&self, id: usize) -> usize {
        self.edges[id].points.1
    }

    pub(crate) fn edge_cost(&self, id: usize) -> Cost {
        self.edges[id].cost
    }

    pub(crate) fn residual(&self, id: usize) -> Capacity {
        self.edges[id].cap - self.edges[id].flow
    }

    pub(crate) fn push(&mut self, id: usize, amount: Capacity) {
        self.edges[id].flow += amount;
        self.edges[id ^ 1].flow -= amount;
    }

    pub(crate) fn mark_solved(&mut self) {
        self.solved = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn paired_reverse_edge() {
        let mut network = ResidualNetwork::new(2).unwrap();
        let edge = network.add_edge_with_cost(0, 1, 10, 3).unwrap();
        assert_eq!(network.residual_capacity(edge), 10);
        network.augment(edge, 4);
        assert_eq!(network.flow(edge), 4);
        assert_eq!(network.residual_capacity(edge), 6);
        // the reverse edge now offers exactly the pushed amount back
        assert_eq!(network.residual(edge.0 ^ 1), 4);
        assert_eq!(network.edge_cost(edge.0 ^ 1), -3);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            ResidualNetwork::new(0),
            Err(FlowError::InvalidArgument(_))
        ));
        let mut network = ResidualNetwork::new(3).unwrap();
        assert!(matches!(
            network.add_edge(0, 3, 1),
            Err(FlowError::OutOfRange {
                vertex: 3,
                vertices: 3
            })
        ));
        assert!(matches!(
            network.add_edge(0, 1, -5),
            Err(FlowError::InvalidArgument(_))
        ));
    }

    #[test]
    fn flow_iterators_and_reset() {
        let mut network = ResidualNetwork::new(3).unwrap();
        let a = network.add_edge(0, 1, 5).unwrap();
        let b = network.add_edge(1, 2, 7).unwrap();
        network.augment(a, 5);
        network.augment(b, 5);
        assert_eq!(
            network.flow_edges().collect::<Vec<_>>(),
            vec![(0, 1, 5), (1, 2, 5)]
        );
        assert_eq!(network.saturated_edges().collect::<Vec<_>>(), vec![a]);
        assert!(network.conserves_flow(0, 2));
        assert!(network.respects_capacities());
        network.reset_flow();
        assert_eq!(network.flow_edges().count(), 0);
        assert!(!network.flow_computed());
    }
}
