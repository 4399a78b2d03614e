use std::collections::HashMap;

use tracing::debug;

use crate::Weight;
use crate::error::{FlowError, Result};

/// A minimum cut over all bipartitions of an undirected weighted graph.
pub struct GlobalMinCut {
    /// total weight of the edges crossing the cut
    pub value: Weight,
    /// original vertices on the lighter-known side of the best cut
    pub partition: Vec<usize>,
}

/// Sparse contraction graph: one weight row per live super-vertex plus the
/// original vertices merged into it.
struct ContractionGraph {
    adjacency: Vec<HashMap<usize, Weight>>,
    members: Vec<Vec<usize>>,
    active: Vec<bool>,
}

/// Deterministic global minimum cut by repeated maximum-adjacency phases.
/// Each phase grows a set by always adding the most tightly connected
/// remaining vertex; the connectivity of the vertex added last is a
/// candidate cut, and the last two vertices are merged before the next
/// phase. No source or sink is designated.
pub fn global_min_cut(vertices: usize, edges: &[(usize, usize, Weight)]) -> Result<GlobalMinCut> {
    if vertices < 2 {
        return Err(FlowError::InvalidArgument(
            "global min-cut requires at least two vertices".into(),
        ));
    }
    validate_edges(vertices, edges)?;
    let mut graph = ContractionGraph::new(vertices, edges);
    let mut best: Option<GlobalMinCut> = None;
    for _ in 0..vertices - 1 {
        let (prev, last, candidate) = graph.minimum_cut_phase();
        if best.as_ref().is_none_or(|cut| candidate < cut.value) {
            let mut partition = graph.members[last].clone();
            partition.sort_unstable();
            best = Some(GlobalMinCut {
                value: candidate,
                partition,
            });
        }
        graph.merge(prev, last);
    }
    let cut = best.expect("at least one contraction phase");
    debug!(value = cut.value, "phases finished");
    Ok(cut)
}

impl ContractionGraph {
    fn new(vertices: usize, edges: &[(usize, usize, Weight)]) -> Self {
        let mut adjacency: Vec<HashMap<usize, Weight>> = vec![HashMap::new(); vertices];
        for &(u, v, w) in edges {
            if u == v {
                continue;
            }
            *adjacency[u].entry(v).or_insert(0) += w;
            *adjacency[v].entry(u).or_insert(0) += w;
        }
        ContractionGraph {
            adjacency,
            members: (0..vertices).map(|v| vec![v]).collect(),
            active: vec![true; vertices],
        }
    }

    /// One maximum-adjacency sweep over the live super-vertices. Returns
    /// the last two vertices added and the cut weight separating the very
    /// last one from the rest.
    fn minimum_cut_phase(&self) -> (usize, usize, Weight) {
        let n = self.adjacency.len();
        let mut added = vec![false; n];
        let mut weight: Vec<Weight> = vec![0; n];
        let remaining = self.active.iter().filter(|&&live| live).count();
        let start = self
            .active
            .iter()
            .position(|&live| live)
            .expect("graph has live vertices");
        added[start] = true;
        for (&x, &w) in &self.adjacency[start] {
            if self.active[x] {
                weight[x] += w;
            }
        }
        let mut prev = start;
        let mut current = start;
        for _ in 1..remaining {
            let next = (0..n)
                .filter(|&x| self.active[x] && !added[x])
                .max_by_key(|&x| weight[x])
                .expect("unadded vertex remains");
            prev = current;
            current = next;
            added[current] = true;
            for (&x, &w) in &self.adjacency[current] {
                if self.active[x] && !added[x] {
                    weight[x] += w;
                }
            }
        }
        (prev, current, weight[current])
    }

    /// Contracts `t` into `s`, summing parallel edge weights.
    fn merge(&mut self, s: usize, t: usize) {
        let absorbed: Vec<(usize, Weight)> = self.adjacency[t].drain().collect();
        for (x, w) in absorbed {
            self.adjacency[x].remove(&t);
            if x == s {
                continue;
            }
            *self.adjacency[s].entry(x).or_insert(0) += w;
            *self.adjacency[x].entry(s).or_insert(0) += w;
        }
        let moved = std::mem::take(&mut self.members[t]);
        self.members[s].extend(moved);
        self.active[t] = false;
    }
}

/// Rejects out-of-range endpoints and negative weights, and checks that
/// the total weight fits the accumulator; partial sums formed later are
/// bounded by that total.
pub(crate) fn validate_edges(vertices: usize, edges: &[(usize, usize, Weight)]) -> Result<Weight> {
    let mut total: Weight = 0;
    for &(u, v, w) in edges {
        for vertex in [u, v] {
            if vertex >= vertices {
                return Err(FlowError::OutOfRange { vertex, vertices });
            }
        }
        if w < 0 {
            return Err(FlowError::InvalidArgument(format!(
                "negative weight {w} on edge {u} - {v}"
            )));
        }
        total = total
            .checked_add(w)
            .ok_or(FlowError::ArithmeticOverflow("total edge weight"))?;
    }
    Ok(total)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn global_cut_example() {
        let edges = [(0, 1, 2), (0, 2, 3), (1, 2, 2), (1, 3, 2), (2, 3, 1)];
        let cut = global_min_cut(4, &edges).unwrap();
        assert_eq!(cut.value, 3);
        assert_eq!(cut.partition, vec![3]);
    }

    #[test]
    fn two_vertices() {
        let cut = global_min_cut(2, &[(0, 1, 7)]).unwrap();
        assert_eq!(cut.value, 7);
        assert_eq!(cut.partition.len(), 1);
    }

    #[test]
    fn disconnected_graph_splits_for_free() {
        let edges = [(0, 1, 4), (2, 3, 4)];
        let cut = global_min_cut(4, &edges).unwrap();
        assert_eq!(cut.value, 0);
    }

    #[test]
    fn parallel_edges_accumulate() {
        let edges = [(0, 1, 1), (0, 1, 1), (1, 2, 1)];
        let cut = global_min_cut(3, &edges).unwrap();
        assert_eq!(cut.value, 1);
        assert_eq!(cut.partition, vec![2]);
    }

    #[test]
    fn star_cuts_off_a_leaf() {
        let edges = [(0, 1, 3), (0, 2, 5), (0, 3, 2)];
        let cut = global_min_cut(4, &edges).unwrap();
        assert_eq!(cut.value, 2);
        assert_eq!(cut.partition, vec![3]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            global_min_cut(1, &[]),
            Err(FlowError::InvalidArgument(_))
        ));
        assert!(matches!(
            global_min_cut(3, &[(0, 5, 1)]),
            Err(FlowError::OutOfRange { vertex: 5, .. })
        ));
        assert!(matches!(
            global_min_cut(3, &[(0, 1, -2)]),
            Err(FlowError::InvalidArgument(_))
        ));
    }
}
