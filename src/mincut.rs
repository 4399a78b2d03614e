use std::collections::VecDeque;

use tracing::debug;

use crate::error::{FlowError, Result};
use crate::network::{Capacity, EdgeId, ResidualNetwork};

/// A minimum s-t cut read off a saturated residual network.
pub struct MinCut {
    /// total capacity of the cut edges, equal to the maximum flow
    pub value: Capacity,
    /// forward edges crossing from the source side to the sink side
    pub edges: Vec<EdgeId>,
    /// vertices still reachable from the source, source included
    pub source_side: Vec<usize>,
}

/// Derives the minimum cut from the residual state left behind by a
/// completed max-flow run. The reachable set over live edges forms the
/// source side; the original forward edges leaving it are the cut.
/// Read-only, so re-querying returns the same cut.
pub fn min_cut(network: &ResidualNetwork, source: usize, sink: usize) -> Result<MinCut> {
    network.check_vertex(source)?;
    network.check_vertex(sink)?;
    if !network.flow_computed() {
        return Err(FlowError::PreconditionViolated(
            "min-cut extraction requires a completed max-flow run",
        ));
    }
    let mut reachable = vec![false; network.vertex_count()];
    reachable[source] = true;
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for id in network.adjacency(v).iter().copied() {
            if network.residual(id) < 1 {
                continue;
            }
            let u = network.head(id);
            if reachable[u] {
                continue;
            }
            reachable[u] = true;
            queue.push_back(u);
        }
    }
    if reachable[sink] {
        return Err(FlowError::PreconditionViolated(
            "sink is still reachable, the stored flow is not maximum",
        ));
    }
    let mut value: Capacity = 0;
    let mut edges = Vec::new();
    for raw in (0..network.arena_len()).step_by(2) {
        let edge = EdgeId(raw);
        let (from, to) = network.endpoints(edge);
        if reachable[from] && !reachable[to] && network.capacity(edge) > 0 {
            value = value
                .checked_add(network.capacity(edge))
                .ok_or(FlowError::ArithmeticOverflow("cut capacity"))?;
            edges.push(edge);
        }
    }
    let source_side = (0..network.vertex_count())
        .filter(|&v| reachable[v])
        .collect();
    debug!(value, cut_edges = edges.len(), "cut extracted");
    Ok(MinCut {
        value,
        edges,
        source_side,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dinic;

    fn solved_network() -> ResidualNetwork {
        let mut network = ResidualNetwork::new(6).unwrap();
        network.add_edge(0, 1, 16).unwrap();
        network.add_edge(0, 2, 13).unwrap();
        network.add_edge(1, 2, 10).unwrap();
        network.add_edge(1, 3, 12).unwrap();
        network.add_edge(2, 1, 4).unwrap();
        network.add_edge(2, 4, 14).unwrap();
        network.add_edge(3, 2, 9).unwrap();
        network.add_edge(3, 5, 20).unwrap();
        network.add_edge(4, 3, 7).unwrap();
        network.add_edge(4, 5, 4).unwrap();
        dinic::max_flow(&mut network, 0, 5).unwrap();
        network
    }

    #[test]
    fn duality_with_max_flow() {
        let network = solved_network();
        let cut = min_cut(&network, 0, 5).unwrap();
        assert_eq!(cut.value, 23);
        assert!(cut.source_side.contains(&0));
        assert!(!cut.source_side.contains(&5));
        // every cut edge leaves the source side saturated
        for &edge in &cut.edges {
            assert_eq!(network.residual_capacity(edge), 0);
        }
    }

    #[test]
    fn requerying_is_idempotent() {
        let network = solved_network();
        let first = min_cut(&network, 0, 5).unwrap();
        let second = min_cut(&network, 0, 5).unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.source_side, second.source_side);
    }

    #[test]
    fn requires_a_solved_network() {
        let mut network = ResidualNetwork::new(3).unwrap();
        network.add_edge(0, 1, 4).unwrap();
        network.add_edge(1, 2, 4).unwrap();
        assert!(matches!(
            min_cut(&network, 0, 2),
            Err(FlowError::PreconditionViolated(_))
        ));
    }

    #[test]
    fn agreement_across_solvers() {
        let mut network = ResidualNetwork::new(6).unwrap();
        network.add_edge(0, 1, 16).unwrap();
        network.add_edge(0, 2, 13).unwrap();
        network.add_edge(1, 3, 12).unwrap();
        network.add_edge(2, 4, 14).unwrap();
        network.add_edge(3, 5, 20).unwrap();
        network.add_edge(4, 5, 4).unwrap();
        network.add_edge(4, 3, 7).unwrap();
        let flow = crate::edmonds_karp::max_flow(&mut network, 0, 5).unwrap();
        let cut = min_cut(&network, 0, 5).unwrap();
        assert_eq!(cut.value, flow);
    }
}
