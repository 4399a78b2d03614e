use std::collections::VecDeque;

use tracing::debug;

use crate::error::{FlowError, Result};
use crate::network::{Capacity, ResidualNetwork};

/// Computes the maximum flow by repeated breadth-first augmenting-path
/// search. Each round augments along a shortest path by its bottleneck,
/// which bounds the number of rounds polynomially.
pub fn max_flow(network: &mut ResidualNetwork, source: usize, sink: usize) -> Result<Capacity> {
    network.check_vertex(source)?;
    network.check_vertex(sink)?;
    if source == sink {
        network.mark_solved();
        return Ok(0);
    }
    let mut total: Capacity = 0;
    let mut augmentations = 0usize;
    let mut parent_edge = vec![usize::MAX; network.vertex_count()];
    while bfs(network, source, sink, &mut parent_edge) {
        let mut bottleneck = Capacity::MAX;
        let mut v = sink;
        while v != source {
            let id = parent_edge[v];
            bottleneck = bottleneck.min(network.residual(id));
            v = network.tail(id);
        }
        let mut v = sink;
        while v != source {
            let id = parent_edge[v];
            network.push(id, bottleneck);
            v = network.tail(id);
        }
        total = total
            .checked_add(bottleneck)
            .ok_or(FlowError::ArithmeticOverflow("total flow"))?;
        augmentations += 1;
    }
    debug!(augmentations, total, "augmenting paths exhausted");
    network.mark_solved();
    Ok(total)
}

/// Shortest-hop search over live edges; records the edge used to enter
/// each vertex so the path can be walked back from the sink.
fn bfs(
    network: &ResidualNetwork,
    source: usize,
    sink: usize,
    parent_edge: &mut [usize],
) -> bool {
    parent_edge.fill(usize::MAX);
    let mut visited = vec![false; network.vertex_count()];
    visited[source] = true;
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for id in network.adjacency(v).iter().copied() {
            if network.residual(id) < 1 {
                continue;
            }
            let u = network.head(id);
            if visited[u] {
                continue;
            }
            visited[u] = true;
            parent_edge[u] = id;
            if u == sink {
                return true;
            }
            queue.push_back(u);
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn maxflow_example() {
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
        assert_eq!(max_flow(&mut network, 0, 5).unwrap(), 23);
        assert!(network.conserves_flow(0, 5));
        assert!(network.respects_capacities());
    }

    #[test]
    fn source_equals_sink() {
        let mut network = ResidualNetwork::new(3).unwrap();
        network.add_edge(0, 1, 5).unwrap();
        assert_eq!(max_flow(&mut network, 1, 1).unwrap(), 0);
        assert!(network.flow_computed());
    }

    #[test]
    fn rejects_out_of_range_vertices() {
        let mut network = ResidualNetwork::new(2).unwrap();
        assert!(matches!(
            max_flow(&mut network, 0, 7),
            Err(FlowError::OutOfRange { vertex: 7, .. })
        ));
    }

    #[test]
    fn disconnected_sink_has_zero_flow() {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge(0, 1, 10).unwrap();
        network.add_edge(2, 3, 10).unwrap();
        assert_eq!(max_flow(&mut network, 0, 3).unwrap(), 0);
    }

    #[test]
    fn overflow_is_detected() {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge(0, 1, Capacity::MAX).unwrap();
        network.add_edge(1, 3, Capacity::MAX).unwrap();
        network.add_edge(0, 2, Capacity::MAX).unwrap();
        network.add_edge(2, 3, Capacity::MAX).unwrap();
        assert!(matches!(
            max_flow(&mut network, 0, 3),
            Err(FlowError::ArithmeticOverflow(_))
        ));
    }
}
