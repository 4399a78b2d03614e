use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use tracing::debug;

use crate::error::{FlowError, Result};
use crate::network::{Capacity, Cost, ResidualNetwork};

const UNREACHED: Cost = Cost::MAX;

/// Sends up to `target` units from `source` to `sink` at minimum total
/// cost via successive shortest augmenting paths. Vertex potentials keep
/// every live edge's reduced cost non-negative, so each round runs a
/// heap-based search instead of a full relaxation pass. Returns the flow
/// actually sent and its cost; falling short of the target is a valid
/// partial result.
pub fn min_cost_flow(
    network: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    target: Capacity,
) -> Result<(Capacity, Cost)> {
    if target < 0 {
        return Err(FlowError::InfeasibleNetwork("flow target is negative"));
    }
    solve(network, source, sink, Some(target))
}

/// Sends as much flow as the network admits at minimum total cost.
pub fn min_cost_max_flow(
    network: &mut ResidualNetwork,
    source: usize,
    sink: usize,
) -> Result<(Capacity, Cost)> {
    solve(network, source, sink, None)
}

fn solve(
    network: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    target: Option<Capacity>,
) -> Result<(Capacity, Cost)> {
    network.check_vertex(source)?;
    network.check_vertex(sink)?;
    if source == sink || target == Some(0) {
        network.mark_solved();
        return Ok((0, 0));
    }
    let n = network.vertex_count();
    let mut potential = initial_potentials(network, source)?;
    let mut dist = vec![UNREACHED; n];
    let mut parent_edge = vec![usize::MAX; n];
    let mut flow: Capacity = 0;
    let mut cost: Cost = 0;
    let mut rounds = 0usize;
    while target.is_none_or(|t| flow < t) {
        if !shortest_path(network, source, sink, &potential, &mut dist, &mut parent_edge)? {
            break;
        }
        rounds += 1;
        let mut bottleneck = target.map_or(Capacity::MAX, |t| t - flow);
        let mut v = sink;
        while v != source {
            let id = parent_edge[v];
            bottleneck = bottleneck.min(network.residual(id));
            v = network.tail(id);
        }
        let mut path_cost: Cost = 0;
        let mut v = sink;
        while v != source {
            let id = parent_edge[v];
            network.push(id, bottleneck);
            path_cost = path_cost
                .checked_add(network.edge_cost(id))
                .ok_or(FlowError::ArithmeticOverflow("path cost"))?;
            v = network.tail(id);
        }
        cost = bottleneck
            .checked_mul(path_cost)
            .and_then(|sent| cost.checked_add(sent))
            .ok_or(FlowError::ArithmeticOverflow("total cost"))?;
        flow = flow
            .checked_add(bottleneck)
            .ok_or(FlowError::ArithmeticOverflow("total flow"))?;
        for v in 0..n {
            if dist[v] != UNREACHED && potential[v] != UNREACHED {
                potential[v] = potential[v]
                    .checked_add(dist[v])
                    .ok_or(FlowError::ArithmeticOverflow("vertex potential"))?;
            }
        }
        debug_assert!(reduced_costs_hold(network, source, &potential));
    }
    debug!(rounds, flow, cost, "shortest augmenting paths exhausted");
    network.mark_solved();
    Ok((flow, cost))
}

/// Single-source relaxation over live edges, tolerant of negative costs.
/// Runs at most `n` rounds; a relaxation still succeeding in the last
/// round proves a negative-cost cycle reachable from the source.
fn initial_potentials(network: &ResidualNetwork, source: usize) -> Result<Vec<Cost>> {
    let n = network.vertex_count();
    let mut potential = vec![UNREACHED; n];
    potential[source] = 0;
    for round in 0..n {
        let mut relaxed = false;
        for id in 0..network.arena_len() {
            if network.residual(id) < 1 {
                continue;
            }
            let u = network.tail(id);
            if potential[u] == UNREACHED {
                continue;
            }
            let candidate = potential[u]
                .checked_add(network.edge_cost(id))
                .ok_or(FlowError::ArithmeticOverflow("vertex potential"))?;
            if candidate < potential[network.head(id)] {
                if round + 1 == n {
                    return Err(FlowError::InfeasibleNetwork(
                        "negative-cost cycle reachable from the source",
                    ));
                }
                potential[network.head(id)] = candidate;
                relaxed = true;
            }
        }
        if !relaxed {
            break;
        }
    }
    Ok(potential)
}

/// Heap-based shortest-path search on reduced costs. Vertices the initial
/// relaxation never reached stay out of consideration; no augmenting path
/// can run through them.
fn shortest_path(
    network: &ResidualNetwork,
    source: usize,
    sink: usize,
    potential: &[Cost],
    dist: &mut [Cost],
    parent_edge: &mut [usize],
) -> Result<bool> {
    dist.fill(UNREACHED);
    parent_edge.fill(usize::MAX);
    dist[source] = 0;
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0, source)));
    while let Some(Reverse((d, u))) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        for id in network.adjacency(u).iter().copied() {
            if network.residual(id) < 1 {
                continue;
            }
            let v = network.head(id);
            if potential[v] == UNREACHED {
                continue;
            }
            let reduced = network.edge_cost(id) + potential[u] - potential[v];
            debug_assert!(reduced >= 0);
            let candidate = d
                .checked_add(reduced)
                .ok_or(FlowError::ArithmeticOverflow("shortest-path distance"))?;
            if candidate < dist[v] {
                dist[v] = candidate;
                parent_edge[v] = id;
                heap.push(Reverse((candidate, v)));
            }
        }
    }
    Ok(dist[sink] != UNREACHED)
}

/// Every live edge leaving a vertex reachable from the source keeps a
/// non-negative reduced cost under the current potentials.
fn reduced_costs_hold(network: &ResidualNetwork, source: usize, potential: &[Cost]) -> bool {
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
            if !reachable[u] {
                reachable[u] = true;
                queue.push_back(u);
            }
        }
    }
    (0..network.arena_len()).all(|id| {
        if network.residual(id) < 1 || !reachable[network.tail(id)] {
            return true;
        }
        let (u, v) = (network.tail(id), network.head(id));
        network.edge_cost(id) + potential[u] - potential[v] >= 0
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_route_network() -> ResidualNetwork {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge_with_cost(0, 1, 10, 2).unwrap();
        network.add_edge_with_cost(0, 2, 10, 1).unwrap();
        network.add_edge_with_cost(1, 3, 5, 3).unwrap();
        network.add_edge_with_cost(2, 3, 10, 1).unwrap();
        network
    }

    #[test]
    fn mincost_example() {
        let mut network = two_route_network();
        let (flow, cost) = min_cost_flow(&mut network, 0, 3, 15).unwrap();
        assert_eq!(flow, 15);
        // 10 units over 0->2->3 at cost 2, 5 units over 0->1->3 at cost 5
        assert_eq!(cost, 45);
        assert!(network.conserves_flow(0, 3));
        assert!(network.respects_capacities());
    }

    #[test]
    fn partial_result_when_target_exceeds_capacity() {
        let mut network = two_route_network();
        let (flow, cost) = min_cost_flow(&mut network, 0, 3, 100).unwrap();
        assert_eq!(flow, 15);
        assert_eq!(cost, 45);
    }

    #[test]
    fn max_flow_variant_matches_blocking_flow_value() {
        let mut priced = two_route_network();
        let (flow, _) = min_cost_max_flow(&mut priced, 0, 3).unwrap();
        let mut unpriced = two_route_network();
        assert_eq!(flow, crate::dinic::max_flow(&mut unpriced, 0, 3).unwrap());
    }

    #[test]
    fn cheaper_detour_beats_direct_route() {
        let mut network = ResidualNetwork::new(3).unwrap();
        network.add_edge_with_cost(0, 2, 10, 5).unwrap();
        network.add_edge_with_cost(0, 1, 10, 1).unwrap();
        network.add_edge_with_cost(1, 2, 10, 1).unwrap();
        let (flow, cost) = min_cost_flow(&mut network, 0, 2, 10).unwrap();
        assert_eq!(flow, 10);
        assert_eq!(cost, 20);
    }

    #[test]
    fn negative_costs_are_handled_by_potentials() {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge_with_cost(0, 1, 4, -2).unwrap();
        network.add_edge_with_cost(1, 3, 4, 3).unwrap();
        network.add_edge_with_cost(0, 2, 4, 2).unwrap();
        network.add_edge_with_cost(2, 3, 4, 1).unwrap();
        let (flow, cost) = min_cost_flow(&mut network, 0, 3, 8).unwrap();
        assert_eq!(flow, 8);
        assert_eq!(cost, 4 * 1 + 4 * 3);
        assert!(network.conserves_flow(0, 3));
    }

    #[test]
    fn negative_cycle_is_infeasible() {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge_with_cost(0, 1, 5, 1).unwrap();
        network.add_edge_with_cost(1, 2, 5, -3).unwrap();
        network.add_edge_with_cost(2, 1, 5, 1).unwrap();
        network.add_edge_with_cost(2, 3, 5, 1).unwrap();
        assert!(matches!(
            min_cost_flow(&mut network, 0, 3, 5),
            Err(FlowError::InfeasibleNetwork(_))
        ));
    }

    #[test]
    fn negative_target_is_rejected() {
        let mut network = two_route_network();
        assert!(matches!(
            min_cost_flow(&mut network, 0, 3, -1),
            Err(FlowError::InfeasibleNetwork(_))
        ));
    }

    #[test]
    fn initial_potentials_make_reduced_costs_nonnegative() {
        let mut network = ResidualNetwork::new(4).unwrap();
        network.add_edge_with_cost(0, 1, 4, -2).unwrap();
        network.add_edge_with_cost(1, 3, 4, 3).unwrap();
        network.add_edge_with_cost(0, 2, 4, 2).unwrap();
        network.add_edge_with_cost(2, 3, 4, -1).unwrap();
        let potential = initial_potentials(&network, 0).unwrap();
        assert!(reduced_costs_hold(&network, 0, &potential));
    }

    #[test]
    fn zero_target_sends_nothing() {
        let mut network = two_route_network();
        assert_eq!(min_cost_flow(&mut network, 0, 3, 0).unwrap(), (0, 0));
        assert_eq!(network.flow_edges().count(), 0);
    }
}
