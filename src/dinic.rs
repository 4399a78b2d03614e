use std::collections::VecDeque;

use tracing::debug;

use crate::error::{FlowError, Result};
use crate::network::{Capacity, ResidualNetwork};

/// Scratch state for one blocking-flow computation.
struct LevelGraph {
    /// shortest-hop distance from the source over live edges
    level: Vec<usize>,
    /// pointer to the next edge to scan per vertex, reset each phase
    pointer: Vec<usize>,
}

/// Computes the maximum flow in phases: a breadth-first pass builds the
/// level graph, then an iterative depth-first pass saturates it with a
/// blocking flow. Terminates when the sink drops out of the level graph.
pub fn max_flow(network: &mut ResidualNetwork, source: usize, sink: usize) -> Result<Capacity> {
    network.check_vertex(source)?;
    network.check_vertex(sink)?;
    if source == sink {
        network.mark_solved();
        return Ok(0);
    }
    let n = network.vertex_count();
    let mut state = LevelGraph {
        level: vec![usize::MAX; n],
        pointer: vec![0; n],
    };
    let mut total: Capacity = 0;
    let mut phases = 0usize;
    loop {
        state.level.fill(usize::MAX);
        state.pointer.fill(0);
        if !bfs(network, source, sink, &mut state.level) {
            break;
        }
        phases += 1;
        loop {
            let pushed = augment(network, source, sink, &state.level, &mut state.pointer);
            if pushed < 1 {
                break;
            }
            total = total
                .checked_add(pushed)
                .ok_or(FlowError::ArithmeticOverflow("total flow"))?;
        }
    }
    debug!(phases, total, "level graphs exhausted");
    network.mark_solved();
    Ok(total)
}

fn bfs(network: &ResidualNetwork, source: usize, sink: usize, level: &mut [usize]) -> bool {
    let mut queue = VecDeque::new();
    queue.push_back(source);
    level[source] = 0;
    while let Some(v) = queue.pop_front() {
        for id in network.adjacency(v).iter().copied() {
            if network.residual(id) < 1 {
                continue;
            }
            let u = network.head(id);
            if level[u] != usize::MAX {
                continue;
            }
            level[u] = level[v] + 1;
            queue.push_back(u);
        }
    }
    level[sink] != usize::MAX
}

/// Finds one augmenting path in the level graph and saturates it by its
/// bottleneck, advancing and retreating over an explicit edge stack. A
/// cursor that reaches the end of its adjacency list removes the vertex
/// from the rest of the phase.
fn augment(
    network: &mut ResidualNetwork,
    source: usize,
    sink: usize,
    level: &[usize],
    pointer: &mut [usize],
) -> Capacity {
    let mut path: Vec<usize> = Vec::new();
    let mut v = source;
    loop {
        if v == sink {
            let mut bottleneck = Capacity::MAX;
            for id in path.iter().copied() {
                bottleneck = bottleneck.min(network.residual(id));
            }
            for id in path.iter().copied() {
                network.push(id, bottleneck);
            }
            return bottleneck;
        }
        let mut advanced = false;
        while pointer[v] < network.adjacency(v).len() {
            let id = network.adjacency(v)[pointer[v]];
            let u = network.head(id);
            if level[v] + 1 == level[u] && network.residual(id) > 0 {
                path.push(id);
                v = u;
                advanced = true;
                break;
            }
            pointer[v] += 1;
        }
        if advanced {
            continue;
        }
        match path.pop() {
            Some(id) => {
                v = network.tail(id);
                pointer[v] += 1;
            }
            None => return 0,
        }
    }
}
