use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use crate::Weight;
use crate::error::{FlowError, Result};
use crate::stoer_wagner::validate_edges;
use crate::union_find::UnionFind;

/// Estimates the global minimum cut by repeated random edge contraction.
/// Each trial merges the endpoints of uniformly chosen edges until two
/// components remain and sums the weights crossing them; the minimum over
/// all trials is returned. Trials are independent and run in parallel.
/// The answer is correct with probability approaching one as `trials`
/// grows; callers needing certainty should use the deterministic solver.
pub fn randomized_min_cut(
    vertices: usize,
    edges: &[(usize, usize, Weight)],
    trials: usize,
) -> Result<Weight> {
    if trials == 0 {
        return Err(FlowError::InvalidArgument(
            "trial count must be positive".into(),
        ));
    }
    if vertices < 2 {
        return Err(FlowError::InvalidArgument(
            "randomized min-cut requires at least two vertices".into(),
        ));
    }
    validate_edges(vertices, edges)?;
    let best = (0..trials)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::rng();
            contract_once(vertices, edges, &mut rng)
        })
        .min()
        .expect("at least one trial");
    debug!(trials, best, "contraction trials finished");
    Ok(best)
}

/// Trial count for a high-confidence answer, on the order of `V^2 log V`.
pub fn suggested_trials(vertices: usize) -> usize {
    let v = vertices.max(2) as f64;
    (v * v * v.ln()).ceil() as usize
}

/// One contraction run: union random edge endpoints until two components
/// remain, skipping edges that have collapsed into a single component.
/// A graph that runs out of edges early is disconnected and cuts for
/// free.
fn contract_once<R: Rng>(
    vertices: usize,
    edges: &[(usize, usize, Weight)],
    rng: &mut R,
) -> Weight {
    let mut components = UnionFind::new(vertices);
    let mut remaining = vertices;
    let mut live: Vec<(usize, usize)> = edges
        .iter()
        .filter(|&&(u, v, _)| u != v)
        .map(|&(u, v, _)| (u, v))
        .collect();
    while remaining > 2 && !live.is_empty() {
        let picked = rng.random_range(0..live.len());
        let (u, v) = live[picked];
        if components.connected(u, v) {
            live.swap_remove(picked);
            continue;
        }
        components.union(u, v);
        remaining -= 1;
    }
    if remaining > 2 {
        return 0;
    }
    edges
        .iter()
        .filter(|&&(u, v, _)| !components.connected(u, v))
        .map(|&(_, _, w)| w)
        .sum()
}
