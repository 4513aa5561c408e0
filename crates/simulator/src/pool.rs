// In crates/simulator/src/pool.rs

use crate::cancel::CancellationToken;
use crate::config::SimulationConfig;
use crate::types::EquityPath;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Random generator owned by a single path: the run seed with the path index
/// as stream id, so each path draws an independent sequence and the output
/// does not depend on which worker produced it.
pub(crate) fn path_rng(seed: u64, path_index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(path_index as u64);
    rng
}

/// Generates `config.num_simulations` paths in batches of `config.batch_size`
/// on a dedicated pool. The token is polled before every batch; on
/// cancellation everything generated so far is dropped.
pub(crate) fn generate_paths<F>(
    config: &SimulationConfig,
    seed: u64,
    token: &CancellationToken,
    build_path: F,
) -> Result<Vec<EquityPath>>
where
    F: Fn(&mut ChaCha8Rng) -> EquityPath + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    let mut paths = Vec::with_capacity(config.num_simulations);
    let mut start = 0;
    while start < config.num_simulations {
        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let end = start.saturating_add(config.batch_size).min(config.num_simulations);
        let batch: Vec<EquityPath> = pool.install(|| {
            (start..end)
                .into_par_iter()
                .map(|index| build_path(&mut path_rng(seed, index)))
                .collect()
        });
        paths.extend(batch);
        start = end;
    }

    if token.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(paths)
}
