//! Module `mc`.
//!
//! Monte Carlo distributions of weather indices: simulate many temperature paths from a
//! stochastic predictor, index each path, and collect the outcomes in a [`TempBag`].
//!
//! Every path draws from its own generator seeded with [`stream_seed`], so a run is
//! reproducible from its base seed and independent of path ordering.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::core::WeatherError;
use crate::index::TempIndexer;
use crate::models::{OrnsteinUhlenbeck, TempPredictor};
use crate::temp::TempBag;
use crate::time::DateRange;

/// Deterministic seed of the `stream_index`-th path.
#[inline]
pub fn stream_seed(base_seed: u64, stream_index: usize) -> u64 {
    base_seed.wrapping_add((stream_index as u64).wrapping_mul(7_919))
}

/// Distribution of `indexer` over `paths` simulated paths across `range`.
pub fn index_distribution<P, I>(
    model: &OrnsteinUhlenbeck<P>,
    range: &DateRange,
    indexer: &I,
    paths: usize,
    seed: u64,
) -> Result<TempBag, WeatherError>
where
    P: TempPredictor,
    I: TempIndexer + ?Sized,
{
    if paths == 0 {
        return Err(WeatherError::InvalidParameter(
            "index distribution requires at least one path".to_string(),
        ));
    }
    debug!(paths, days = range.len(), seed, "simulating index distribution");
    Ok(TempBag::generate(paths, {
        let mut path = 0;
        move || {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, path));
            path += 1;
            indexer.index_for(&model.predict_with(range, &mut rng))
        }
    }))
}
