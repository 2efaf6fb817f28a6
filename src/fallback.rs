//! Synthetic usage data used whenever the upstream model gives nothing usable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hashtags::{AnalysisResult, CountryUsageMap, COUNTRIES};

/// Lowest generated count (inclusive).
pub const FALLBACK_MIN: u64 = 500;
/// Number of distinct values above the minimum, giving `[500, 2499]`.
pub const FALLBACK_SPAN: u64 = 2000;

/// Where per-request random generators come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomSource {
    /// Fresh OS-seeded generator for every request.
    #[default]
    Entropy,
    /// Every request gets a generator seeded with this value.
    Seeded(u64),
}

impl RandomSource {
    pub fn rng(&self) -> StdRng {
        match self {
            RandomSource::Entropy => StdRng::from_entropy(),
            RandomSource::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }
}

/// Build a usage map for every hashtag and every country in [`COUNTRIES`].
pub fn generate_fallback<R: Rng + ?Sized>(hashtags: &[String], rng: &mut R) -> AnalysisResult {
    hashtags
        .iter()
        .map(|tag| {
            let usage: CountryUsageMap = COUNTRIES
                .iter()
                .map(|country| {
                    let count = FALLBACK_MIN + rng.gen_range(0..FALLBACK_SPAN);
                    (country.to_string(), count)
                })
                .collect();
            (tag.clone(), usage)
        })
        .collect()
}
