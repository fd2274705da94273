//! Semantic bridging (S3): coherent entities whose tag combinations are rare.
//!
//! Not neighbor-based. Unordered pairs of distinct semantic tags are counted
//! across the whole corpus; an entity's raw score is the inverse of the mean
//! count over its own pairs. Raw scores are scaled by the corpus maximum and
//! weighted by coherence. Entities with fewer than two semantic tags score 0.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{ShimmerError, ShimmerResult};

const MIN_MEAN_COUNT: f64 = 1e-12;
const MIN_MAX_RAW: f64 = 1e-12;

/// S3 for each entity, in input order.
///
/// # Errors
///
/// `LengthMismatch` when `coherence` and `tag_sets` differ in length.
pub fn semantic_bridging(
    tag_sets: &[HashSet<String>],
    coherence: &[f64],
) -> ShimmerResult<Vec<f64>> {
    ShimmerError::check_len("coherence", tag_sets.len(), coherence.len())?;

    let sorted: Vec<Vec<&str>> = tag_sets
        .iter()
        .map(|set| {
            let mut tags: Vec<&str> = set.iter().map(String::as_str).collect();
            tags.sort_unstable();
            tags
        })
        .collect();

    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for tags in &sorted {
        for_each_pair(tags, |pair| *counts.entry(pair).or_insert(0) += 1);
    }
    debug!(pairs = counts.len(), "Counted semantic tag pairs");

    let raw: Vec<f64> = sorted
        .iter()
        .map(|tags| {
            if tags.len() < 2 {
                return 0.0;
            }
            let (mut total, mut n) = (0usize, 0usize);
            for_each_pair(tags, |pair| {
                total += counts.get(&pair).copied().unwrap_or(0);
                n += 1;
            });
            let mean = total as f64 / n as f64;
            if mean < MIN_MEAN_COUNT {
                1.0
            } else {
                1.0 / mean
            }
        })
        .collect();

    let max = raw.iter().copied().fold(0.0, f64::max);
    let max = if max == 0.0 { MIN_MAX_RAW } else { max };
    Ok(raw
        .iter()
        .zip(coherence)
        .map(|(r, c)| c * r / max)
        .collect())
}

fn for_each_pair<'a>(tags: &[&'a str], mut f: impl FnMut((&'a str, &'a str))) {
    for (a, first) in tags.iter().enumerate() {
        for second in &tags[a + 1..] {
            f((*first, *second));
        }
    }
}
