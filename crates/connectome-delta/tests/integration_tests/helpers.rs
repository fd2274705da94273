//! Deterministic corpus generation.

use connectome_core::config::{BasisConfig, TierConfig};
use connectome_core::{Corpus, Entity, FeatureVector};
use connectome_delta::{Basis, BasisBuilder};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const TIERS: [&str; 3] = ["core", "reference", "convergence"];
pub const TOPICS: [&str; 6] = [
    "#resonance",
    "#topology",
    "#memory",
    "#grounding",
    "#emergence",
    "#ethics",
];

/// `n` entities in `dim` dimensions lying on a random `rank`-dimensional
/// affine subspace. Coefficients stay small enough that projections fit the
/// i16 coefficient range at the default scale.
pub fn latent_corpus(n: usize, dim: usize, rank: usize, seed: u64) -> Corpus {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let offset: Vec<f64> = (0..dim).map(|_| rng.gen_range(-0.5..0.5)).collect();
    let directions: Vec<Vec<f64>> = (0..rank)
        .map(|_| {
            let v: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            v.into_iter().map(|x| x / norm).collect()
        })
        .collect();

    let entities = (0..n).map(|i| {
        let mut values = offset.clone();
        for direction in &directions {
            let a: f64 = rng.gen_range(-0.3..0.3);
            for (v, d) in values.iter_mut().zip(direction) {
                *v += a * d;
            }
        }
        let mut tags = vec![
            format!("#embed:model-{}", i % 2),
            TOPICS[i % TOPICS.len()].to_string(),
        ];
        if i % 3 == 0 {
            tags.push(TOPICS[(i + 1) % TOPICS.len()].to_string());
        }
        Entity::new(
            format!("entity-{:03}", i),
            FeatureVector::new(values).unwrap(),
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.0..1.0),
            tags,
            TIERS[i % TIERS.len()],
        )
        .unwrap()
    });
    Corpus::from_entities(dim, entities).unwrap()
}

pub fn default_tiers_config() -> BasisConfig {
    BasisConfig {
        cap: 130,
        tiers: TierConfig {
            coarse: 32,
            standard: 100,
            full: 130,
        },
    }
}

pub fn build_basis(corpus: &Corpus) -> Basis {
    BasisBuilder::new(default_tiers_config())
        .build(corpus)
        .unwrap_or_else(|e| panic!("basis build failed: {}", e))
}

/// Recompute the trailing checksum after a deliberate edit.
pub fn refold(bytes: &mut [u8]) {
    let last = bytes.len() - 1;
    bytes[last] = connectome_delta::codec::xor_fold(&bytes[..last]);
}
