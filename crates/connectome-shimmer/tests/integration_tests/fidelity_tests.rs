//! Neighbor preservation through a projected delta round trip.

use connectome_core::config::{BasisConfig, TierConfig};
use connectome_delta::batch::{decode_batch, encode_corpus_projected};
use connectome_delta::{Baseline, BasisBuilder, DeltaCodec, EntityMetadata, HeaderOptions, Tier};
use connectome_shimmer::{cosine_fidelity, neighbor_overlap, SimilarityIndex};

use super::helpers::clustered_corpus;

fn round_trip_overlap(tier: Tier, k: usize) -> (Vec<f64>, f64) {
    let corpus = clustered_corpus(4, 15, 16, 42);
    let basis = BasisBuilder::new(BasisConfig {
        cap: 16,
        tiers: TierConfig {
            coarse: 2,
            standard: 8,
            full: 16,
        },
    })
    .build(&corpus)
    .unwrap();

    let codec = DeltaCodec::default();
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let bytes: Vec<Vec<u8>> = encode_corpus_projected(
        &codec,
        &corpus,
        &basis,
        tier,
        &baseline,
        HeaderOptions::default(),
    )
    .into_iter()
    .map(|r| r.unwrap().to_bytes().unwrap())
    .collect();
    let decoded: Vec<Vec<f64>> = decode_batch(&codec, &bytes, &baseline, Some(&basis))
        .into_iter()
        .map(|d| d.unwrap().vector)
        .collect();

    let worst_cosine = corpus
        .iter()
        .zip(&decoded)
        .map(|(e, v)| cosine_fidelity(e.vector().as_slice(), v).unwrap())
        .fold(f64::INFINITY, f64::min);

    let original = SimilarityIndex::from_corpus(&corpus).unwrap();
    let reconstructed = SimilarityIndex::from_vectors(&decoded).unwrap();
    (
        neighbor_overlap(&original, &reconstructed, k).unwrap(),
        worst_cosine,
    )
}

#[test]
fn test_full_tier_keeps_neighbors() {
    let (overlap, worst_cosine) = round_trip_overlap(Tier::Full, 5);
    assert!(overlap.iter().all(|o| (0.0..=1.0).contains(o)));
    let mean = overlap.iter().sum::<f64>() / overlap.len() as f64;
    assert!(mean > 0.9, "mean overlap {}", mean);
    assert!(worst_cosine > 0.999, "worst cosine {}", worst_cosine);
    println!("[PASS] Full tier: mean neighbor overlap {:.3}", mean);
}

#[test]
fn test_standard_tier_keeps_cluster_geometry() {
    // Eight modes cover the between-cluster directions; only part of the
    // within-cluster jitter is dropped.
    let (overlap, worst_cosine) = round_trip_overlap(Tier::Standard, 5);
    assert!(overlap.iter().all(|o| (0.0..=1.0).contains(o)));
    assert!(worst_cosine > 0.95, "worst cosine {}", worst_cosine);
}
