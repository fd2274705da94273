//! Corpus → basis → records → decode.

use connectome_delta::codec::{xor_fold, HEADER_LEN, TRAILER_LEN};
use connectome_delta::{
    compression_ratio, Baseline, BaselineRef, CodecError, DeltaCodec, EncodingMode, EntityMetadata,
    HeaderOptions, LayerCode, SparseSelection, Tier,
};

use super::helpers::{build_basis, latent_corpus, refold};

// =============================================================================
// PROJECTED MODE
// =============================================================================

#[test]
fn test_entity_seven_at_coarse_tier() {
    let corpus = latent_corpus(50, 200, 20, 42);
    let basis = build_basis(&corpus);
    assert_eq!(basis.dimension(), 200);
    // min(D, n - 1, cap)
    assert_eq!(basis.mode_count(), 49);
    assert_eq!(basis.tier_size(Tier::Coarse), 32);
    assert_eq!(basis.tier_size(Tier::Standard), 49);
    assert_eq!(basis.tier_size(Tier::Full), 49);

    let codec = DeltaCodec::default();
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let entity = corpus.get_index(7).unwrap();
    let record = codec
        .encode_projected(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &baseline,
            &basis,
            Tier::Coarse,
            HeaderOptions::layer(LayerCode::TierReference),
        )
        .unwrap();
    let bytes = record.to_bytes().unwrap();
    assert_eq!(bytes.len(), HEADER_LEN + 3 * 32 + TRAILER_LEN);

    let decoded = codec.decode(&bytes, &baseline, Some(&basis)).unwrap();
    assert_eq!(decoded.mode, EncodingMode::Projected);
    assert_eq!(decoded.baseline, BaselineRef::BARYCENTER);
    assert_eq!(decoded.fragment, basis.fragment());

    // Rank-20 data: the 32-direction prefix spans it, so only quantization
    // error remains.
    let bound = codec.projected_error_bound(32) + 1e-9;
    let worst = entity
        .vector()
        .as_slice()
        .iter()
        .zip(&decoded.vector)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(worst <= bound, "max error {} exceeds {}", worst, bound);

    let meta_bound = 1.0 / (2.0 * 127.0) + 1e-12;
    assert!((decoded.metadata.coherence - entity.coherence()).abs() <= meta_bound);
    assert!((decoded.metadata.energy - entity.energy()).abs() <= meta_bound);

    let ratio = compression_ratio(200 * 8, bytes.len());
    assert!(ratio > 90.0, "ratio {}", ratio);
    println!(
        "[PASS] entity #7 at tier 1: {} bytes, max error {:.2e}, {:.1}% saved",
        bytes.len(),
        worst,
        ratio
    );
}

#[test]
fn test_corrupted_fragment_is_basis_mismatch() {
    let corpus = latent_corpus(50, 200, 20, 42);
    let basis = build_basis(&corpus);
    let codec = DeltaCodec::default();
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let entity = corpus.get_index(7).unwrap();
    let mut bytes = codec
        .encode_projected(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &baseline,
            &basis,
            Tier::Coarse,
            HeaderOptions::default(),
        )
        .unwrap()
        .to_bytes()
        .unwrap();

    bytes[2] ^= 0x5A;
    // Without a refold the checksum trips first.
    assert!(matches!(
        codec.decode(&bytes, &baseline, Some(&basis)),
        Err(CodecError::Integrity(_))
    ));

    refold(&mut bytes);
    let err = codec.decode(&bytes, &baseline, Some(&basis)).unwrap_err();
    assert_eq!(err.code(), "E_CODEC_030");
    assert!(err.is_recoverable());
    match err {
        CodecError::BasisMismatch { record, basis: expected } => {
            assert_eq!(expected, basis.fragment());
            assert_ne!(record, expected);
        }
        other => panic!("expected BasisMismatch, got {:?}", other),
    }
    println!("[PASS] corrupted fragment rejected as BasisMismatch");
}

#[test]
fn test_rebuilt_basis_rejects_old_records() {
    let codec = DeltaCodec::default();
    let corpus = latent_corpus(50, 200, 20, 42);
    let basis = build_basis(&corpus);
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let entity = corpus.get_index(3).unwrap();
    let bytes = codec
        .encode_projected(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &baseline,
            &basis,
            Tier::Standard,
            HeaderOptions::default(),
        )
        .unwrap()
        .to_bytes()
        .unwrap();

    let grown = latent_corpus(51, 200, 20, 42);
    let rebuilt = build_basis(&grown);
    assert_ne!(rebuilt.basis_hash(), basis.basis_hash());
    assert!(matches!(
        codec.decode(&bytes, &baseline, Some(&rebuilt)),
        Err(CodecError::BasisMismatch { .. })
    ));
}

#[test]
fn test_basis_is_deterministic() {
    let a = build_basis(&latent_corpus(30, 64, 8, 7));
    let b = build_basis(&latent_corpus(30, 64, 8, 7));
    assert_eq!(a.basis_hash(), b.basis_hash());
    assert_eq!(a.fragment(), b.fragment());
    assert_eq!(a.eigenvalues(), b.eigenvalues());
}

#[test]
fn test_variance_grows_with_tier() {
    let corpus = latent_corpus(50, 200, 20, 9);
    let basis = build_basis(&corpus);
    let coarse = basis.variance_captured(basis.tier_size(Tier::Coarse));
    let full = basis.variance_captured(basis.tier_size(Tier::Full));
    assert!(coarse <= full);
    // All variance lives in 20 directions.
    assert!(coarse > 0.999_999, "coarse tier captured {}", coarse);
    assert!(basis.variance_captured(5) < coarse);
}

// =============================================================================
// SPARSE MODE
// =============================================================================

#[test]
fn test_sparse_against_anchor() {
    let corpus = latent_corpus(50, 200, 20, 42);
    let codec = DeltaCodec::default();
    let anchor = Baseline::from_entity(BaselineRef(0x02), corpus.get_index(0).unwrap());
    let entity = corpus.get_index(7).unwrap();

    let record = codec
        .encode_sparse(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &anchor,
            HeaderOptions::layer(LayerCode::TierMeta),
        )
        .unwrap();
    let bytes = record.to_bytes().unwrap();
    assert_eq!(bytes[5], 0x02);
    assert_eq!(xor_fold(&bytes), 0);

    let decoded = codec.decode(&bytes, &anchor, None).unwrap();
    let bound = codec.sparse_error_bound() + 1e-12;
    for (a, b) in entity.vector().as_slice().iter().zip(&decoded.vector) {
        assert!((a - b).abs() <= bound);
    }
}

#[test]
fn test_sparse_top_k_keeps_largest() {
    let corpus = latent_corpus(20, 200, 6, 3);
    let codec = DeltaCodec::default();
    let anchor = Baseline::from_entity(BaselineRef(0x00), corpus.get_index(0).unwrap());
    let entity = corpus.get_index(5).unwrap();

    let record = codec
        .encode_sparse_with(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &anchor,
            SparseSelection::TopK(16),
            HeaderOptions::default(),
        )
        .unwrap();
    assert_eq!(record.entries.len(), 16);

    let deltas: Vec<f64> = entity
        .vector()
        .as_slice()
        .iter()
        .zip(anchor.vector())
        .map(|(v, b)| (v - b).abs())
        .collect();
    let smallest_kept = record
        .entries
        .iter()
        .map(|e| deltas[e.index as usize])
        .fold(f64::INFINITY, f64::min);
    let kept: Vec<usize> = record.entries.iter().map(|e| e.index as usize).collect();
    let largest_dropped = (0..200)
        .filter(|d| !kept.contains(d))
        .map(|d| deltas[d])
        .fold(0.0, f64::max);
    assert!(smallest_kept >= largest_dropped);
}
