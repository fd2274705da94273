//! Basis artifact persistence.

use std::fs;

use connectome_delta::{
    Basis, BasisArtifact, BasisError, Baseline, DeltaCodec, EntityMetadata, HeaderOptions, Tier,
};
use tempfile::TempDir;

use super::helpers::{build_basis, latent_corpus};

#[test]
fn test_artifact_survives_the_filesystem() {
    let corpus = latent_corpus(50, 200, 20, 42);
    let basis = build_basis(&corpus);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("delta-basis.json");
    fs::write(&path, basis.to_artifact().to_json_string_pretty().unwrap()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let loaded = Basis::from_artifact(BasisArtifact::from_json_str(&text).unwrap()).unwrap();
    assert_eq!(loaded.basis_hash(), basis.basis_hash());
    assert_eq!(loaded.tiers(), basis.tiers());
    assert_eq!(loaded.corpus_size(), 50);

    // A record written against the original decodes with the loaded copy.
    let codec = DeltaCodec::default();
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let entity = corpus.get_index(12).unwrap();
    let bytes = codec
        .encode_projected(
            entity.vector().as_slice(),
            EntityMetadata::of(entity),
            &baseline,
            &basis,
            Tier::Full,
            HeaderOptions::default(),
        )
        .unwrap()
        .to_bytes()
        .unwrap();
    let a = codec.decode(&bytes, &baseline, Some(&basis)).unwrap();
    let b = codec.decode(&bytes, &baseline, Some(&loaded)).unwrap();
    for (x, y) in a.vector.iter().zip(&b.vector) {
        assert!((x - y).abs() < 1e-12);
    }
    println!("[PASS] artifact round trip through {}", path.display());
}

#[test]
fn test_tampered_file_is_rejected() {
    let basis = build_basis(&latent_corpus(30, 64, 8, 5));
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("delta-basis.json");
    let mut artifact = basis.to_artifact();
    artifact.barycenter[10] += 0.25;
    fs::write(&path, artifact.to_json_string().unwrap()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let err = Basis::from_artifact(BasisArtifact::from_json_str(&text).unwrap()).unwrap_err();
    assert!(matches!(err, BasisError::FingerprintMismatch { .. }));

    // The trusted path keeps the stored hash, so old records still match.
    let trusted =
        Basis::from_artifact_trusted(BasisArtifact::from_json_str(&text).unwrap()).unwrap();
    assert_eq!(trusted.basis_hash(), basis.basis_hash());
    assert_eq!(trusted.fragment(), basis.fragment());
}

#[test]
fn test_garbage_file_is_invalid_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"barycenter\": [1.0, 2.0]").unwrap();
    let err = BasisArtifact::from_json_str(&fs::read_to_string(&path).unwrap()).unwrap_err();
    assert!(matches!(err, BasisError::InvalidArtifact(_)));
    assert_eq!(err.code(), "E_BASIS_004");
}
