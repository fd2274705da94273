//! XOR-fold checksum sensitivity.

use connectome_delta::codec::DeltaRecord;
use connectome_delta::{
    Baseline, CodecError, DeltaCodec, EntityMetadata, HeaderOptions, IntegrityError, Tier,
};

use super::helpers::{build_basis, latent_corpus};

fn projected_bytes() -> (Vec<u8>, DeltaCodec, Baseline, connectome_delta::Basis) {
    let corpus = latent_corpus(40, 96, 10, 11);
    let basis = build_basis(&corpus);
    let codec = DeltaCodec::default();
    let baseline = Baseline::from_basis(&basis, EntityMetadata::new(0.98, 0.387));
    let entity = corpus.get_index(4).unwrap();
    let bytes = codec
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
    (bytes, codec, baseline, basis)
}

#[test]
fn test_every_single_bit_flip_detected() {
    let (bytes, codec, baseline, basis) = projected_bytes();
    let mut checked = 0usize;
    for byte in 0..bytes.len() {
        for bit in 0..8 {
            let mut corrupted = bytes.clone();
            corrupted[byte] ^= 1 << bit;
            let err = codec
                .decode(&corrupted, &baseline, Some(&basis))
                .expect_err("single-bit flip must not decode");
            assert!(
                matches!(err, CodecError::Integrity(IntegrityError::ChecksumMismatch { .. })),
                "byte {} bit {}: {:?}",
                byte,
                bit,
                err
            );
            checked += 1;
        }
    }
    assert_eq!(checked, bytes.len() * 8);
    println!("[PASS] all {} single-bit flips detected", checked);
}

#[test]
fn test_same_bit_in_two_bytes_goes_undetected() {
    let (bytes, codec, baseline, basis) = projected_bytes();
    let original = codec.decode(&bytes, &baseline, Some(&basis)).unwrap();

    // Low bytes of the first two coefficients.
    let mut corrupted = bytes.clone();
    corrupted[8] ^= 0x04;
    corrupted[11] ^= 0x04;
    let decoded = codec.decode(&corrupted, &baseline, Some(&basis)).unwrap();
    assert_ne!(decoded.vector, original.vector);
    println!("[PASS] paired flip in one bit position passes the checksum (documented)");
}

#[test]
fn test_checksum_failure_yields_no_partial_record() {
    let (mut bytes, _, _, _) = projected_bytes();
    bytes[7] ^= 0x01;
    assert!(matches!(
        DeltaRecord::parse(&bytes),
        Err(CodecError::Integrity(_))
    ));
}
