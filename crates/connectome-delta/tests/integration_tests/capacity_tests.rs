//! Entry-count and dimension limits.

use connectome_delta::codec::{DeltaEntry, DeltaRecord, MAX_ENTRIES, MAX_SPARSE_DIMENSION};
use connectome_delta::{
    Baseline, BaselineRef, CodecError, DeltaCodec, EncodeError, EntityMetadata, HeaderOptions,
};

fn zero_baseline(dim: usize) -> Baseline {
    Baseline::new(BaselineRef(0x02), vec![0.0; dim], EntityMetadata::new(0.98, 0.387))
}

#[test]
fn test_exactly_255_sparse_deltas() {
    let codec = DeltaCodec::default();
    let baseline = zero_baseline(MAX_SPARSE_DIMENSION);
    let meta = EntityMetadata::new(0.9, 0.5);

    let mut v = vec![0.0; MAX_SPARSE_DIMENSION];
    for (d, x) in v.iter_mut().enumerate().skip(1) {
        *x = 0.002 * d as f64;
    }
    let record = codec
        .encode_sparse(&v, meta, &baseline, HeaderOptions::default())
        .unwrap();
    assert_eq!(record.entries.len(), MAX_ENTRIES);
    let bytes = record.to_bytes().unwrap();
    assert_eq!(bytes[6], 255);
    assert_eq!(bytes.len(), DeltaRecord::len_for(255));

    v[0] = -0.5;
    let err = codec
        .encode_sparse(&v, meta, &baseline, HeaderOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        CodecError::Encode(EncodeError::CapacityExceeded {
            count: 256,
            max: 255
        })
    );
    assert!(err.is_recoverable());
    println!("[PASS] 255 deltas encode, 256 fail with CapacityExceeded");
}

#[test]
fn test_dimension_beyond_one_byte_index() {
    let codec = DeltaCodec::default();
    let dim = MAX_SPARSE_DIMENSION + 1;
    let err = codec
        .encode_sparse(
            &vec![0.0; dim],
            EntityMetadata::new(0.9, 0.5),
            &zero_baseline(dim),
            HeaderOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::Encode(EncodeError::DimensionTooLarge { dimension: 257, max: 256 })
    ));
}

#[test]
fn test_hand_built_record_over_capacity() {
    let record = DeltaRecord {
        fragment: 0,
        type_code: connectome_delta::codec::TypeCode::new(
            connectome_delta::LayerCode::L1Math,
            connectome_delta::EncodingMode::Sparse,
        ),
        baseline: BaselineRef(0),
        entries: vec![DeltaEntry { index: 1, value: 1 }; 300],
        coherence_delta: 0,
        energy_delta: 0,
    };
    assert!(record.to_bytes().is_err());
}
