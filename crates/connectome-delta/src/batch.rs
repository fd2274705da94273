//! Batch encode/decode over a corpus.
//!
//! Per-entity work runs on the rayon pool. Results come back in input order,
//! one per entity, so a failing entity never hides the others.

use connectome_core::Corpus;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::basis::{Basis, Tier};
use crate::codec::{Baseline, DecodedEntity, DeltaCodec, DeltaRecord, EntityMetadata, HeaderOptions};
use crate::error::CodecResult;

/// Encode every entity of `corpus` in projected mode at `tier`.
///
/// # Returns
///
/// Vec of encode results (preserves corpus order).
#[instrument(skip_all, fields(entities = corpus.len(), tier = tier.number()))]
pub fn encode_corpus_projected(
    codec: &DeltaCodec,
    corpus: &Corpus,
    basis: &Basis,
    tier: Tier,
    baseline: &Baseline,
    opts: HeaderOptions,
) -> Vec<CodecResult<DeltaRecord>> {
    let results: Vec<_> = corpus
        .entities()
        .par_iter()
        .map(|entity| {
            codec.encode_projected(
                entity.vector().as_slice(),
                EntityMetadata::of(entity),
                baseline,
                basis,
                tier,
                opts,
            )
        })
        .collect();
    log_outcome("encode_projected", &results);
    results
}

/// Encode every entity of `corpus` in sparse mode against one baseline.
#[instrument(skip_all, fields(entities = corpus.len()))]
pub fn encode_corpus_sparse(
    codec: &DeltaCodec,
    corpus: &Corpus,
    baseline: &Baseline,
    opts: HeaderOptions,
) -> Vec<CodecResult<DeltaRecord>> {
    let results: Vec<_> = corpus
        .entities()
        .par_iter()
        .map(|entity| {
            codec.encode_sparse(
                entity.vector().as_slice(),
                EntityMetadata::of(entity),
                baseline,
                opts,
            )
        })
        .collect();
    log_outcome("encode_sparse", &results);
    results
}

/// Decode serialized records in parallel.
///
/// # Returns
///
/// Vec of decode results (preserves order).
#[instrument(skip_all, fields(records = records.len()))]
pub fn decode_batch<B: AsRef<[u8]> + Sync>(
    codec: &DeltaCodec,
    records: &[B],
    baseline: &Baseline,
    basis: Option<&Basis>,
) -> Vec<CodecResult<DecodedEntity>> {
    let results: Vec<_> = records
        .par_iter()
        .map(|bytes| codec.decode(bytes.as_ref(), baseline, basis))
        .collect();
    log_outcome("decode", &results);
    results
}

fn log_outcome<T>(operation: &str, results: &[CodecResult<T>]) {
    let failed = results.iter().filter(|r| r.is_err()).count();
    if let Some(first) = results.iter().find_map(|r| r.as_ref().err()) {
        warn!(
            operation,
            failed,
            code = first.code(),
            error = %first,
            "Batch finished with failures"
        );
    } else {
        info!(operation, total = results.len(), "Batch finished");
    }
}
