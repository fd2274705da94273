//! Full engine runs.

use connectome_core::config::{ShimmerConfig, TagConfig};
use connectome_core::{Config, EntityRecord, TagClassifier};
use connectome_shimmer::{ShimmerEngine, ShimmerError};

use super::helpers::{clustered_corpus, BRIDGE_ID};

fn engine(boundary_k: usize, peak_k: usize) -> ShimmerEngine {
    ShimmerEngine::new(
        ShimmerConfig {
            boundary_k,
            peak_k,
            block_rows: 16,
        },
        TagClassifier::from_config(&TagConfig::default()),
    )
    .unwrap()
}

#[test]
fn test_default_config_engine() {
    let corpus = clustered_corpus(4, 20, 16, 42);
    let engine = ShimmerEngine::from_config(&Config::default()).unwrap();
    assert_eq!(engine.config().boundary_k, 20);
    assert_eq!(engine.config().peak_k, 10);

    let report = engine.score_corpus(&corpus).unwrap();
    assert_eq!(report.len(), corpus.len());
    for (entity, s) in corpus.iter().zip(report.iter()) {
        assert_eq!(&s.id, entity.id());
        assert!(s.s1 >= -1e-12 && s.s1 <= entity.coherence() + 1e-12);
        assert!(s.s2b >= 0.0);
        assert!(s.s3 >= 0.0 && s.s3 <= entity.coherence() + 1e-12);
        assert!((0.0..=1.0).contains(&s.composite_arithmetic));
        assert!((0.0..=1.0).contains(&s.composite_geometric));
    }
    println!("[PASS] Default engine scores {} entities", report.len());
}

#[test]
fn test_bridge_entity_tops_bridging() {
    let corpus = clustered_corpus(3, 12, 16, 5);
    let report = engine(5, 5).score_corpus(&corpus).unwrap();

    let bridge = report.get(BRIDGE_ID).unwrap();
    // Only entity with two semantic tags: its pair is unique.
    assert!((bridge.s3 - corpus.get(BRIDGE_ID).unwrap().coherence()).abs() < 1e-12);
    assert!(report
        .iter()
        .filter(|s| s.id.as_str() != BRIDGE_ID)
        .all(|s| s.s3 == 0.0));
    // So no other entity can have a positive geometric composite.
    assert!(report
        .iter()
        .filter(|s| s.id.as_str() != BRIDGE_ID)
        .all(|s| s.composite_geometric == 0.0));
    println!("[PASS] Unique tag pair scores highest bridging");
}

#[test]
fn test_scores_are_deterministic() {
    let corpus = clustered_corpus(3, 15, 16, 9);
    let a = engine(6, 4).score_corpus(&corpus).unwrap();
    let b = engine(6, 4).score_corpus(&corpus).unwrap();
    assert!(a.iter().eq(b.iter()));
}

#[test]
fn test_writeback_through_json() {
    let corpus = clustered_corpus(2, 10, 8, 21);
    let report = engine(4, 3).score_corpus(&corpus).unwrap();

    let lines: Vec<String> = corpus
        .iter()
        .map(|e| e.to_record().to_json_string().unwrap())
        .collect();
    let mut records: Vec<EntityRecord> = lines
        .iter()
        .map(|l| EntityRecord::from_json_str(l).unwrap())
        .collect();
    assert_eq!(report.apply_to(&mut records), corpus.len());

    let json = records[0].to_json_string().unwrap();
    let back = EntityRecord::from_json_str(&json).unwrap();
    for field in [
        "shimmer_s1",
        "shimmer_s2b",
        "shimmer_s3",
        "shimmer_s5",
        "shimmer_composite",
    ] {
        assert!(back.score(field).is_some(), "missing {}", field);
    }
    let s5 = report.get(&records[0].id).unwrap().s5;
    assert!((back.score("shimmer_s5").unwrap() - s5).abs() <= 5e-5);
}

#[test]
fn test_written_records_keep_json_shape() {
    let corpus = clustered_corpus(2, 10, 8, 33);
    let report = engine(4, 3).score_corpus(&corpus).unwrap();

    let mut line = serde_json::to_value(corpus.iter().next().unwrap().to_record()).unwrap();
    line["origin"] = serde_json::json!({"batch": 7, "source": "ingest"});
    let mut records = vec![EntityRecord::from_json_str(&line.to_string()).unwrap()];
    assert_eq!(report.apply_to(&mut records), 1);

    let json = records[0].to_json_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["id"], line["id"]);
    assert_eq!(value["amplitudes"], line["amplitudes"]);
    assert_eq!(value["tags"], line["tags"]);
    assert_eq!(value["origin"]["batch"], 7);
    assert_eq!(value["origin"]["source"], "ingest");
    for field in [
        "shimmer_s1",
        "shimmer_s2b",
        "shimmer_s3",
        "shimmer_s5",
        "boundary_score",
        "shimmer_composite",
        "shimmer_composite_geo",
    ] {
        assert!(value[field].is_f64(), "{} is not a number", field);
    }

    let scores = serde_json::to_value(report.get(&records[0].id).unwrap()).unwrap();
    let keys: Vec<&str> = scores
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for key in [
        "id",
        "s1",
        "s2b",
        "s3",
        "s5",
        "boundary",
        "composite_arithmetic",
        "composite_geometric",
    ] {
        assert!(keys.contains(&key), "missing {}", key);
    }
    assert_eq!(scores["id"], value["id"]);
    println!("[PASS] Scored records keep their JSON fields");
}

#[test]
fn test_small_corpus_is_recoverable_error() {
    let corpus = clustered_corpus(1, 5, 8, 1);
    let err = ShimmerEngine::from_config(&Config::default())
        .unwrap()
        .score_corpus(&corpus)
        .unwrap_err();
    assert!(matches!(err, ShimmerError::ConfigurationError(_)));
    assert!(err.is_recoverable());
    assert_eq!(err.code(), "E_SHIMMER_001");

    // A neighborhood that fits succeeds.
    assert!(engine(3, 3).score_corpus(&corpus).is_ok());
}
