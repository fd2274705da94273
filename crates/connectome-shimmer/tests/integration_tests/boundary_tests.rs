//! Boundary scorer over clustered corpora.

use connectome_core::config::TagConfig;
use connectome_core::TagClassifier;
use connectome_shimmer::{BoundaryScorer, SimilarityIndex};

use super::helpers::{clustered_corpus, mislabeled_id, UNTAGGED_ID};

fn classifier() -> TagClassifier {
    TagClassifier::from_config(&TagConfig::default())
}

#[test]
fn test_bounds_hold_for_every_entity() {
    for seed in [1u64, 7, 42] {
        let corpus = clustered_corpus(4, 15, 16, seed);
        let index = SimilarityIndex::from_corpus(&corpus).unwrap();
        let scorer = BoundaryScorer::new(&index, &corpus, &classifier(), 10).unwrap();
        for (entity, score) in corpus.iter().zip(scorer.score_all().unwrap()) {
            assert!((0.0..=1.0).contains(&score.boundary), "{}", entity.id());
            assert!(score.shimmer >= 0.0);
            assert!(score.shimmer <= entity.coherence() + 1e-12);
        }
    }
    println!("[PASS] 0 <= boundary <= 1 and 0 <= shimmer <= coherence");
}

#[test]
fn test_mislabeled_entity_is_full_boundary() {
    let corpus = clustered_corpus(3, 12, 16, 42);
    let index = SimilarityIndex::from_corpus(&corpus).unwrap();
    let scorer = BoundaryScorer::new(&index, &corpus, &classifier(), 5).unwrap();

    for c in 1..3 {
        let i = corpus.index_of(&mislabeled_id(c)).unwrap();
        let score = scorer.score(i).unwrap();
        assert_eq!(score.boundary, 1.0, "cluster {}", c);

        // A correctly labeled neighbor shares its topic with most of its own
        // neighborhood; at most the mislabeled member disagrees.
        let j = corpus.index_of(&format!("c{}-005", c)).unwrap();
        assert!(scorer.score(j).unwrap().boundary <= 0.2 + 1e-12);
    }
    println!("[PASS] Mislabeled entities score boundary 1.0");
}

#[test]
fn test_system_only_tags_score_full_boundary() {
    let corpus = clustered_corpus(2, 10, 8, 3);
    let index = SimilarityIndex::from_corpus(&corpus).unwrap();
    let scorer = BoundaryScorer::new(&index, &corpus, &classifier(), 5).unwrap();

    let i = corpus.index_of(UNTAGGED_ID).unwrap();
    let score = scorer.score(i).unwrap();
    assert_eq!(score.boundary, 1.0);
    assert_eq!(score.shimmer, corpus.get(UNTAGGED_ID).unwrap().coherence());
    println!("[PASS] Entity with only system tags scores boundary 1.0");
}

#[test]
fn test_single_and_batch_agree() {
    let corpus = clustered_corpus(3, 10, 12, 11);
    let index = SimilarityIndex::from_corpus(&corpus).unwrap();
    let scorer = BoundaryScorer::new(&index, &corpus, &classifier(), 4).unwrap();
    let all = scorer.score_all().unwrap();
    for (i, expected) in all.iter().enumerate() {
        assert_eq!(&scorer.score(i).unwrap(), expected);
    }
}
