//! Deterministic clustered corpora.

use connectome_core::{Corpus, Entity, FeatureVector};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const TOPICS: [&str; 4] = ["#resonance", "#topology", "#memory", "#ethics"];

/// Id of the one entity per corpus whose semantic tags form a unique pair.
pub const BRIDGE_ID: &str = "bridge";

/// Id of the entity carrying only system tags.
pub const UNTAGGED_ID: &str = "untagged";

/// Id of the mislabeled member of `cluster`.
pub fn mislabeled_id(cluster: usize) -> String {
    format!("c{}-000", cluster)
}

/// `clusters` tight groups of `per_cluster` entities around random centers.
///
/// Every member of cluster `c` is tagged `TOPICS[c]` except the first, which
/// carries the next cluster's topic. Two extra entities sit in cluster 0:
/// [`BRIDGE_ID`] tagged with topics 0 and 1, and [`UNTAGGED_ID`] with only
/// system tags.
pub fn clustered_corpus(clusters: usize, per_cluster: usize, dim: usize, seed: u64) -> Corpus {
    assert!(clusters <= TOPICS.len());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers: Vec<Vec<f64>> = (0..clusters)
        .map(|_| {
            let v: Vec<f64> = (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            v.into_iter().map(|x| 0.5 * x / norm).collect()
        })
        .collect();

    let mut entities = Vec::new();
    let member = |rng: &mut ChaCha8Rng, id: String, center: &[f64], tags: Vec<String>| {
        let values: Vec<f64> = center
            .iter()
            .map(|c| c + rng.gen_range(-0.03..0.03))
            .collect();
        Entity::new(
            id,
            FeatureVector::new(values).unwrap(),
            rng.gen_range(0.5..1.0),
            rng.gen_range(0.0..1.0),
            tags,
            "reference",
        )
        .unwrap()
    };

    for (c, center) in centers.iter().enumerate() {
        for i in 0..per_cluster {
            let topic = if i == 0 {
                TOPICS[(c + 1) % clusters]
            } else {
                TOPICS[c]
            };
            let tags = vec!["#embed:model-a".to_string(), topic.to_string()];
            entities.push(member(&mut rng, format!("c{}-{:03}", c, i), center, tags));
        }
    }
    let bridge_tags = vec![TOPICS[0].to_string(), TOPICS[1].to_string()];
    entities.push(member(&mut rng, BRIDGE_ID.to_string(), &centers[0], bridge_tags));
    let system_tags = vec!["#public".to_string(), "#dna:abc".to_string()];
    entities.push(member(&mut rng, UNTAGGED_ID.to_string(), &centers[0], system_tags));

    Corpus::from_entities(dim, entities).unwrap()
}
