//! Semantic/system tag classification.
//!
//! Tags such as `#dna:…` or `#public` are bookkeeping labels attached by
//! pipelines; they say nothing about what an entity means and are excluded
//! from boundary and bridging scores.

use std::collections::HashSet;

use crate::config::TagConfig;

/// Tags split into semantic and system groups, input order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPartition {
    pub semantic: Vec<String>,
    pub system: Vec<String>,
}

/// Prefix/exact-match rule deciding whether a tag is a system tag.
#[derive(Debug, Clone)]
pub struct TagClassifier {
    prefixes: Vec<String>,
    exact: HashSet<String>,
}

impl TagClassifier {
    pub fn from_config(config: &TagConfig) -> Self {
        Self {
            prefixes: config.system_prefixes.clone(),
            exact: config.system_exact.iter().cloned().collect(),
        }
    }

    /// A tag is a system tag when it equals a reserved string or starts with
    /// a reserved prefix.
    pub fn is_system(&self, tag: &str) -> bool {
        self.exact.contains(tag) || self.prefixes.iter().any(|p| tag.starts_with(p.as_str()))
    }

    pub fn partition<S: AsRef<str>>(&self, tags: &[S]) -> TagPartition {
        let mut out = TagPartition::default();
        for tag in tags {
            let tag = tag.as_ref();
            if self.is_system(tag) {
                out.system.push(tag.to_string());
            } else {
                out.semantic.push(tag.to_string());
            }
        }
        out
    }

    /// Semantic tags as a set, for membership tests during scoring.
    pub fn semantic_set<S: AsRef<str>>(&self, tags: &[S]) -> HashSet<String> {
        tags.iter()
            .map(|t| t.as_ref())
            .filter(|t| !self.is_system(t))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::from_config(&TagConfig::default())
    }
}
