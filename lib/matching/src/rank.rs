//! Ranker for multi-modal matching
//!
//! Scores every candidate of the target polarity against a query, drops
//! non-matches, and orders the rest by descending score. Ties are broken by
//! ascending item id so repeated runs produce the same sequence.

use crate::config::{ConfigError, FusionWeights, MatcherConfig};
use crate::distance::{text_similarity, visual_similarity};
use crate::explain::matched_keywords;
use crate::fusion::ModalityScores;
use crate::query::QueryFeatures;
use lostfound_core::{CandidateSource, Item, ItemId};
use lostfound_features::TextExtractor;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Ordering;

/// A scored candidate with its explanation
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The candidate report
    pub item: Item,
    /// Fused confidence in (0, 1]
    pub score: f32,
    /// Per-modality similarities before fusion
    pub scores: ModalityScores,
    /// Content words shared by the query text and the candidate description
    pub keywords: Vec<String>,
}

impl MatchResult {
    pub fn id(&self) -> ItemId {
        self.item.id
    }
}

/// Ranker that computes fused similarity scores
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: MatcherConfig,
    text: TextExtractor,
}

impl Ranker {
    /// Create a ranker, validating and normalizing `config`
    pub fn new(mut config: MatcherConfig) -> Result<Self, ConfigError> {
        config.validate_and_normalize()?;
        Ok(Self {
            config,
            text: TextExtractor::default(),
        })
    }

    /// Use `text` to tokenize descriptions for explanations. Must match the
    /// extractor that produced the stored text vectors.
    #[must_use]
    pub fn with_text_extractor(mut self, text: TextExtractor) -> Self {
        self.text = text;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Create a copy with different fusion weights (normalized)
    pub fn with_weights(&self, mut weights: FusionWeights) -> Result<Self, ConfigError> {
        weights.validate_and_normalize()?;
        let mut ranker = self.clone();
        ranker.config.fusion = weights;
        Ok(ranker)
    }

    /// Per-modality similarities of one candidate.
    ///
    /// A modality counts as present only when both the query and the
    /// candidate carry a vector for it.
    pub fn modality_scores(&self, query: &QueryFeatures, item: &Item) -> ModalityScores {
        let visual = match (&query.visual, &item.visual) {
            (Some(q), Some(c)) => Some(visual_similarity(q, c, &self.config.visual)),
            _ => None,
        };
        let text = match &query.text {
            Some(q) if !item.text.is_empty() => Some(text_similarity(q, &item.text)),
            _ => None,
        };
        ModalityScores { visual, text }
    }

    /// Fused score of one candidate
    pub fn score(&self, query: &QueryFeatures, item: &Item) -> f32 {
        self.modality_scores(query, item).fused(&self.config.fusion)
    }

    /// Rank candidates against the query
    ///
    /// # Arguments
    /// * `query` - Extracted query features
    /// * `candidates` - Snapshot of the candidate pool; items of the wrong
    ///   polarity are skipped
    ///
    /// # Returns
    /// Matches with score above zero, best first
    pub fn rank(&self, query: &QueryFeatures, candidates: Vec<Item>) -> Vec<MatchResult> {
        if query.is_empty() {
            tracing::debug!("query has no usable modality, nothing to rank");
            return Vec::new();
        }

        let pool = candidates.len();
        let mut results: Vec<MatchResult> = if self.config.parallel && pool >= self.config.parallel_threshold {
            candidates
                .into_par_iter()
                .filter_map(|item| self.score_candidate(query, item))
                .collect()
        } else {
            candidates
                .into_iter()
                .filter_map(|item| self.score_candidate(query, item))
                .collect()
        };

        results.sort_by(compare_results);

        tracing::debug!(
            "ranked {} candidates, {} matches (text: {}, visual: {})",
            pool,
            results.len(),
            query.has_text(),
            query.has_visual()
        );
        results
    }

    /// Fetch the target polarity from `source` and rank it
    pub fn rank_source<S>(&self, query: &QueryFeatures, source: &S) -> Vec<MatchResult>
    where
        S: CandidateSource + ?Sized,
    {
        self.rank(query, source.candidates(query.target))
    }

    fn score_candidate(&self, query: &QueryFeatures, item: Item) -> Option<MatchResult> {
        if item.polarity != query.target {
            return None;
        }

        let scores = self.modality_scores(query, &item);
        let score = scores.fused(&self.config.fusion);
        if !score.is_finite() || score <= 0.0 || score <= self.config.min_score {
            return None;
        }

        let keywords = match &query.source_text {
            Some(text) => matched_keywords(&self.text, text, &item.description),
            None => Vec::new(),
        };

        Some(MatchResult {
            item,
            score,
            scores,
            keywords,
        })
    }
}

/// Descending score, then ascending id
fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    OrderedFloat(b.score)
        .cmp(&OrderedFloat(a.score))
        .then_with(|| a.item.id.cmp(&b.item.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_core::{Category, OwnerId, Polarity, TextVector, VisualVector};

    fn text_extractor() -> TextExtractor {
        TextExtractor::default()
    }

    fn create_test_item(id: u64, polarity: Polarity, description: &str, visual: Option<VisualVector>) -> Item {
        Item {
            id: ItemId(id),
            owner: OwnerId(1),
            polarity,
            category: Category::Backpack,
            description: description.to_string(),
            image_ref: None,
            visual,
            text: text_extractor().extract(description),
            contact: format!("owner{}@campus.edu", id),
        }
    }

    fn text_query(text: &str) -> QueryFeatures {
        QueryFeatures::new(Polarity::Found).with_text_vector(text, text_extractor().extract(text))
    }

    fn visual(color: [f32; 2], shape: [f32; 2]) -> VisualVector {
        VisualVector::from_parts(color.to_vec(), shape.to_vec())
    }

    #[test]
    fn test_rank_orders_by_score() {
        let ranker = Ranker::default();
        let candidates = vec![
            create_test_item(1, Polarity::Found, "red water bottle", None),
            create_test_item(2, Polarity::Found, "blue backpack with laptop", None),
            create_test_item(3, Polarity::Found, "blue backpack", None),
        ];

        let results = ranker.rank(&text_query("blue backpack"), candidates);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id(), ItemId(3));
        assert_eq!(results[1].id(), ItemId(2));
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_zero_scores_are_excluded() {
        let ranker = Ranker::default();
        let candidates = vec![create_test_item(1, Polarity::Found, "silver keys on a ring", None)];
        let results = ranker.rank(&text_query("black umbrella"), candidates);
        assert!(results.is_empty());
    }

    #[test]
    fn test_wrong_polarity_is_skipped() {
        let ranker = Ranker::default();
        let candidates = vec![
            create_test_item(1, Polarity::Lost, "blue backpack", None),
            create_test_item(2, Polarity::Found, "blue backpack", None),
        ];
        let results = ranker.rank(&text_query("blue backpack"), candidates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), ItemId(2));
    }

    #[test]
    fn test_ties_broken_by_id() {
        let ranker = Ranker::default();
        let candidates = vec![
            create_test_item(9, Polarity::Found, "blue backpack", None),
            create_test_item(4, Polarity::Found, "blue backpack", None),
            create_test_item(6, Polarity::Found, "blue backpack", None),
        ];
        let results = ranker.rank(&text_query("blue backpack"), candidates);
        let ids: Vec<u64> = results.iter().map(|r| r.id().0).collect();
        assert_eq!(ids, vec![4, 6, 9]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Ranker::new(MatcherConfig { parallel: false, ..MatcherConfig::default() }).unwrap();
        let parallel = Ranker::new(MatcherConfig {
            parallel: true,
            parallel_threshold: 1,
            ..MatcherConfig::default()
        })
        .unwrap();

        let descriptions = ["blue backpack", "blue bag", "backpack", "black backpack blue straps"];
        let candidates: Vec<Item> = (0..200)
            .map(|i| create_test_item(200 - i, Polarity::Found, descriptions[i as usize % 4], None))
            .collect();

        let query = text_query("blue backpack");
        let a: Vec<ItemId> = sequential.rank(&query, candidates.clone()).iter().map(|r| r.id()).collect();
        let b: Vec<ItemId> = parallel.rank(&query, candidates).iter().map(|r| r.id()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_visual_absent_on_candidate_passes_text_through() {
        let ranker = Ranker::default();
        let query = text_query("blue backpack").with_visual_vector(visual([1.0, 0.0], [1.0, 0.0]));
        let item = create_test_item(1, Polarity::Found, "blue backpack", None);

        let scores = ranker.modality_scores(&query, &item);
        assert_eq!(scores.visual, None);
        assert!((ranker.score(&query, &item) - scores.text.unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_visual_agreement_raises_score() {
        let ranker = Ranker::default();
        let v = visual([0.5, 0.5], [0.6, 0.8]);
        let item = create_test_item(1, Polarity::Found, "blue backpack found in library", Some(v.clone()));

        let text_only = ranker.score(&text_query("blue backpack"), &item);
        let hybrid = ranker.score(&text_query("blue backpack").with_visual_vector(v), &item);
        assert!(hybrid > text_only);
    }

    #[test]
    fn test_keywords_attached() {
        let ranker = Ranker::default();
        let candidates = vec![create_test_item(1, Polarity::Found, "Found a blue backpack near the gym", None)];
        let results = ranker.rank(&text_query("Blue Nike backpack"), candidates);
        assert_eq!(results[0].keywords, vec!["blue", "backpack"]);
    }

    #[test]
    fn test_min_score_filters() {
        let ranker = Ranker::new(MatcherConfig { min_score: 0.9, ..MatcherConfig::default() }).unwrap();
        let candidates = vec![
            create_test_item(1, Polarity::Found, "blue backpack", None),
            create_test_item(2, Polarity::Found, "blue backpack with stickers and laptop", None),
        ];
        let results = ranker.rank(&text_query("blue backpack"), candidates);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), ItemId(1));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let ranker = Ranker::default();
        let candidates = vec![create_test_item(1, Polarity::Found, "blue backpack", None)];
        assert!(ranker.rank(&QueryFeatures::new(Polarity::Found), candidates).is_empty());
    }

    #[test]
    fn test_empty_candidate_text_is_absent() {
        let ranker = Ranker::default();
        let mut item = create_test_item(1, Polarity::Found, "the", None);
        item.text = TextVector::empty();
        let scores = ranker.modality_scores(&text_query("blue backpack"), &item);
        assert_eq!(scores.text, None);
        assert_eq!(ranker.score(&text_query("blue backpack"), &item), 0.0);
    }

    #[test]
    fn test_with_weights_affects_scoring() {
        let ranker = Ranker::default();
        let v = visual([1.0, 0.0], [1.0, 0.0]);
        let item = create_test_item(1, Polarity::Found, "red bottle", Some(v.clone()));
        let query = text_query("blue backpack red").with_visual_vector(v);

        let visual_heavy = ranker.with_weights(FusionWeights::new(9.0, 1.0)).unwrap();
        assert!(visual_heavy.score(&query, &item) > ranker.score(&query, &item));
        assert!(ranker.with_weights(FusionWeights::new(-1.0, 1.0)).is_err());
    }
}
