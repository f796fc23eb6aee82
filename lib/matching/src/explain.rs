//! Explainability for match results
//!
//! Derives the words a query and a candidate have in common, and provides
//! serializable output structures that show how a score came about.

use crate::fusion::ModalityScores;
use crate::rank::MatchResult;
use lostfound_core::{Category, ItemId};
use lostfound_features::TextExtractor;
use ahash::AHashSet;
use serde::Serialize;

/// Distinct normalized tokens present in both texts, in order of first
/// occurrence in `query`. Presentation only; never used for scoring.
pub fn matched_keywords(extractor: &TextExtractor, query: &str, candidate: &str) -> Vec<String> {
    let candidate_tokens: AHashSet<String> = extractor.tokens(candidate).into_iter().collect();
    if candidate_tokens.is_empty() {
        return Vec::new();
    }

    let mut seen = AHashSet::new();
    extractor
        .tokens(query)
        .into_iter()
        .filter(|token| candidate_tokens.contains(token))
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Coarse confidence bucket for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: f32) -> Self {
        if score > 0.7 {
            ConfidenceBand::High
        } else if score > 0.4 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// An explained match with its per-modality breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedMatch {
    pub id: ItemId,
    pub score: f32,
    /// Score as a whole percentage, truncated
    pub percent: u32,
    pub band: ConfidenceBand,
    pub category: Category,
    pub description: String,
    /// Per-modality similarities before fusion
    pub explain: ModalityScores,
    pub keywords: Vec<String>,
    /// Only revealed once the searcher confirms the match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl ExplainedMatch {
    /// Create an explained match from a ranked result
    pub fn from_result(result: &MatchResult, include_contact: bool) -> Self {
        Self {
            id: result.item.id,
            score: result.score,
            percent: (result.score * 100.0) as u32,
            band: ConfidenceBand::from_score(result.score),
            category: result.item.category,
            description: result.item.description.clone(),
            explain: result.scores,
            keywords: result.keywords.clone(),
            contact: include_contact.then(|| result.item.contact.clone()),
        }
    }
}

/// Summary statistics for a search
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f32,
    /// Score of best result
    pub best_score: f32,
}

impl MatchStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[MatchResult], candidates_count: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
            };
        }

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;
        let best_score = results[0].score; // Results are sorted

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score,
        }
    }
}

/// Response structure for a search
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub result: Vec<ExplainedMatch>,
    pub stats: MatchStats,
}

impl MatchResponse {
    pub fn from_results(results: &[MatchResult], candidates_count: usize) -> Self {
        Self {
            result: results
                .iter()
                .map(|r| ExplainedMatch::from_result(r, false))
                .collect(),
            stats: MatchStats::compute(results, candidates_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lostfound_core::{Item, OwnerId, Polarity, TextVector};

    fn create_test_result(id: u64, score: f32) -> MatchResult {
        MatchResult {
            item: Item {
                id: ItemId(id),
                owner: OwnerId(3),
                polarity: Polarity::Found,
                category: Category::Keys,
                description: "silver keys".to_string(),
                image_ref: None,
                visual: None,
                text: TextVector::empty(),
                contact: "desk@campus.edu".to_string(),
            },
            score,
            scores: ModalityScores { visual: None, text: Some(score) },
            keywords: vec!["key".to_string()],
        }
    }

    #[test]
    fn test_matched_keywords_example() {
        let t = TextExtractor::default();
        let words = matched_keywords(&t, "Blue Nike backpack", "Found a blue backpack near the gym");
        assert_eq!(words, vec!["blue", "backpack"]);
    }

    #[test]
    fn test_matched_keywords_order_follows_query() {
        let t = TextExtractor::default();
        let words = matched_keywords(&t, "backpack, blue, BLUE backpack", "blue backpack");
        assert_eq!(words, vec!["backpack", "blue"]);
    }

    #[test]
    fn test_matched_keywords_use_base_forms() {
        let t = TextExtractor::default();
        assert_eq!(matched_keywords(&t, "car keys", "a key ring with a car fob"), vec!["car", "key"]);
    }

    #[test]
    fn test_matched_keywords_empty_cases() {
        let t = TextExtractor::default();
        assert!(matched_keywords(&t, "", "blue backpack").is_empty());
        assert!(matched_keywords(&t, "blue backpack", "").is_empty());
        assert!(matched_keywords(&t, "black umbrella", "silver keys").is_empty());
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::from_score(0.95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.7), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.41), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.4), ConfidenceBand::Low);
    }

    #[test]
    fn test_explained_match_hides_contact() {
        let result = create_test_result(1, 0.856);
        let explained = ExplainedMatch::from_result(&result, false);
        assert_eq!(explained.percent, 85);
        assert_eq!(explained.band, ConfidenceBand::High);
        assert!(explained.contact.is_none());

        let revealed = ExplainedMatch::from_result(&result, true);
        assert_eq!(revealed.contact.as_deref(), Some("desk@campus.edu"));
    }

    #[test]
    fn test_response_serialization() {
        let results = vec![create_test_result(1, 0.95), create_test_result(2, 0.55)];
        let response = MatchResponse::from_results(&results, 10);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"result\""));
        assert!(json.contains("\"keywords\""));
        assert!(json.contains("\"band\":\"medium\""));
        assert!(!json.contains("desk@campus.edu"));
    }

    #[test]
    fn test_match_stats() {
        let results = vec![
            create_test_result(1, 0.95),
            create_test_result(2, 0.85),
            create_test_result(3, 0.75),
        ];
        let stats = MatchStats::compute(&results, 10);

        assert_eq!(stats.candidates_count, 10);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_score, 0.95);
        assert!((stats.avg_score - 0.85).abs() < 0.01);
    }

    #[test]
    fn test_empty_stats() {
        let stats = MatchStats::compute(&[], 5);
        assert_eq!(stats.candidates_count, 5);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
    }
}
