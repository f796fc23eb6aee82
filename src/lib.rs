//! # lostfound
//!
//! Multi-modal matching for a lost & found service.
//!
//! People report items they lost or found with a free-text description and,
//! optionally, a photo. lostfound turns both into feature vectors, and when
//! someone searches it ranks the reports of the opposite kind by a fused
//! visual + textual similarity, explaining each match with the words both
//! descriptions share.
//!
//! ## Quick Start
//!
//! ```bash
//! lostfound report --polarity found --description "blue backpack near the gym" \
//!     --image backpack.jpg --owner 7 --contact desk@campus.edu
//! lostfound search --for lost --text "Blue Nike backpack" --image mine.jpg
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use lostfound::prelude::*;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let store = ItemStore::new();
//!
//! engine
//!     .report(&store, ReportRequest::new(OwnerId(1), Polarity::Found, "Found a blue backpack near the gym", "desk@campus.edu"))
//!     .unwrap();
//!
//! let results = engine.search(&store, &SearchRequest::new(Polarity::Lost).with_text("Blue Nike backpack"));
//! assert_eq!(results[0].keywords, vec!["blue", "backpack"]);
//! ```
//!
//! ## Crate Structure
//!
//! - `lostfound-core` - Items, feature vectors, blob codec
//! - `lostfound-features` - Image and text feature extraction
//! - `lostfound-matching` - Similarity, fusion, ranking, explanation
//! - `lostfound-storage` - In-memory item store and snapshots

pub mod seed;

use lostfound_features::{
    CategoryClassifier, ExtractionError, NoClassifier, TextExtractor, VisualConfig, VisualExtractor,
};
use lostfound_matching::{MatchResult, MatcherConfig, Query, QueryFeatures, Ranker};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// Re-export core types
pub use lostfound_core::{
    CandidateSource, Category, Item, ItemDraft, ItemId, OwnerId, Polarity, TextVector, VisualVector,
};

// Re-export matching
pub use lostfound_matching::{
    ConfidenceBand, ConfigError, ExplainedMatch, FusionWeights, MatchResponse, MatchStats, ModalityScores,
    PrototypeClassifier, VisualWeights,
};

// Re-export storage
pub use lostfound_storage::{load_snapshot, save_snapshot, ItemStore};

pub use seed::{category_for_folder, labeled_image_dirs, LabeledDir, SeedSummary};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] lostfound_core::Error),

    #[error("Invalid matcher configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("A report needs a non-empty description")]
    EmptyDescription,

    #[error("Failed to process image: {0}")]
    ImageUnreadable(#[source] ExtractionError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Everything tunable about the engine, loadable from one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matcher: MatcherConfig,
    pub visual: VisualConfig,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Core(e.into()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(lostfound_core::Error::from)?;
        Self::from_json(&json)
    }
}

/// A new lost or found report, before feature extraction.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub owner: OwnerId,
    pub polarity: Polarity,
    pub description: String,
    pub image: Option<Vec<u8>>,
    pub image_ref: Option<String>,
    /// Left empty to accept the classifier's hint
    pub category: Option<Category>,
    pub contact: String,
}

impl ReportRequest {
    pub fn new(owner: OwnerId, polarity: Polarity, description: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            owner,
            polarity,
            description: description.into(),
            image: None,
            image_ref: None,
            category: None,
            contact: contact.into(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: Vec<u8>, image_ref: Option<String>) -> Self {
        self.image = Some(image);
        self.image_ref = image_ref;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// A search on behalf of someone holding a report of type `report_type`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub report_type: Polarity,
    pub text: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl SearchRequest {
    pub fn new(report_type: Polarity) -> Self {
        Self {
            report_type,
            text: None,
            image: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    fn to_query(&self) -> Query {
        let mut query = Query::for_report_type(self.report_type);
        query.text = self.text.clone();
        query.image = self.image.clone();
        query
    }
}

/// Report intake and search over a candidate source.
///
/// The same extractors produce the stored vectors and the query vectors, so
/// scores are only meaningful between items reported through one engine
/// configuration.
pub struct Engine {
    visual: VisualExtractor,
    text: TextExtractor,
    classifier: Box<dyn CategoryClassifier>,
    ranker: Ranker,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let visual = VisualExtractor::new(config.visual)?;
        let text = TextExtractor::default();
        let ranker = Ranker::new(config.matcher)?.with_text_extractor(text);
        Ok(Self {
            visual,
            text,
            classifier: Box::new(NoClassifier),
            ranker,
        })
    }

    #[must_use]
    pub fn with_classifier<C: CategoryClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn visual_extractor(&self) -> &VisualExtractor {
        &self.visual
    }

    pub fn text_extractor(&self) -> &TextExtractor {
        &self.text
    }

    /// Category hint for an image. Labels outside the fixed set map to
    /// `Other`; `None` means the classifier had no opinion.
    pub fn suggest_category(&self, image: &[u8]) -> Option<Category> {
        let label = self.classifier.classify(image)?;
        let category = Category::from_label(&label);
        tracing::debug!("classifier hint '{}' -> {}", label, category);
        Some(category)
    }

    /// Extract features for a report and store it
    pub fn report(&self, store: &ItemStore, request: ReportRequest) -> Result<ItemId> {
        let description = request.description.trim();
        if description.is_empty() {
            return Err(EngineError::EmptyDescription);
        }

        // a report's image must be usable; only queries may drop a bad one
        let visual = match request.image.as_deref() {
            Some(bytes) => Some(self.visual.extract(bytes).map_err(EngineError::ImageUnreadable)?),
            None => None,
        };
        let category = request
            .category
            .or_else(|| request.image.as_deref().and_then(|bytes| self.suggest_category(bytes)))
            .unwrap_or_default();

        let draft = ItemDraft {
            owner: request.owner,
            polarity: request.polarity,
            category,
            description: description.to_string(),
            image_ref: request.image_ref,
            visual,
            text: self.text.extract(description),
            contact: request.contact,
        };
        let id = store.insert(draft);
        tracing::info!("{} report {} stored as {}", request.polarity, id, category);
        Ok(id)
    }

    /// Extract the query's features without ranking
    pub fn query_features(&self, request: &SearchRequest) -> QueryFeatures {
        QueryFeatures::extract(&request.to_query(), &self.text, &self.visual)
    }

    /// Rank the reports of the opposite polarity, best first
    pub fn search<S>(&self, source: &S, request: &SearchRequest) -> Vec<MatchResult>
    where
        S: CandidateSource + ?Sized,
    {
        let features = self.query_features(request);
        self.ranker.rank_source(&features, source)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CandidateSource, Category, ConfidenceBand, Engine, EngineConfig, EngineError, ExplainedMatch, Item,
        ItemId, ItemStore, MatchResponse, OwnerId, Polarity, ReportRequest, SearchRequest,
    };
    pub use lostfound_matching::MatchResult;
}
