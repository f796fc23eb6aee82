//! # lostfound Matching
//!
//! The multi-modal matching engine for lost & found reports.
//!
//! Given a query (optional description, optional image) and a pool of reports
//! of the opposite polarity, it scores every candidate per modality, fuses the
//! scores, drops non-matches and returns the rest best first, each with the
//! words the query and the candidate share.
//!
//! ## Features
//!
//! - **Per-modality similarity**: histogram intersection + HOG cosine for
//!   images, cosine over token weights for text
//! - **Hybrid fusion**: convex combination when both modalities are present,
//!   exact pass-through when one is absent
//! - **Deterministic ranking**: descending score, ties by item id, optional
//!   rayon fan-out
//! - **Explainability**: matched keywords and per-modality breakdown
//!
//! ## Example
//!
//! ```rust
//! use lostfound_core::{Category, Item, ItemId, OwnerId, Polarity};
//! use lostfound_features::{TextExtractor, VisualExtractor};
//! use lostfound_matching::{Query, QueryFeatures, Ranker};
//!
//! let text = TextExtractor::default();
//! let pool = vec![Item {
//!     id: ItemId(1),
//!     owner: OwnerId(2),
//!     polarity: Polarity::Found,
//!     category: Category::Backpack,
//!     description: "Found a blue backpack near the gym".to_string(),
//!     image_ref: None,
//!     visual: None,
//!     text: text.extract("Found a blue backpack near the gym"),
//!     contact: "desk@campus.edu".to_string(),
//! }];
//!
//! let query = Query::for_report_type(Polarity::Lost).with_text("Blue Nike backpack");
//! let features = QueryFeatures::extract(&query, &text, &VisualExtractor::default());
//!
//! let results = Ranker::default().rank(&features, pool);
//! assert_eq!(results[0].keywords, vec!["blue", "backpack"]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Query    │────>│ Extractors  │────>│  Distance   │
//! │ (text, img) │     │ (features)  │     │ (per mode)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Ranker    │<────│   Fusion    │
//!                     │ (filter,    │     │ (weights)   │
//!                     │  sort)      │     └─────────────┘
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Explain    │
//!                     │ (keywords)  │
//!                     └─────────────┘
//! ```

pub mod classifier;
pub mod config;
pub mod distance;
pub mod explain;
pub mod fusion;
pub mod query;
pub mod rank;

// Re-export main types for convenience
pub use classifier::PrototypeClassifier;
pub use config::{ConfigError, FusionWeights, MatcherConfig, VisualWeights};
pub use distance::{text_score, text_similarity, visual_score, visual_similarity};
pub use explain::{matched_keywords, ConfidenceBand, ExplainedMatch, MatchResponse, MatchStats};
pub use fusion::{fuse, ModalityScores};
pub use query::{Query, QueryFeatures};
pub use rank::{MatchResult, Ranker};
