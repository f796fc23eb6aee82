//! # lostfound Features
//!
//! Deterministic feature extraction for lost & found reports.
//!
//! - [`VisualExtractor`] - image bytes to a fixed-length [`VisualVector`]
//!   (HSV color histogram followed by a HOG descriptor)
//! - [`TextExtractor`] - description to a normalized [`TextVector`]
//! - [`CategoryClassifier`] - pluggable category hint for the report form
//!
//! ## Example
//!
//! ```rust
//! use lostfound_features::{TextExtractor, VisualExtractor};
//!
//! let text = TextExtractor::default();
//! let vector = text.extract("Blue Nike backpack");
//! assert!(vector.contains("backpack"));
//!
//! // Unreadable images are reported, not panicked on
//! let visual = VisualExtractor::default();
//! assert!(visual.extract(b"not a png").is_err());
//! ```
//!
//! [`VisualVector`]: lostfound_core::VisualVector
//! [`TextVector`]: lostfound_core::TextVector

pub mod classifier;
pub mod color;
pub mod error;
pub mod hog;
pub mod text;
pub mod visual;

pub use classifier::{CategoryClassifier, NoClassifier};
pub use error::ExtractionError;
pub use text::TextExtractor;
pub use visual::{VisualConfig, VisualExtractor};
