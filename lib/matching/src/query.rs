//! Search queries and their extracted features.

use lostfound_core::{Polarity, TextVector, VisualVector};
use lostfound_features::{TextExtractor, VisualExtractor};

/// A search request: optional description, optional image, and the polarity
/// of the reports being searched.
#[derive(Debug, Clone)]
pub struct Query {
    pub text: Option<String>,
    pub image: Option<Vec<u8>>,
    pub target: Polarity,
}

impl Query {
    pub fn new(target: Polarity) -> Self {
        Self {
            text: None,
            image: None,
            target,
        }
    }

    /// Query on behalf of someone holding a report of type `report_type`;
    /// a person who lost something searches the FOUND reports.
    pub fn for_report_type(report_type: Polarity) -> Self {
        Self::new(report_type.opposite())
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
}

/// Features of a query. A modality is `None` when the query did not supply
/// it or when extraction produced nothing.
#[derive(Debug, Clone)]
pub struct QueryFeatures {
    pub target: Polarity,
    /// Raw query text, kept for the match explanation
    pub source_text: Option<String>,
    pub text: Option<TextVector>,
    pub visual: Option<VisualVector>,
}

impl QueryFeatures {
    pub fn new(target: Polarity) -> Self {
        Self {
            target,
            source_text: None,
            text: None,
            visual: None,
        }
    }

    /// Run both extractors over a query. Never fails: an undecodable image or
    /// a description made only of stop words leaves that modality absent.
    pub fn extract(query: &Query, text: &TextExtractor, visual: &VisualExtractor) -> Self {
        let mut features = Self::new(query.target);

        if let Some(raw) = query.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let vector = text.extract(raw);
            if vector.is_empty() {
                tracing::debug!("query text '{}' has no content words", raw);
            } else {
                features.text = Some(vector);
            }
            features.source_text = Some(raw.to_string());
        }

        if let Some(bytes) = query.image.as_deref() {
            features.visual = visual.extract_or_absent(bytes);
        }

        features
    }

    #[must_use]
    pub fn with_text_vector(mut self, source: impl Into<String>, vector: TextVector) -> Self {
        self.source_text = Some(source.into());
        self.text = (!vector.is_empty()).then_some(vector);
        self
    }

    #[must_use]
    pub fn with_visual_vector(mut self, vector: VisualVector) -> Self {
        self.visual = Some(vector);
        self
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_visual(&self) -> bool {
        self.visual.is_some()
    }

    /// True when no modality survived extraction; such a query matches nothing.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.visual.is_none()
    }
}
