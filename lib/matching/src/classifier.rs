//! Nearest-prototype category hints.

use crate::config::VisualWeights;
use crate::distance::visual_similarity;
use lostfound_core::VisualVector;
use lostfound_features::{CategoryClassifier, ExtractionError, VisualExtractor};

/// Suggests the label of the most visually similar labeled example.
///
/// A stand-in for a trained model: it only ever provides the default for the
/// report form and returns `None` below `min_similarity`.
#[derive(Debug, Clone)]
pub struct PrototypeClassifier {
    extractor: VisualExtractor,
    weights: VisualWeights,
    min_similarity: f32,
    prototypes: Vec<(String, VisualVector)>,
}

impl PrototypeClassifier {
    pub fn new(extractor: VisualExtractor, weights: VisualWeights) -> Self {
        Self {
            extractor,
            weights,
            min_similarity: 0.5,
            prototypes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn add_prototype(&mut self, label: impl Into<String>, vector: VisualVector) {
        self.prototypes.push((label.into(), vector));
    }

    /// Extract and register a labeled example image.
    pub fn add_image(&mut self, label: impl Into<String>, image: &[u8]) -> Result<(), ExtractionError> {
        let vector = self.extractor.extract(image)?;
        self.add_prototype(label, vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Best label and its similarity for an already extracted vector.
    /// Earlier prototypes win ties.
    pub fn nearest(&self, vector: &VisualVector) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for (label, prototype) in &self.prototypes {
            let sim = visual_similarity(vector, prototype, &self.weights);
            if best.map_or(true, |(_, s)| sim > s) {
                best = Some((label.as_str(), sim));
            }
        }
        best.filter(|(_, sim)| *sim >= self.min_similarity)
    }
}

impl CategoryClassifier for PrototypeClassifier {
    fn classify(&self, image: &[u8]) -> Option<String> {
        if self.prototypes.is_empty() {
            return None;
        }
        let vector = self.extractor.extract_or_absent(image)?;
        self.nearest(&vector).map(|(label, sim)| {
            tracing::debug!("category hint '{}' (similarity {:.3})", label, sim);
            label.to_string()
        })
    }
}
