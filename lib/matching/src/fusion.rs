//! Hybrid fusion of visual and text similarity.
//!
//! `None` means the modality is absent (no query vector or no candidate
//! vector); `Some(0.0)` means present but dissimilar. Only the latter pulls a
//! fused score down: with one modality absent the other passes through
//! unchanged.

use crate::config::FusionWeights;
use serde::Serialize;

/// Per-modality similarities of one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModalityScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<f32>,
}

impl ModalityScores {
    pub fn fused(&self, weights: &FusionWeights) -> f32 {
        fuse(self.visual, self.text, weights)
    }
}

/// Combine modality scores into one confidence in [0, 1].
///
/// Both present: convex combination with `weights`. One present: that score.
/// None present: 0.0.
pub fn fuse(visual: Option<f32>, text: Option<f32>, weights: &FusionWeights) -> f32 {
    let score = match (visual, text) {
        (Some(v), Some(t)) => weights.visual * v + weights.text * t,
        (Some(v), None) => v,
        (None, Some(t)) => t,
        (None, None) => 0.0,
    };
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
