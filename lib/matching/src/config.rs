//! Matcher configuration
//!
//! Declares how much each modality counts in a fused score, how the two halves
//! of a visual vector are weighted, and when scoring fans out across threads.
//! Weights are normalized to sum to 1.0 on validation.

use serde::{Deserialize, Serialize};

/// Weights of the visual and text modalities when both are present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    pub visual: f32,
    pub text: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            visual: 0.4,
            text: 0.6,
        }
    }
}

impl FusionWeights {
    pub fn new(visual: f32, text: f32) -> Self {
        Self { visual, text }
    }

    /// Check that weights are non-negative and rescale them to sum to 1.0
    pub fn validate_and_normalize(&mut self) -> Result<(), ConfigError> {
        let (visual, text) = normalize_pair("fusion", self.visual, self.text)?;
        self.visual = visual;
        self.text = text;
        Ok(())
    }
}

/// Weights of the color histogram and the shape descriptor inside the
/// visual similarity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VisualWeights {
    pub color: f32,
    pub shape: f32,
}

impl Default for VisualWeights {
    fn default() -> Self {
        Self {
            color: 0.5,
            shape: 0.5,
        }
    }
}

impl VisualWeights {
    pub fn validate_and_normalize(&mut self) -> Result<(), ConfigError> {
        let (color, shape) = normalize_pair("visual", self.color, self.shape)?;
        self.color = color;
        self.shape = shape;
        Ok(())
    }
}

/// Matcher configuration
///
/// Loaded from JSON; every field is optional and falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatcherConfig {
    pub fusion: FusionWeights,
    pub visual: VisualWeights,
    /// Score candidates on the rayon pool
    pub parallel: bool,
    /// Minimum pool size before scoring goes parallel
    pub parallel_threshold: usize,
    /// Results must score strictly above this value (and above zero)
    pub min_score: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fusion: FusionWeights::default(),
            visual: VisualWeights::default(),
            parallel: true,
            parallel_threshold: 256,
            min_score: 0.0,
        }
    }
}

impl MatcherConfig {
    /// Validate the configuration
    /// - Checks that weights are non-negative and not all zero
    /// - Normalizes each weight pair to sum to 1.0
    /// - Checks that `min_score` lies in [0, 1)
    pub fn validate_and_normalize(&mut self) -> Result<(), ConfigError> {
        self.fusion.validate_and_normalize()?;
        self.visual.validate_and_normalize()?;

        if !(0.0..1.0).contains(&self.min_score) {
            return Err(ConfigError::InvalidParameter(format!(
                "min_score must be in [0, 1), got {}",
                self.min_score
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: MatcherConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate_and_normalize()?;
        Ok(config)
    }
}

fn normalize_pair(group: &str, a: f32, b: f32) -> Result<(f32, f32), ConfigError> {
    if a < 0.0 || b < 0.0 || !a.is_finite() || !b.is_finite() {
        return Err(ConfigError::NegativeWeight(group.to_string()));
    }
    let sum = a + b;
    if sum <= 0.0 {
        return Err(ConfigError::ZeroTotalWeight(group.to_string()));
    }
    if (sum - 1.0).abs() > 0.001 {
        Ok((a / sum, b / sum))
    } else {
        Ok((a, b))
    }
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Weights in '{0}' must be non-negative and finite")]
    NegativeWeight(String),

    #[error("Weights in '{0}' cannot all be zero")]
    ZeroTotalWeight(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid configuration document: {0}")]
    Parse(String),
}
