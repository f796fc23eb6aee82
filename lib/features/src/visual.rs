//! Visual feature extraction
//!
//! Decodes an in-memory image, resizes it to a fixed square and produces a
//! [`VisualVector`]: joint HSV color histogram followed by a HOG descriptor.
//! The output length depends only on [`VisualConfig`], never on the input
//! resolution.

use crate::color::{histogram_len, hsv_histogram};
use crate::error::ExtractionError;
use crate::hog::{hog_descriptor, HogParams};
use image::imageops::FilterType;
use image::DynamicImage;
use lostfound_core::{Error, VisualVector};
use serde::{Deserialize, Serialize};

/// Geometry of the visual descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Side of the square every image is resized to before extraction
    pub resize: u32,
    /// Bins per H/S/V channel
    pub color_bins: u32,
    /// HOG cell side in pixels
    pub cell_size: u32,
    /// HOG block side in cells
    pub block_size: u32,
    /// Unsigned orientation bins over 0-180 degrees
    pub orientations: u32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            resize: 128,
            color_bins: 8,
            cell_size: 16,
            block_size: 2,
            orientations: 9,
        }
    }
}

impl VisualConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.resize == 0 || self.color_bins == 0 || self.orientations == 0 {
            return Err(Error::InvalidConfig(
                "resize, color_bins and orientations must be positive".to_string(),
            ));
        }
        if self.cell_size == 0 || self.block_size == 0 {
            return Err(Error::InvalidConfig(
                "cell_size and block_size must be positive".to_string(),
            ));
        }
        if self.resize / self.cell_size < self.block_size {
            return Err(Error::InvalidConfig(format!(
                "a {}px image has fewer than {} cells of {}px per side",
                self.resize, self.block_size, self.cell_size
            )));
        }
        Ok(())
    }

    fn hog_params(&self) -> HogParams {
        HogParams {
            cell_size: self.cell_size,
            block_size: self.block_size,
            orientations: self.orientations,
        }
    }

    pub fn color_len(&self) -> usize {
        histogram_len(self.color_bins)
    }

    pub fn shape_len(&self) -> usize {
        self.hog_params().descriptor_len(self.resize, self.resize)
    }

    /// Total vector dimension
    pub fn dim(&self) -> usize {
        self.color_len() + self.shape_len()
    }
}

/// Image bytes -> [`VisualVector`]. Pure; holds only its configuration.
#[derive(Debug, Clone, Default)]
pub struct VisualExtractor {
    config: VisualConfig,
}

impl VisualExtractor {
    pub fn new(config: VisualConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn dim(&self) -> usize {
        self.config.dim()
    }

    /// Decode `bytes` and extract the visual vector.
    pub fn extract(&self, bytes: &[u8]) -> Result<VisualVector, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyImage);
        }
        let img = image::load_from_memory(bytes)?;
        self.extract_image(&img)
    }

    /// Extract from an already decoded image.
    pub fn extract_image(&self, img: &DynamicImage) -> Result<VisualVector, ExtractionError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(ExtractionError::EmptyImage);
        }

        let side = self.config.resize;
        let resized = img.resize_exact(side, side, FilterType::Triangle);

        let color = hsv_histogram(&resized.to_rgb8(), self.config.color_bins);
        let shape = hog_descriptor(&resized.to_luma8(), &self.config.hog_params());
        debug_assert_eq!(color.len() + shape.len(), self.dim());

        Ok(VisualVector::from_parts(color, shape))
    }

    /// Like [`extract`](Self::extract) but logs and swallows failures,
    /// yielding an absent visual modality.
    pub fn extract_or_absent(&self, bytes: &[u8]) -> Option<VisualVector> {
        match self.extract(bytes) {
            Ok(vector) => Some(vector),
            Err(e) => {
                tracing::warn!("visual features unavailable: {}", e);
                None
            }
        }
    }
}
