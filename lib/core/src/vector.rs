use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Result};

/// Fixed-length visual descriptor of one image.
///
/// The first `color_len` components hold the color histogram, the remainder
/// the gradient-orientation descriptor. Both halves keep their own
/// normalization, so similarity is computed per half.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisualVector {
    data: Vec<f32>,
    color_len: usize,
}

impl VisualVector {
    pub fn new(data: Vec<f32>, color_len: usize) -> Result<Self> {
        if color_len > data.len() {
            return Err(Error::InvalidDimension {
                expected: color_len,
                actual: data.len(),
            });
        }
        Ok(Self { data, color_len })
    }

    /// Concatenate a color histogram and a shape descriptor, color first.
    #[must_use]
    pub fn from_parts(color: Vec<f32>, shape: Vec<f32>) -> Self {
        let color_len = color.len();
        let mut data = color;
        data.extend(shape);
        Self { data, color_len }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn color_len(&self) -> usize {
        self.color_len
    }

    #[inline]
    #[must_use]
    pub fn color(&self) -> &[f32] {
        &self.data[..self.color_len]
    }

    #[inline]
    #[must_use]
    pub fn shape(&self) -> &[f32] {
        &self.data[self.color_len..]
    }

    /// True when both vectors split into halves of the same lengths.
    #[inline]
    pub fn is_compatible(&self, other: &VisualVector) -> bool {
        self.dim() == other.dim() && self.color_len == other.color_len
    }
}

/// Histogram intersection, `sum(min(a_i, b_i))`. Equals 1.0 for identical
/// L1-normalized histograms.
#[inline]
pub fn histogram_intersection(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x.min(*y)).sum()
}

#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Cosine similarity of two slices; 0.0 when either has zero norm.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / (norm_a * norm_b)
}

/// Token -> weight map for one description, L2-normalized.
///
/// Tokens are kept sorted so that equal texts produce byte-identical
/// vectors and encodings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextVector {
    weights: BTreeMap<String, f32>,
}

impl TextVector {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw term counts, normalizing to unit length.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let mut weights: BTreeMap<String, f32> = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(token, count)| (token, count as f32))
            .collect();

        let magnitude: f32 = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for w in weights.values_mut() {
                *w /= magnitude;
            }
        }

        Self { weights }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn weight(&self, token: &str) -> Option<f32> {
        self.weights.get(token).copied()
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Sum of weight products over shared tokens. Iterates the smaller map.
    pub fn dot(&self, other: &TextVector) -> f32 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(token, w)| large.weights.get(token).map(|o| w * o))
            .sum()
    }

    pub fn norm(&self) -> f32 {
        self.weights.values().map(|w| w * w).sum::<f32>().sqrt()
    }
}
