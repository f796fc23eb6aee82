//! Per-modality similarity functions
//!
//! All functions return a similarity score in range [0.0, 1.0] where 1.0 means
//! identical. A missing vector on either side scores exactly 0.0.

use crate::config::VisualWeights;
use lostfound_core::vector::{cosine_similarity, histogram_intersection, norm};
use lostfound_core::{TextVector, VisualVector};

/// Calculate visual similarity between two visual vectors
///
/// Color halves are compared by histogram intersection, shape halves by
/// cosine, and the two are blended with `weights`. Vectors produced under
/// different extractor geometries are not comparable and score 0.0.
pub fn visual_similarity(a: &VisualVector, b: &VisualVector, weights: &VisualWeights) -> f32 {
    if !a.is_compatible(b) {
        return 0.0;
    }

    let color = part_similarity(a.color(), b.color(), histogram_intersection);
    let shape = part_similarity(a.shape(), b.shape(), cosine_similarity);

    clamp_unit(weights.color * color + weights.shape * shape)
}

/// Calculate text similarity between two token-weight vectors
///
/// Cosine over shared tokens. An empty vector on either side scores 0.0,
/// so two empty descriptions never register as a match.
pub fn text_similarity(a: &TextVector, b: &TextVector) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    clamp_unit(a.dot(b) / denom)
}

/// Visual similarity with absence handling
pub fn visual_score(
    a: Option<&VisualVector>,
    b: Option<&VisualVector>,
    weights: &VisualWeights,
) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => visual_similarity(a, b, weights),
        _ => 0.0,
    }
}

/// Text similarity with absence handling
pub fn text_score(a: Option<&TextVector>, b: Option<&TextVector>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => text_similarity(a, b),
        _ => 0.0,
    }
}

/// Two all-zero halves are identical (e.g. the shape descriptor of a
/// flat image), so they score 1.0 rather than an undefined cosine.
fn part_similarity(a: &[f32], b: &[f32], measure: fn(&[f32], &[f32]) -> f32) -> f32 {
    let zero_a = norm(a) == 0.0;
    let zero_b = norm(b) == 0.0;
    match (zero_a, zero_b) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => clamp_unit(measure(a, b)),
    }
}

#[inline]
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights() -> VisualWeights {
        VisualWeights::default()
    }

    fn text(tokens: &[(&str, u32)]) -> TextVector {
        TextVector::from_counts(tokens.iter().map(|(t, c)| (t.to_string(), *c)))
    }

    #[test]
    fn test_identical_visual_is_one() {
        let v = VisualVector::from_parts(vec![0.5, 0.25, 0.25], vec![0.3, 0.7, 0.1]);
        assert!((visual_similarity(&v, &v, &weights()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_disjoint_visual_is_zero() {
        let a = VisualVector::from_parts(vec![1.0, 0.0], vec![1.0, 0.0]);
        let b = VisualVector::from_parts(vec![0.0, 1.0], vec![0.0, 1.0]);
        assert_eq!(visual_similarity(&a, &b, &weights()), 0.0);
    }

    #[test]
    fn test_flat_shape_halves_match() {
        let a = VisualVector::from_parts(vec![1.0, 0.0], vec![0.0, 0.0]);
        assert!((visual_similarity(&a, &a, &weights()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_incompatible_visual_is_zero() {
        let a = VisualVector::from_parts(vec![1.0], vec![1.0, 0.0]);
        let b = VisualVector::from_parts(vec![1.0, 0.0], vec![1.0]);
        assert_eq!(visual_similarity(&a, &b, &weights()), 0.0);
    }

    #[test]
    fn test_visual_weights_apply() {
        let a = VisualVector::from_parts(vec![1.0, 0.0], vec![1.0, 0.0]);
        let b = VisualVector::from_parts(vec![1.0, 0.0], vec![0.0, 1.0]);
        let color_only = VisualWeights { color: 1.0, shape: 0.0 };
        let shape_only = VisualWeights { color: 0.0, shape: 1.0 };
        assert!((visual_similarity(&a, &b, &color_only) - 1.0).abs() < 1e-6);
        assert_eq!(visual_similarity(&a, &b, &shape_only), 0.0);
        assert!((visual_similarity(&a, &b, &weights()) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_text_similarity() {
        let a = text(&[("blue", 1), ("backpack", 1)]);
        let b = text(&[("blue", 1), ("backpack", 1), ("library", 1)]);
        let sim = text_similarity(&a, &b);
        let expected = 2.0 / (2.0f32.sqrt() * 3.0f32.sqrt());
        assert!((sim - expected).abs() < 1e-6);
        assert!((text_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_text_never_matches() {
        let empty = TextVector::empty();
        assert_eq!(text_similarity(&empty, &empty), 0.0);
        assert_eq!(text_similarity(&empty, &text(&[("keys", 1)])), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        use crate::config::FusionWeights;
        use crate::fusion::fuse;
        use rand::prelude::*;
        use rand::rngs::StdRng;

        const VOCAB: &[&str] = &["blue", "backpack", "keys", "laptop", "gym", "silver", "case", "strap"];
        let mut rng = StdRng::seed_from_u64(17);

        let random_visual = |rng: &mut StdRng| {
            // raw, unnormalized halves with occasional all-zero parts
            let color: Vec<f32> = (0..16)
                .map(|_| if rng.random_bool(0.2) { 0.0 } else { rng.random_range(0.0..5.0) })
                .collect();
            let shape: Vec<f32> = if rng.random_bool(0.1) {
                vec![0.0; 24]
            } else {
                (0..24).map(|_| rng.random_range(0.0..1.0)).collect()
            };
            VisualVector::from_parts(color, shape)
        };
        let random_text = |rng: &mut StdRng| {
            let len = rng.random_range(0..6);
            TextVector::from_counts(
                (0..len).map(|_| (VOCAB[rng.random_range(0..VOCAB.len())].to_string(), rng.random_range(1..4))),
            )
        };

        for _ in 0..500 {
            let (va, vb) = (random_visual(&mut rng), random_visual(&mut rng));
            let (ta, tb) = (random_text(&mut rng), random_text(&mut rng));
            let mut w = FusionWeights::new(rng.random_range(0.0..1.0), rng.random_range(0.01..1.0));
            w.validate_and_normalize().unwrap();

            let v = visual_similarity(&va, &vb, &weights());
            let t = text_similarity(&ta, &tb);
            assert!((0.0..=1.0).contains(&v), "visual {}", v);
            assert!((0.0..=1.0).contains(&t), "text {}", t);

            for fused in [fuse(Some(v), Some(t), &w), fuse(Some(v), None, &w), fuse(None, Some(t), &w)] {
                assert!((0.0..=1.0).contains(&fused), "fused {}", fused);
            }
        }
    }

    #[test]
    fn test_absent_scores_zero() {
        let v = VisualVector::from_parts(vec![1.0], vec![1.0]);
        assert_eq!(visual_score(Some(&v), None, &weights()), 0.0);
        assert_eq!(visual_score(None, Some(&v), &weights()), 0.0);
        let t = text(&[("keys", 1)]);
        assert_eq!(text_score(None, Some(&t)), 0.0);
        assert!((text_score(Some(&t), Some(&t)) - 1.0).abs() < 1e-6);
    }
}
