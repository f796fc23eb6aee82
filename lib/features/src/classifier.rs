//! Category hint capability.

/// Suggests a category label for an image.
///
/// The label is only a default for the report form; it never feeds into
/// similarity scoring. Implementations return `None` when unsure or when the
/// image cannot be read.
pub trait CategoryClassifier: Send + Sync {
    fn classify(&self, image: &[u8]) -> Option<String>;
}

/// Classifier that never has an opinion. Used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl CategoryClassifier for NoClassifier {
    fn classify(&self, _image: &[u8]) -> Option<String> {
        None
    }
}

impl<F> CategoryClassifier for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn classify(&self, image: &[u8]) -> Option<String> {
        self(image)
    }
}
