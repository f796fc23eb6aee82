use thiserror::Error;

/// Why an image produced no visual vector.
///
/// Never fatal: callers degrade the visual modality to absent.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image is empty")]
    EmptyImage,
}
