//! Lossless binary encoding of feature vectors.
//!
//! Stores keep vectors as opaque blobs next to an item; these helpers are the
//! only supported way to produce and read those blobs.

use crate::vector::{TextVector, VisualVector};
use crate::{Error, Result};

pub fn encode_visual(vector: &VisualVector) -> Result<Vec<u8>> {
    Ok(bincode::serialize(vector)?)
}

pub fn decode_visual(bytes: &[u8]) -> Result<VisualVector> {
    let vector: VisualVector = bincode::deserialize(bytes)?;
    if vector.color_len() > vector.dim() {
        return Err(Error::InvalidDimension {
            expected: vector.color_len(),
            actual: vector.dim(),
        });
    }
    Ok(vector)
}

pub fn encode_text(vector: &TextVector) -> Result<Vec<u8>> {
    Ok(bincode::serialize(vector)?)
}

pub fn decode_text(bytes: &[u8]) -> Result<TextVector> {
    Ok(bincode::deserialize(bytes)?)
}
