//! Histogram of Oriented Gradients over a grayscale image.
//!
//! Unsigned orientations, hard binning per cell, overlapping square blocks
//! normalized with L2-Hys.

use image::GrayImage;

const EPS: f32 = 1e-5;
const HYS_CLIP: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HogParams {
    pub cell_size: u32,
    pub block_size: u32,
    pub orientations: u32,
}

impl HogParams {
    fn cells(&self, pixels: u32) -> usize {
        (pixels / self.cell_size.max(1)) as usize
    }

    fn blocks(&self, pixels: u32) -> usize {
        let cells = self.cells(pixels);
        let block = self.block_size as usize;
        if block == 0 || cells < block {
            0
        } else {
            cells - block + 1
        }
    }

    /// Descriptor length for a `width` x `height` image.
    pub fn descriptor_len(&self, width: u32, height: u32) -> usize {
        let block = self.block_size as usize;
        self.blocks(width) * self.blocks(height) * block * block * self.orientations as usize
    }
}

/// Compute the HOG descriptor, block-major, cells row-major inside a block.
pub fn hog_descriptor(img: &GrayImage, params: &HogParams) -> Vec<f32> {
    let (width, height) = img.dimensions();
    let orientations = params.orientations.max(1) as usize;
    let cell = params.cell_size.max(1) as usize;
    let cells_x = params.cells(width);
    let cells_y = params.cells(height);

    let mut cell_hist = vec![0.0f32; cells_x * cells_y * orientations];
    let bin_width = 180.0 / orientations as f32;

    for y in 0..cells_y * cell {
        for x in 0..cells_x * cell {
            let (gx, gy) = gradient(img, x as u32, y as u32);
            let magnitude = (gx * gx + gy * gy).sqrt();
            if magnitude == 0.0 {
                continue;
            }
            let mut angle = gy.atan2(gx).to_degrees();
            if angle < 0.0 {
                angle += 180.0;
            }
            if angle >= 180.0 {
                angle -= 180.0;
            }
            let bin = ((angle / bin_width) as usize).min(orientations - 1);
            let idx = ((y / cell) * cells_x + (x / cell)) * orientations + bin;
            cell_hist[idx] += magnitude;
        }
    }

    let block = params.block_size as usize;
    let blocks_x = params.blocks(width);
    let blocks_y = params.blocks(height);
    let mut descriptor = Vec::with_capacity(params.descriptor_len(width, height));

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let start = descriptor.len();
            for cy in by..by + block {
                for cx in bx..bx + block {
                    let offset = (cy * cells_x + cx) * orientations;
                    descriptor.extend_from_slice(&cell_hist[offset..offset + orientations]);
                }
            }
            l2_hys(&mut descriptor[start..]);
        }
    }

    descriptor
}

/// Central differences; zero on the border.
#[inline]
fn gradient(img: &GrayImage, x: u32, y: u32) -> (f32, f32) {
    let (width, height) = img.dimensions();
    let at = |x: u32, y: u32| img.get_pixel(x, y).0[0] as f32;

    let gx = if x > 0 && x + 1 < width {
        at(x + 1, y) - at(x - 1, y)
    } else {
        0.0
    };
    let gy = if y > 0 && y + 1 < height {
        at(x, y + 1) - at(x, y - 1)
    } else {
        0.0
    };
    (gx, gy)
}

fn l2_hys(block: &mut [f32]) {
    let norm = (block.iter().map(|v| v * v).sum::<f32>() + EPS * EPS).sqrt();
    for v in block.iter_mut() {
        *v = (*v / norm).min(HYS_CLIP);
    }
    let norm = (block.iter().map(|v| v * v).sum::<f32>() + EPS * EPS).sqrt();
    for v in block.iter_mut() {
        *v /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn params() -> HogParams {
        HogParams { cell_size: 16, block_size: 2, orientations: 9 }
    }

    #[test]
    fn test_descriptor_len_default_geometry() {
        assert_eq!(params().descriptor_len(128, 128), 7 * 7 * 4 * 9);
        assert_eq!(params().descriptor_len(16, 16), 0);
    }

    #[test]
    fn test_flat_image_is_zero() {
        let img = GrayImage::from_pixel(64, 64, Luma([90]));
        let d = hog_descriptor(&img, &params());
        assert_eq!(d.len(), params().descriptor_len(64, 64));
        assert!(d.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_vertical_edges_vote_horizontal_gradient_bin() {
        // Stripes vary along x only, so every gradient points at 0 degrees.
        let img = GrayImage::from_fn(64, 64, |x, _| Luma([if (x / 4) % 2 == 0 { 0 } else { 255 }]));
        let d = hog_descriptor(&img, &params());
        let bin0: f32 = d.iter().step_by(9).sum();
        let total: f32 = d.iter().sum();
        assert!(bin0 > 0.0);
        assert!((bin0 - total).abs() < 1e-3);
    }

    #[test]
    fn test_blocks_are_normalized() {
        let img = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        let d = hog_descriptor(&img, &params());
        for block in d.chunks(36) {
            let norm: f32 = block.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!(norm <= 1.0 + 1e-4);
        }
    }
}
