//! Joint HSV color histogram.

use image::RgbImage;

/// Length of a joint histogram with `bins` bins per channel.
#[inline]
pub fn histogram_len(bins: u32) -> usize {
    (bins as usize).pow(3)
}

/// L1-normalized joint H/S/V histogram with `bins` bins per channel.
///
/// Bin index is `h * bins^2 + s * bins + v`. An image with no pixels yields
/// an all-zero histogram.
pub fn hsv_histogram(img: &RgbImage, bins: u32) -> Vec<f32> {
    let bins = bins.max(1) as usize;
    let mut hist = vec![0.0f32; histogram_len(bins as u32)];
    let total = (img.width() as usize) * (img.height() as usize);
    if total == 0 {
        return hist;
    }

    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        let (h, s, v) = rgb_to_hsv(r, g, b);
        let hb = quantize(h / 360.0, bins);
        let sb = quantize(s, bins);
        let vb = quantize(v, bins);
        hist[hb * bins * bins + sb * bins + vb] += 1.0;
    }

    let inv = 1.0 / total as f32;
    for h in &mut hist {
        *h *= inv;
    }
    hist
}

#[inline]
fn quantize(unit: f32, bins: usize) -> usize {
    ((unit * bins as f32) as usize).min(bins - 1)
}

/// Hue in degrees [0, 360), saturation and value in [0, 1].
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue.rem_euclid(360.0), saturation, max)
}
