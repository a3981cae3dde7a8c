//! Straight-alpha leaves for the basic backend.

use image::{Rgba, RgbaImage};

use crate::assets::assets;
use crate::backend::TransformOutput;

type Out = anyhow::Result<TransformOutput<RgbaImage>>;

/// Mirror the frame left-to-right.
pub fn flip_horizontal(frame: RgbaImage) -> Out {
    Ok(TransformOutput::Frame(image::imageops::flip_horizontal(
        &frame,
    )))
}

/// Invert the color channels, leaving alpha untouched.
pub fn invert(mut frame: RgbaImage) -> Out {
    for px in frame.pixels_mut() {
        px.0[0] = 255 - px.0[0];
        px.0[1] = 255 - px.0[1];
        px.0[2] = 255 - px.0[2];
    }
    Ok(TransformOutput::Frame(frame))
}

/// Collapse to luma, keeping alpha.
pub fn grayscale(mut frame: RgbaImage) -> Out {
    for px in frame.pixels_mut() {
        let [r, g, b, a] = px.0;
        let l = ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8;
        *px = Rgba([l, l, l, a]);
    }
    Ok(TransformOutput::Frame(frame))
}

/// Crop the frame to an ellipse using the shared circle mask.
pub fn circular(mut frame: RgbaImage) -> Out {
    let (w, h) = frame.dimensions();
    let mask = assets().circle_mask(w, h);

    for (px, mask_px) in frame.pixels_mut().zip(mask.pixels()) {
        let masked = (px.0[3] as u16 * mask_px.0[3] as u16 / 255) as u8;
        px.0[3] = masked;
    }
    Ok(TransformOutput::Frame(frame))
}

/// Build a dissolve animation from a static frame.
///
/// Generates its own sequence, so callers must run it with
/// [`crate::FramePolicy::FirstFrameOnly`]. Pixels disappear in a fixed
/// hash-derived order, giving a deterministic output for a given input.
pub fn dissolve(steps: u32) -> impl FnMut(RgbaImage) -> Out {
    move |frame: RgbaImage| {
        let steps = steps.clamp(2, 60);
        let mut out = Vec::with_capacity(steps as usize);

        for step in 0..steps {
            // Pixels whose hash bucket falls below the step threshold go
            // transparent; later frames clear strictly more pixels.
            let threshold = (step * 255) / (steps - 1);
            let mut img = frame.clone();
            for (x, y, px) in img.enumerate_pixels_mut() {
                if pixel_bucket(x, y) <= threshold {
                    *px = Rgba([0, 0, 0, 0]);
                }
            }
            out.push(img);
        }

        Ok(TransformOutput::Sequence(out))
    }
}

fn pixel_bucket(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    (h ^ (h >> 16)) & 0xFF
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/basic.rs"]
mod tests;
