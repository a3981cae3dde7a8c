use image::RgbaImage;
use image::imageops::FilterType;

use crate::backend::{Backend, FrameSequence, TimedFrame, decode, encode};
use crate::foundation::error::PipelineResult;

/// Raster frame in premultiplied RGBA8 form, row-major.
///
/// The backing buffer is an [`RgbaImage`] whose channel bytes are
/// premultiplied; it is never handed out as a straight-alpha image without
/// going through [`Raster::to_straight`].
#[derive(Clone, Debug)]
pub struct Raster {
    premul: RgbaImage,
}

impl Raster {
    /// Build a raster from straight-alpha pixels, premultiplying.
    pub fn from_straight(image: &RgbaImage) -> Self {
        let mut premul = image.clone();
        premultiply_rgba8_in_place(&mut premul);
        Self { premul }
    }

    /// Convert back to straight-alpha pixels.
    pub fn to_straight(&self) -> RgbaImage {
        let mut out = self.premul.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.premul.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.premul.height()
    }

    /// Premultiplied pixel bytes, row-major RGBA8.
    pub fn data(&self) -> &[u8] {
        self.premul.as_raw()
    }

    /// Mutable premultiplied pixel bytes.
    ///
    /// Callers must keep every pixel premultiplied (channel <= alpha).
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.premul
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Premultiplied-RGBA8 backend.
///
/// Frames are [`Raster`] values, premultiplied on decode and unpremultiplied
/// only at the encode boundary. Compositing-style transforms (tints, channel
/// ops, masks) operate on this backend, where blending math is direct.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdvancedBackend;

impl Backend for AdvancedBackend {
    type Frame = Raster;

    fn name(&self) -> &'static str {
        "advanced"
    }

    fn decode(&self, bytes: &[u8], max_frames: usize) -> PipelineResult<FrameSequence<Raster>> {
        let frames = decode::decode_rgba_frames(bytes, max_frames)?
            .into_iter()
            .map(|(image, delay_ms)| TimedFrame {
                image: Raster::from_straight(&image),
                delay_ms,
            })
            .collect();
        Ok(FrameSequence { frames })
    }

    fn dimensions(&self, frame: &Raster) -> (u32, u32) {
        (frame.width(), frame.height())
    }

    fn resize(&self, frame: &Raster, width: u32, height: u32) -> Raster {
        // Resampling premultiplied components directly avoids fringing around
        // transparent edges; the output is premultiplied again by construction.
        let resized = image::imageops::resize(&frame.premul, width, height, FilterType::Lanczos3);
        Raster { premul: resized }
    }

    fn encode_static(&self, frame: &Raster) -> PipelineResult<Vec<u8>> {
        Ok(encode::encode_static_png(&frame.to_straight())?.bytes)
    }

    fn encode_animated(&self, seq: &FrameSequence<Raster>) -> PipelineResult<Vec<u8>> {
        let frames = seq
            .frames
            .iter()
            .map(|t| TimedFrame {
                image: t.image.to_straight(),
                delay_ms: t.delay_ms,
            })
            .collect::<Vec<_>>();
        Ok(encode::encode_animated_gif(&frames)?.bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/advanced.rs"]
mod tests;
