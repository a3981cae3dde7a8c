use image::RgbaImage;
use image::imageops::FilterType;

use crate::backend::{Backend, FrameSequence, TimedFrame, decode, encode};
use crate::foundation::error::PipelineResult;

/// Straight-alpha backend built on the `image` crate's pixel model.
///
/// Frames are plain [`RgbaImage`] buffers; drawing-style transforms and the
/// array bridge operate on this backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicBackend;

impl Backend for BasicBackend {
    type Frame = RgbaImage;

    fn name(&self) -> &'static str {
        "basic"
    }

    fn decode(&self, bytes: &[u8], max_frames: usize) -> PipelineResult<FrameSequence<RgbaImage>> {
        let frames = decode::decode_rgba_frames(bytes, max_frames)?
            .into_iter()
            .map(|(image, delay_ms)| TimedFrame { image, delay_ms })
            .collect();
        Ok(FrameSequence { frames })
    }

    fn dimensions(&self, frame: &RgbaImage) -> (u32, u32) {
        frame.dimensions()
    }

    fn resize(&self, frame: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        image::imageops::resize(frame, width, height, FilterType::Lanczos3)
    }

    fn encode_static(&self, frame: &RgbaImage) -> PipelineResult<Vec<u8>> {
        Ok(encode::encode_static_png(frame)?.bytes)
    }

    fn encode_animated(&self, seq: &FrameSequence<RgbaImage>) -> PipelineResult<Vec<u8>> {
        Ok(encode::encode_animated_gif(&seq.frames)?.bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/basic.rs"]
mod tests;
