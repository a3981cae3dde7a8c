use std::io::Cursor;

use anyhow::Context;
use image::RgbaImage;

use crate::backend::TimedFrame;
use crate::foundation::error::{PipelineError, PipelineResult};

/// Declared format of a finished artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Static raster (PNG).
    Png,
    /// Animated raster (GIF).
    Gif,
}

impl ArtifactFormat {
    /// Suggested attachment filename for this format.
    pub fn filename(self) -> &'static str {
        match self {
            Self::Png => "output.png",
            Self::Gif => "output.gif",
        }
    }
}

/// Final encoded byte buffer plus declared format and suggested filename.
/// Ownership transfers to the chat-reply layer.
#[derive(Clone, Debug)]
pub struct EncodedArtifact {
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Declared container format.
    pub format: ArtifactFormat,
    /// Suggested attachment filename.
    pub filename: String,
}

impl EncodedArtifact {
    /// Wrap encoded bytes with the format's default filename.
    pub fn new(bytes: Vec<u8>, format: ArtifactFormat) -> Self {
        Self {
            bytes,
            format,
            filename: format.filename().to_owned(),
        }
    }
}

/// Encode one straight-alpha frame as a static PNG artifact.
pub fn encode_static_png(frame: &RgbaImage) -> PipelineResult<EncodedArtifact> {
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(frame.clone())
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode static png")?;
    Ok(EncodedArtifact::new(out, ArtifactFormat::Png))
}

/// Encode straight-alpha frames as an animated GIF artifact.
///
/// Each frame's delay is taken from its [`TimedFrame`] (milliseconds,
/// truncated to GIF's centisecond resolution), disposal is fixed to "replace
/// with background", and the animation repeats forever. All frames must share
/// the dimensions of the first; a transform that produced a ragged sequence
/// is a bug in the leaf, not a user error.
pub fn encode_animated_gif(frames: &[TimedFrame<RgbaImage>]) -> PipelineResult<EncodedArtifact> {
    let first = frames
        .first()
        .ok_or_else(|| PipelineError::bad_format("animated output has no frames"))?;
    let (width, height) = first.image.dimensions();

    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err(PipelineError::bad_format(format!(
            "frame size {width}x{height} exceeds the gif container limit"
        )));
    }

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width as u16, height as u16, &[])
            .context("open gif encoder")?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .context("set gif repeat")?;

        for timed in frames {
            if timed.image.dimensions() != (width, height) {
                return Err(PipelineError::transform(anyhow::anyhow!(
                    "animated frames must share dimensions: expected {width}x{height}, got {}x{}",
                    timed.image.width(),
                    timed.image.height()
                )));
            }

            let mut pixels = timed.image.clone().into_raw();
            let mut frame =
                gif::Frame::from_rgba_speed(width as u16, height as u16, &mut pixels, 10);
            frame.delay = (timed.delay_ms / 10).min(u16::MAX as u32) as u16;
            frame.dispose = gif::DisposalMethod::Background;
            encoder.write_frame(&frame).context("write gif frame")?;
        }
    }

    Ok(EncodedArtifact::new(out, ArtifactFormat::Gif))
}

#[cfg(test)]
#[path = "../../tests/unit/backend/encode.rs"]
mod tests;
