use std::io::Cursor;

use image::codecs::{gif::GifDecoder, png::PngDecoder, webp::WebPDecoder};
use image::{AnimationDecoder, ImageFormat, RgbaImage};

use crate::foundation::error::{PipelineError, PipelineResult};

/// Decode an encoded buffer into straight-alpha RGBA frames with per-frame
/// delays in milliseconds.
///
/// Animated containers (GIF, animated WebP, APNG) yield every frame; any
/// other format `image` understands yields a single zero-delay frame. The
/// frame ceiling is enforced while decoding so a pathological animation stops
/// early instead of filling memory first.
pub(crate) fn decode_rgba_frames(
    bytes: &[u8],
    max_frames: usize,
) -> PipelineResult<Vec<(RgbaImage, u32)>> {
    let format = image::guess_format(bytes).map_err(|e| PipelineError::bad_format(e.to_string()))?;

    let frames = match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(bad)?;
            collect_animation(decoder, max_frames)?
        }
        ImageFormat::WebP => {
            let decoder = WebPDecoder::new(Cursor::new(bytes)).map_err(bad)?;
            if decoder.has_animation() {
                collect_animation(decoder, max_frames)?
            } else {
                vec![decode_static(bytes, format)?]
            }
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(bad)?;
            if decoder.is_apng().map_err(bad)? {
                collect_animation(decoder.apng().map_err(bad)?, max_frames)?
            } else {
                vec![decode_static(bytes, format)?]
            }
        }
        _ => vec![decode_static(bytes, format)?],
    };

    if frames.is_empty() {
        return Err(PipelineError::bad_format("image contains no frames"));
    }
    Ok(frames)
}

fn decode_static(bytes: &[u8], format: ImageFormat) -> PipelineResult<(RgbaImage, u32)> {
    let img = image::load_from_memory_with_format(bytes, format).map_err(bad)?;
    Ok((img.to_rgba8(), 0))
}

fn collect_animation<'a>(
    decoder: impl AnimationDecoder<'a>,
    max_frames: usize,
) -> PipelineResult<Vec<(RgbaImage, u32)>> {
    let mut out = Vec::new();

    for frame in decoder.into_frames() {
        if out.len() >= max_frames {
            return Err(PipelineError::TooManyFrames {
                count: out.len() + 1,
                limit: max_frames,
            });
        }

        let frame = frame.map_err(bad)?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay_ms = if denom == 0 { 0 } else { numer / denom };
        out.push((frame.into_buffer(), delay_ms));
    }

    Ok(out)
}

fn bad(err: image::ImageError) -> PipelineError {
    PipelineError::bad_format(err.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/backend/decode.rs"]
mod tests;
