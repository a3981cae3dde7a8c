//! Introspection: summarize an image instead of transforming it.

use std::collections::HashMap;

use image::RgbaImage;

use crate::backend::adapter::{PipelineOutput, run_pipeline};
use crate::backend::basic::BasicBackend;
use crate::backend::encode::{EncodedArtifact, encode_static_png};
use crate::backend::{RunSpec, TransformOutput};
use crate::foundation::color::Rgba8;
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{PipelineError, PipelineResult};
use crate::source::resolver::ResolvedImage;

/// Facts about a resolved image, gathered from the raw-frames pipeline path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSummary {
    /// Width of the first frame in pixels.
    pub width: u32,
    /// Height of the first frame in pixels.
    pub height: u32,
    /// Decoded frame count.
    pub frame_count: usize,
    /// Whether the input decoded to more than one frame.
    pub animated: bool,
    /// Container format name as sniffed from the buffer.
    pub format: String,
    /// Size of the encoded source buffer in bytes.
    pub byte_size: usize,
    /// Up to five dominant colors of the first frame, most frequent first.
    pub top_palette: Vec<Rgba8>,
}

/// Summarize a resolved image and render its dominant colors as a swatch.
///
/// Runs the pipeline with an identity transform and raw-frames output, so the
/// same guard, decode, and fan-out rules apply as for any transform command.
#[tracing::instrument(skip_all, fields(bytes = resolved.bytes.len()))]
pub fn inspect(
    resolved: &ResolvedImage,
    config: &PipelineConfig,
) -> PipelineResult<(ImageSummary, EncodedArtifact)> {
    let format = image::guess_format(&resolved.bytes)
        .map(|f| format!("{f:?}").to_lowercase())
        .unwrap_or_else(|_| "unknown".to_owned());

    let mut identity = identity_frame;
    let spec = RunSpec::new().raw_frames();
    let frames = match run_pipeline(&BasicBackend, resolved, &mut identity, &spec, config)? {
        PipelineOutput::Frames(frames) => frames,
        PipelineOutput::Artifact(_) => {
            return Err(PipelineError::bad_format(
                "raw-frames run produced an artifact",
            ));
        }
    };

    let first = frames
        .frames
        .first()
        .ok_or_else(|| PipelineError::bad_format("image contains no frames"))?;

    let top_palette = dominant_colors(&first.image, 5);
    let summary = ImageSummary {
        width: first.image.width(),
        height: first.image.height(),
        frame_count: frames.len(),
        animated: frames.is_animated(),
        format,
        byte_size: resolved.bytes.len(),
        top_palette: top_palette.clone(),
    };

    let swatch = palette_swatch(&top_palette)?;
    Ok((summary, swatch))
}

fn identity_frame(frame: RgbaImage) -> anyhow::Result<TransformOutput<RgbaImage>> {
    Ok(TransformOutput::Frame(frame))
}

/// Render palette entries as a horizontal strip of 50x50 squares.
pub fn palette_swatch(palette: &[Rgba8]) -> PipelineResult<EncodedArtifact> {
    const CELL: u32 = 50;
    let count = palette.len().max(1) as u32;

    let image = RgbaImage::from_fn(count * CELL, CELL, |x, _| {
        match palette.get((x / CELL) as usize) {
            Some(c) => image::Rgba([c.r, c.g, c.b, 255]),
            None => image::Rgba([0, 0, 0, 0]),
        }
    });
    encode_static_png(&image)
}

/// Most frequent colors of a frame, quantized to 32-step buckets.
///
/// Transparent pixels are ignored; each returned color is the bucket center,
/// not an exact source pixel.
fn dominant_colors(frame: &RgbaImage, count: usize) -> Vec<Rgba8> {
    const STEP: u8 = 32;
    let mut counts: HashMap<(u8, u8, u8), u64> = HashMap::new();

    for px in frame.pixels() {
        let [r, g, b, a] = px.0;
        if a < 128 {
            continue;
        }
        *counts.entry((r / STEP, g / STEP, b / STEP)).or_default() += 1;
    }

    let mut buckets: Vec<_> = counts.into_iter().collect();
    buckets.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    buckets
        .into_iter()
        .take(count)
        .map(|((r, g, b), _)| {
            let center = |v: u8| (v as u16 * STEP as u16 + STEP as u16 / 2).min(255) as u8;
            Rgba8::rgb(center(r), center(g), center(b))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/info.rs"]
mod tests;
