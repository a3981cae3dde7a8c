//! Premultiplied-raster leaves for the advanced backend.

use crate::backend::TransformOutput;
use crate::backend::advanced::Raster;
use crate::foundation::color::parse_color;
use crate::foundation::error::PipelineResult;

type Out = anyhow::Result<TransformOutput<Raster>>;

/// Invert the color channels of a premultiplied raster.
///
/// In premultiplied space a straight-alpha inversion `c' = 255 - c` becomes
/// `c' = a - c`, which keeps every channel within its alpha bound.
pub fn invert_raster(mut frame: Raster) -> Out {
    for px in frame.data_mut().chunks_exact_mut(4) {
        let a = px[3];
        px[0] = a.saturating_sub(px[0]);
        px[1] = a.saturating_sub(px[1]);
        px[2] = a.saturating_sub(px[2]);
    }
    Ok(TransformOutput::Frame(frame))
}

/// Multiply the raster's channels by a named or hex color.
///
/// Parses the color eagerly so a bad name surfaces as
/// [`crate::PipelineError::InvalidColor`] before any decode work happens.
pub fn tint(color: &str) -> PipelineResult<impl FnMut(Raster) -> Out> {
    let tint = parse_color(color)?;

    Ok(move |mut frame: Raster| {
        for px in frame.data_mut().chunks_exact_mut(4) {
            // Scaling by tint/255 only ever shrinks a channel, so the
            // premultiplied invariant survives without re-clamping.
            px[0] = ((px[0] as u16 * tint.r as u16 + 127) / 255) as u8;
            px[1] = ((px[1] as u16 * tint.g as u16 + 127) / 255) as u8;
            px[2] = ((px[2] as u16 * tint.b as u16 + 127) / 255) as u8;
        }
        Ok(TransformOutput::Frame(frame))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/advanced.rs"]
mod tests;
