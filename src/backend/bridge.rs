use image::RgbaImage;

use crate::backend::basic::BasicBackend;
use crate::backend::{Transform, TransformOutput};
use crate::foundation::error::{PipelineError, PipelineResult};

/// Channel layout of a dense pixel array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    /// Four channels, red first.
    Rgba,
    /// Four channels, blue first (alpha last).
    Bgra,
    /// Three channels, red first; alpha is dropped.
    Rgb,
    /// Three channels, blue first; alpha is dropped.
    Bgr,
    /// Single luma channel (BT.601 weights).
    Gray,
}

impl ColorModel {
    /// Channels per pixel in this model.
    pub fn channels(self) -> usize {
        match self {
            Self::Rgba | Self::Bgra => 4,
            Self::Rgb | Self::Bgr => 3,
            Self::Gray => 1,
        }
    }
}

/// Dense height × width × channel byte array for array-math transforms.
///
/// Pure data: no backend types leak through, so convolution/masking leaves
/// can be written without touching decode or encode. Row-major, tightly
/// packed.
#[derive(Clone, Debug)]
pub struct PixelArray {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout of `data`.
    pub model: ColorModel,
    /// `height * width * channels` bytes.
    pub data: Vec<u8>,
}

impl PixelArray {
    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) as usize) * self.model.channels()
    }

    /// Allocate a zeroed array with the given shape.
    pub fn zeroed(width: u32, height: u32, model: ColorModel) -> Self {
        Self {
            width,
            height,
            model,
            data: vec![0; (width as usize) * (height as usize) * model.channels()],
        }
    }
}

/// Convert a decoded straight-alpha frame into a dense pixel array in the
/// requested color model. Stateless and allocation-heavy by design.
pub fn to_array(frame: &RgbaImage, model: ColorModel) -> PixelArray {
    let (width, height) = frame.dimensions();
    let src = frame.as_raw();
    let channels = model.channels();
    let mut data = Vec::with_capacity((width as usize) * (height as usize) * channels);

    for px in src.chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        match model {
            ColorModel::Rgba => data.extend_from_slice(&[r, g, b, a]),
            ColorModel::Bgra => data.extend_from_slice(&[b, g, r, a]),
            ColorModel::Rgb => data.extend_from_slice(&[r, g, b]),
            ColorModel::Bgr => data.extend_from_slice(&[b, g, r]),
            ColorModel::Gray => data.push(luma(r, g, b)),
        }
    }

    PixelArray {
        width,
        height,
        model,
        data,
    }
}

/// Convert a pixel array back into a decodable straight-alpha frame.
///
/// Models without alpha become fully opaque; gray replicates luma across the
/// color channels. Fails when the buffer does not match its declared shape.
pub fn from_array(arr: &PixelArray) -> PipelineResult<RgbaImage> {
    let channels = arr.model.channels();
    let expected = (arr.width as usize) * (arr.height as usize) * channels;
    if arr.data.len() != expected {
        return Err(PipelineError::bad_format(format!(
            "pixel array claims {}x{}x{channels} but holds {} bytes",
            arr.width,
            arr.height,
            arr.data.len()
        )));
    }

    let mut out = Vec::with_capacity((arr.width as usize) * (arr.height as usize) * 4);
    for px in arr.data.chunks_exact(channels) {
        match arr.model {
            ColorModel::Rgba => out.extend_from_slice(&[px[0], px[1], px[2], px[3]]),
            ColorModel::Bgra => out.extend_from_slice(&[px[2], px[1], px[0], px[3]]),
            ColorModel::Rgb => out.extend_from_slice(&[px[0], px[1], px[2], 255]),
            ColorModel::Bgr => out.extend_from_slice(&[px[2], px[1], px[0], 255]),
            ColorModel::Gray => out.extend_from_slice(&[px[0], px[0], px[0], 255]),
        }
    }

    RgbaImage::from_raw(arr.width, arr.height, out)
        .ok_or_else(|| PipelineError::bad_format("pixel array shape mismatch"))
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
}

/// Adapter that lifts an array-math function into a basic-backend transform.
///
/// The wrapped function receives each frame as a [`PixelArray`] in the chosen
/// color model and returns a replacement array (any shape/model); the adapter
/// handles both conversions.
pub struct ArrayTransform<F> {
    model: ColorModel,
    func: F,
}

impl<F> ArrayTransform<F>
where
    F: FnMut(PixelArray) -> anyhow::Result<PixelArray>,
{
    /// Wrap `func`, feeding it arrays in `model`.
    pub fn new(model: ColorModel, func: F) -> Self {
        Self { model, func }
    }
}

impl<F> Transform<BasicBackend> for ArrayTransform<F>
where
    F: FnMut(PixelArray) -> anyhow::Result<PixelArray>,
{
    fn apply(&mut self, frame: RgbaImage) -> anyhow::Result<TransformOutput<RgbaImage>> {
        let arr = to_array(&frame, self.model);
        let out = (self.func)(arr)?;
        Ok(TransformOutput::Frame(from_array(&out)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/bridge.rs"]
mod tests;
