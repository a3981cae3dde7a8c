//! Array-bridge leaves: convolution and palette math on dense byte arrays.

use crate::assets::{assets, nearest_color};
use crate::backend::bridge::{ArrayTransform, ColorModel, PixelArray};
use crate::foundation::color::Rgba8;

/// Sobel gradient-magnitude edge map.
///
/// Works on the luma plane; the output is a gray array of the same shape with
/// border pixels left black.
pub fn sobel_edges() -> ArrayTransform<impl FnMut(PixelArray) -> anyhow::Result<PixelArray>> {
    ArrayTransform::new(ColorModel::Gray, |arr: PixelArray| {
        let mut out = PixelArray::zeroed(arr.width, arr.height, ColorModel::Gray);
        if arr.width < 3 || arr.height < 3 {
            return Ok(out);
        }

        let at = |x: u32, y: u32| arr.data[arr.offset(x, y)] as i32;
        for y in 1..arr.height - 1 {
            for x in 1..arr.width - 1 {
                let gx = at(x + 1, y - 1) + 2 * at(x + 1, y) + at(x + 1, y + 1)
                    - at(x - 1, y - 1)
                    - 2 * at(x - 1, y)
                    - at(x - 1, y + 1);
                let gy = at(x - 1, y + 1) + 2 * at(x, y + 1) + at(x + 1, y + 1)
                    - at(x - 1, y - 1)
                    - 2 * at(x, y - 1)
                    - at(x + 1, y - 1);
                let mag = ((gx * gx + gy * gy) as f64).sqrt().min(255.0) as u8;
                let idx = out.offset(x, y);
                out.data[idx] = mag;
            }
        }
        Ok(out)
    })
}

/// Nearest-palette block mosaic.
///
/// Averages each `block`-sized cell and snaps it to the closest entry of the
/// shared 16-color palette; `invert` snaps to the farthest entry instead.
pub fn block_mosaic(
    block: u32,
    invert: bool,
) -> ArrayTransform<impl FnMut(PixelArray) -> anyhow::Result<PixelArray>> {
    ArrayTransform::new(ColorModel::Rgb, move |mut arr: PixelArray| {
        let block = block.max(1);
        let palette = assets().block_palette();

        let mut by = 0;
        while by < arr.height {
            let mut bx = 0;
            while bx < arr.width {
                let w = block.min(arr.width - bx);
                let h = block.min(arr.height - by);

                let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
                for y in by..by + h {
                    for x in bx..bx + w {
                        let i = arr.offset(x, y);
                        r += arr.data[i] as u32;
                        g += arr.data[i + 1] as u32;
                        b += arr.data[i + 2] as u32;
                    }
                }
                let n = w * h;
                let mean = Rgba8::rgb((r / n) as u8, (g / n) as u8, (b / n) as u8);
                let snapped = nearest_color(palette, mean, invert);

                for y in by..by + h {
                    for x in bx..bx + w {
                        let i = arr.offset(x, y);
                        arr.data[i] = snapped.r;
                        arr.data[i + 1] = snapped.g;
                        arr.data[i + 2] = snapped.b;
                    }
                }
                bx += block;
            }
            by += block;
        }
        Ok(arr)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/array.rs"]
mod tests;
