use std::sync::OnceLock;

use image::RgbaImage;

use crate::foundation::color::Rgba8;

/// Process-wide read-only assets: lookup palettes for block-mosaic transforms
/// and mask builders for crop transforms.
///
/// Built once (lazily, thread-safe) and never mutated afterwards, so
/// concurrent pipeline invocations share it without locking.
#[derive(Debug)]
pub struct AssetStore {
    block_palette: Vec<Rgba8>,
    gray_palette: Vec<Rgba8>,
}

impl AssetStore {
    fn build() -> Self {
        // Classic 16-color block palette plus an 8-step gray ramp; enough for
        // the mosaic transforms without shipping binary assets.
        let block_palette = vec![
            Rgba8::rgb(0, 0, 0),
            Rgba8::rgb(128, 0, 0),
            Rgba8::rgb(0, 128, 0),
            Rgba8::rgb(128, 128, 0),
            Rgba8::rgb(0, 0, 128),
            Rgba8::rgb(128, 0, 128),
            Rgba8::rgb(0, 128, 128),
            Rgba8::rgb(192, 192, 192),
            Rgba8::rgb(128, 128, 128),
            Rgba8::rgb(255, 0, 0),
            Rgba8::rgb(0, 255, 0),
            Rgba8::rgb(255, 255, 0),
            Rgba8::rgb(0, 0, 255),
            Rgba8::rgb(255, 0, 255),
            Rgba8::rgb(0, 255, 255),
            Rgba8::rgb(255, 255, 255),
        ];
        let gray_palette = (0..8)
            .map(|i| {
                let v = (i * 255 / 7) as u8;
                Rgba8::rgb(v, v, v)
            })
            .collect();

        Self {
            block_palette,
            gray_palette,
        }
    }

    /// 16-color palette for block-mosaic transforms.
    pub fn block_palette(&self) -> &[Rgba8] {
        &self.block_palette
    }

    /// 8-step grayscale ramp.
    pub fn gray_palette(&self) -> &[Rgba8] {
        &self.gray_palette
    }

    /// Build an elliptical alpha mask filling the given canvas: opaque white
    /// inside the ellipse, fully transparent outside.
    pub fn circle_mask(&self, width: u32, height: u32) -> RgbaImage {
        let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
        let (rx, ry) = (cx.max(0.5), cy.max(0.5));

        RgbaImage::from_fn(width, height, |x, y| {
            let dx = (x as f64 + 0.5 - cx) / rx;
            let dy = (y as f64 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        })
    }
}

/// Nearest palette entry to `px` by squared euclidean distance; `invert`
/// picks the farthest entry instead.
pub fn nearest_color(palette: &[Rgba8], px: Rgba8, invert: bool) -> Rgba8 {
    let dist = |c: &Rgba8| {
        let dr = c.r as i32 - px.r as i32;
        let dg = c.g as i32 - px.g as i32;
        let db = c.b as i32 - px.b as i32;
        dr * dr + dg * dg + db * db
    };

    let best = if invert {
        palette.iter().max_by_key(|c| dist(c))
    } else {
        palette.iter().min_by_key(|c| dist(c))
    };
    best.copied().unwrap_or(px)
}

static STORE: OnceLock<AssetStore> = OnceLock::new();

/// Shared process-wide asset store.
pub fn assets() -> &'static AssetStore {
    STORE.get_or_init(AssetStore::build)
}

#[cfg(test)]
#[path = "../tests/unit/assets.rs"]
mod tests;
