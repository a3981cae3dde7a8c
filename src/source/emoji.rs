use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;

use crate::foundation::error::PipelineResult;

static CUSTOM_EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(a)?:([a-zA-Z0-9_]{2,32}):([0-9]{18,22})>").unwrap());

const CUSTOM_EMOJI_CDN: &str = "https://cdn.discordapp.com/emojis";
const TWEMOJI_CDN: &str = "https://twemoji.maxcdn.com/v/latest";
const EMOJI_CDN: &str = "https://emojicdn.elk.sh";

/// Map custom emoji markup (`<a?:name:id>`) to its CDN asset URL.
///
/// Animated emoji resolve to a GIF asset, static ones to PNG. Returns `None`
/// when the argument is not custom emoji markup at all.
pub fn custom_emoji_url(argument: &str) -> Option<String> {
    let caps = CUSTOM_EMOJI.captures(argument.trim())?;
    let animated = caps.get(1).is_some();
    let id = caps.get(3)?.as_str();
    let ext = if animated { "gif" } else { "png" };
    Some(format!("{CUSTOM_EMOJI_CDN}/{id}.{ext}"))
}

/// Asset URL for a standard (unicode) emoji.
///
/// Single-codepoint emoji map to the Twemoji SVG asset, which is rasterized
/// with [`rasterize_svg`] after fetching. Multi-codepoint sequences (skin
/// tones, ZWJ clusters) fall back to a raster emoji CDN.
pub fn unicode_emoji_url(emoji: &str) -> (String, bool) {
    let mut chars = emoji.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => (format!("{TWEMOJI_CDN}/svg/{:x}.svg", c as u32), true),
        _ => (format!("{EMOJI_CDN}/{emoji}?style=twitter"), false),
    }
}

/// Rasterize SVG bytes onto a fixed square canvas, returning straight-alpha
/// RGBA8 pixel data (`canvas * canvas * 4` bytes).
///
/// Vector emoji assets go through this before entering the pipeline so that
/// downstream stages only ever see raster buffers.
pub fn rasterize_svg(svg_bytes: &[u8], canvas: u32) -> PipelineResult<Vec<u8>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(svg_bytes, &opts).context("parse svg tree")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas, canvas)
        .ok_or_else(|| anyhow::anyhow!("failed to allocate {canvas}x{canvas} svg pixmap"))?;

    let sx = (canvas as f32) / tree.size().width();
    let sy = (canvas as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // Pixmap pixels are premultiplied; hand straight alpha to the caller.
    let mut data = pixmap.take();
    unpremultiply_rgba8_in_place(&mut data);
    Ok(data)
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

/// Encode rasterized emoji pixels as PNG so they flow through the pipeline
/// like any other fetched buffer.
pub(crate) fn rgba_to_png(data: Vec<u8>, canvas: u32) -> PipelineResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(canvas, canvas, data)
        .ok_or_else(|| anyhow::anyhow!("svg raster buffer size mismatch"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut out),
            image::ImageFormat::Png,
        )
        .context("encode rasterized emoji as png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/source/emoji.rs"]
mod tests;
