use super::*;

#[test]
fn custom_emoji_static_and_animated() {
    assert_eq!(
        custom_emoji_url("<:blobwave:123456789012345678>").as_deref(),
        Some("https://cdn.discordapp.com/emojis/123456789012345678.png")
    );
    assert_eq!(
        custom_emoji_url("<a:blobdance:123456789012345678>").as_deref(),
        Some("https://cdn.discordapp.com/emojis/123456789012345678.gif")
    );
}

#[test]
fn non_emoji_markup_is_none() {
    assert_eq!(custom_emoji_url("hello"), None);
    assert_eq!(custom_emoji_url("<:x:123>"), None);
    assert_eq!(custom_emoji_url("https://example.com/a.png"), None);
}

#[test]
fn single_codepoint_emoji_uses_vector_cdn() {
    let (url, is_svg) = unicode_emoji_url("\u{1F600}");
    assert_eq!(url, "https://twemoji.maxcdn.com/v/latest/svg/1f600.svg");
    assert!(is_svg);
}

#[test]
fn multi_codepoint_emoji_falls_back_to_raster_cdn() {
    // Thumbs up + medium skin tone modifier.
    let emoji = "\u{1F44D}\u{1F3FD}";
    let (url, is_svg) = unicode_emoji_url(emoji);
    assert_eq!(url, format!("https://emojicdn.elk.sh/{emoji}?style=twitter"));
    assert!(!is_svg);
}

#[test]
fn rasterize_svg_fills_the_canvas() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/>
    </svg>"##;

    let data = rasterize_svg(svg, 8).unwrap();
    assert_eq!(data.len(), 8 * 8 * 4);
    // Solid opaque red everywhere after unpremultiplying.
    assert_eq!(&data[0..4], &[255, 0, 0, 255]);
}

#[test]
fn rasterize_rejects_broken_svg() {
    assert!(rasterize_svg(b"<svg", 8).is_err());
}

#[test]
fn rasterized_pixels_round_trip_through_png() {
    let data = vec![0u8; 4 * 4 * 4];
    let png = rgba_to_png(data, 4).unwrap();
    let img = image::load_from_memory(&png).unwrap();
    assert_eq!((img.width(), img.height()), (4, 4));
}
