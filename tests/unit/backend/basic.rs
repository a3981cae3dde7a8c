use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([60, 70, 80, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn decodes_a_static_png_into_one_frame() {
    let seq = BasicBackend.decode(&png_bytes(6, 4), 200).unwrap();
    assert_eq!(seq.len(), 1);
    assert!(!seq.is_animated());
    assert_eq!(BasicBackend.dimensions(&seq.frames[0].image), (6, 4));
}

#[test]
fn resize_hits_exact_dimensions() {
    let frame = RgbaImage::from_pixel(10, 10, image::Rgba([1, 2, 3, 255]));
    let resized = BasicBackend.resize(&frame, 3, 7);
    assert_eq!(resized.dimensions(), (3, 7));
}

#[test]
fn static_encode_is_decodable_png() {
    let frame = RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]));
    let bytes = BasicBackend.encode_static(&frame).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
}

#[test]
fn animated_encode_is_decodable_gif() {
    let seq = FrameSequence {
        frames: vec![
            TimedFrame {
                image: RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255])),
                delay_ms: 100,
            },
            TimedFrame {
                image: RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255])),
                delay_ms: 100,
            },
        ],
    };
    let bytes = BasicBackend.encode_animated(&seq).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Gif);
}
