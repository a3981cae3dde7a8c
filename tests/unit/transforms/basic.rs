use super::*;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 10) as u8, (y * 10) as u8, 0, 255])
    })
}

fn frame_of(out: Out) -> RgbaImage {
    match out.unwrap() {
        TransformOutput::Frame(frame) => frame,
        _ => panic!("expected a single frame"),
    }
}

#[test]
fn flip_mirrors_columns() {
    let flipped = frame_of(flip_horizontal(gradient(4, 2)));
    assert_eq!(flipped.get_pixel(0, 0).0[0], 30);
    assert_eq!(flipped.get_pixel(3, 0).0[0], 0);
}

#[test]
fn invert_flips_channels_and_keeps_alpha() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([10, 200, 0, 77]));
    let out = frame_of(invert(img));
    assert_eq!(out.get_pixel(0, 0).0, [245, 55, 255, 77]);
}

#[test]
fn grayscale_collapses_to_equal_channels() {
    let img = RgbaImage::from_pixel(1, 1, image::Rgba([255, 0, 0, 128]));
    let out = frame_of(grayscale(img));
    let [r, g, b, a] = out.get_pixel(0, 0).0;
    assert_eq!(r, 76);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert_eq!(a, 128);
}

#[test]
fn circular_clears_corners_and_keeps_the_center() {
    let img = RgbaImage::from_pixel(10, 10, image::Rgba([50, 50, 50, 255]));
    let out = frame_of(circular(img));
    assert_eq!(out.get_pixel(5, 5).0[3], 255);
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
}

#[test]
fn dissolve_ends_fully_transparent() {
    let img = RgbaImage::from_pixel(8, 8, image::Rgba([200, 100, 50, 255]));
    let mut transform = dissolve(5);
    let frames = match transform(img).unwrap() {
        TransformOutput::Sequence(frames) => frames,
        _ => panic!("dissolve must generate a sequence"),
    };
    assert_eq!(frames.len(), 5);

    let opaque = |f: &RgbaImage| f.pixels().filter(|p| p.0[3] > 0).count();
    let counts: Vec<usize> = frames.iter().map(opaque).collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]), "{counts:?}");
    assert_eq!(*counts.last().unwrap(), 0);
}

#[test]
fn dissolve_is_deterministic() {
    let img = RgbaImage::from_pixel(6, 6, image::Rgba([1, 2, 3, 255]));
    let first = match dissolve(4)(img.clone()).unwrap() {
        TransformOutput::Sequence(frames) => frames,
        _ => unreachable!(),
    };
    let second = match dissolve(4)(img).unwrap() {
        TransformOutput::Sequence(frames) => frames,
        _ => unreachable!(),
    };
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
