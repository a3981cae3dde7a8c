use super::*;

fn solid_frame(width: u32, height: u32, gray: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba([gray, gray, gray, 255]))
}

#[test]
fn static_png_round_trips_dimensions_and_pixels() {
    let artifact = encode_static_png(&solid_frame(5, 3, 200)).unwrap();
    assert_eq!(artifact.format, ArtifactFormat::Png);
    assert_eq!(artifact.filename, "output.png");

    let back = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (5, 3));
    assert_eq!(back.get_pixel(2, 1).0, [200, 200, 200, 255]);
}

#[test]
fn animated_gif_preserves_count_and_delays() {
    let frames = vec![
        TimedFrame {
            image: solid_frame(4, 4, 0),
            delay_ms: 120,
        },
        TimedFrame {
            image: solid_frame(4, 4, 255),
            delay_ms: 340,
        },
    ];
    let artifact = encode_animated_gif(&frames).unwrap();
    assert_eq!(artifact.format, ArtifactFormat::Gif);
    assert_eq!(artifact.filename, "output.gif");
    assert!(artifact.bytes.starts_with(b"GIF8"));

    let decoder =
        image::codecs::gif::GifDecoder::new(Cursor::new(artifact.bytes.as_slice())).unwrap();
    let decoded: Vec<_> = image::AnimationDecoder::into_frames(decoder)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(decoded.len(), 2);

    let (numer, denom) = decoded[0].delay().numer_denom_ms();
    assert_eq!(numer / denom, 120);
    let (numer, denom) = decoded[1].delay().numer_denom_ms();
    assert_eq!(numer / denom, 340);
}

#[test]
fn every_gif_frame_disposes_to_background() {
    let frames = vec![
        TimedFrame {
            image: solid_frame(4, 4, 10),
            delay_ms: 100,
        },
        TimedFrame {
            image: solid_frame(4, 4, 240),
            delay_ms: 100,
        },
    ];
    let artifact = encode_animated_gif(&frames).unwrap();

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(artifact.bytes)).unwrap();
    let mut seen = 0;
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        assert_eq!(frame.dispose, gif::DisposalMethod::Background);
        seen += 1;
    }
    assert_eq!(seen, 2);
}

#[test]
fn ragged_frame_dimensions_are_a_transform_bug() {
    let frames = vec![
        TimedFrame {
            image: solid_frame(4, 4, 0),
            delay_ms: 100,
        },
        TimedFrame {
            image: solid_frame(5, 4, 0),
            delay_ms: 100,
        },
    ];
    assert!(matches!(
        encode_animated_gif(&frames),
        Err(PipelineError::Transform(_))
    ));
}

#[test]
fn empty_sequence_is_bad_format() {
    assert!(matches!(
        encode_animated_gif(&[]),
        Err(PipelineError::BadFormat(_))
    ));
}
