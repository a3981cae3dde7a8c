use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;

use super::*;
use crate::backend::ResizeTo;
use crate::backend::basic::BasicBackend;

/// Backend stub with tagged integer frames, for exercising the adapter's
/// fan-out and normalization logic without any codec involved.
struct StubBackend {
    frames: Vec<(u32, u32)>,
    decoded: AtomicBool,
}

impl StubBackend {
    fn with_frames(frames: &[(u32, u32)]) -> Self {
        Self {
            frames: frames.to_vec(),
            decoded: AtomicBool::new(false),
        }
    }
}

impl Backend for StubBackend {
    type Frame = u32;

    fn name(&self) -> &'static str {
        "stub"
    }

    fn decode(&self, _bytes: &[u8], _max_frames: usize) -> PipelineResult<FrameSequence<u32>> {
        self.decoded.store(true, Ordering::SeqCst);
        Ok(FrameSequence {
            frames: self
                .frames
                .iter()
                .map(|(tag, delay_ms)| TimedFrame {
                    image: *tag,
                    delay_ms: *delay_ms,
                })
                .collect(),
        })
    }

    fn dimensions(&self, _frame: &u32) -> (u32, u32) {
        (4, 4)
    }

    fn resize(&self, frame: &u32, _width: u32, _height: u32) -> u32 {
        *frame
    }

    fn encode_static(&self, frame: &u32) -> PipelineResult<Vec<u8>> {
        Ok(vec![*frame as u8])
    }

    fn encode_animated(&self, seq: &FrameSequence<u32>) -> PipelineResult<Vec<u8>> {
        Ok(seq.frames.iter().map(|t| t.image as u8).collect())
    }
}

fn resolved(bytes: &[u8]) -> ResolvedImage {
    ResolvedImage {
        bytes: bytes.to_vec(),
        content_type: None,
    }
}

fn frames_of(output: PipelineOutput<u32>) -> FrameSequence<u32> {
    match output {
        PipelineOutput::Frames(frames) => frames,
        PipelineOutput::Artifact(_) => panic!("expected raw frames"),
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([50, 100, 150, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn fan_out_preserves_order_and_inherits_delays() {
    let backend = StubBackend::with_frames(&[(0, 100), (1, 200), (2, 300), (3, 50), (4, 75)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new().raw_frames();
    let mut transform =
        |tag: u32| -> anyhow::Result<TransformOutput<u32>> { Ok(TransformOutput::Frame(tag + 100)) };

    let out = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap();
    let frames = frames_of(out);

    let tags: Vec<u32> = frames.frames.iter().map(|t| t.image).collect();
    let delays: Vec<u32> = frames.frames.iter().map(|t| t.delay_ms).collect();
    assert_eq!(tags, vec![100, 101, 102, 103, 104]);
    assert_eq!(delays, vec![100, 200, 300, 50, 75]);
}

#[test]
fn sequence_output_during_fan_out_is_rejected() {
    let backend = StubBackend::with_frames(&[(0, 100), (1, 100)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new().raw_frames();
    let mut transform = |tag: u32| -> anyhow::Result<TransformOutput<u32>> {
        Ok(TransformOutput::Sequence(vec![tag, tag]))
    };

    let err = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Transform(_)));
}

#[test]
fn first_frame_only_runs_the_transform_once() {
    let backend = StubBackend::with_frames(&[(7, 40), (8, 40), (9, 40)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new()
        .frame_policy(FramePolicy::FirstFrameOnly)
        .raw_frames();

    let mut calls = 0u32;
    let mut transform = |tag: u32| -> anyhow::Result<TransformOutput<u32>> {
        calls += 1;
        Ok(TransformOutput::Sequence(vec![tag, tag + 1, tag + 2]))
    };

    let out = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap();
    let frames = frames_of(out);

    assert_eq!(calls, 1);
    let tags: Vec<u32> = frames.frames.iter().map(|t| t.image).collect();
    assert_eq!(tags, vec![7, 8, 9]);
    // Generated sequences carry no source timing; the configured default
    // applies to every frame.
    for timed in &frames.frames {
        assert_eq!(timed.delay_ms, config.default_frame_delay_ms);
    }
}

#[test]
fn uniform_duration_overrides_every_frame() {
    let backend = StubBackend::with_frames(&[(0, 100), (1, 200)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new()
        .duration(DurationOverride::Uniform(55))
        .raw_frames();
    let mut transform = |tag: u32| -> anyhow::Result<TransformOutput<u32>> { Ok(TransformOutput::Frame(tag)) };

    let frames = frames_of(
        run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap(),
    );
    assert!(frames.frames.iter().all(|t| t.delay_ms == 55));
}

#[test]
fn per_frame_duration_must_match_the_output_length() {
    let backend = StubBackend::with_frames(&[(0, 100), (1, 100)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new()
        .duration(DurationOverride::PerFrame(vec![10, 20, 30]))
        .raw_frames();
    let mut transform = |tag: u32| -> anyhow::Result<TransformOutput<u32>> { Ok(TransformOutput::Frame(tag)) };

    let err = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap_err();
    assert!(matches!(err, PipelineError::Transform(_)));
}

#[test]
fn oversized_input_never_reaches_decode() {
    let backend = StubBackend::with_frames(&[(0, 100)]);
    let config = PipelineConfig {
        max_bytes: 4,
        ..PipelineConfig::default()
    };
    let spec = RunSpec::new();
    let mut transform = |tag: u32| -> anyhow::Result<TransformOutput<u32>> { Ok(TransformOutput::Frame(tag)) };

    let err = run_pipeline(
        &backend,
        &resolved(b"way past the limit"),
        &mut transform,
        &spec,
        &config,
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::ImageTooLarge { .. }));
    assert!(!backend.decoded.load(Ordering::SeqCst));
}

#[test]
fn transform_failures_surface_with_their_chain() {
    let backend = StubBackend::with_frames(&[(0, 100)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new();
    let mut transform = |_tag: u32| -> anyhow::Result<TransformOutput<u32>> {
        Err(anyhow::anyhow!("leaf exploded"))
    };

    let err = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config).unwrap_err();
    match err {
        PipelineError::Transform(inner) => assert_eq!(inner.to_string(), "leaf exploded"),
        other => panic!("expected Transform, got {other:?}"),
    }
}

#[test]
fn resize_applies_before_the_transform_sees_frames() {
    let config = PipelineConfig::default();
    let spec = RunSpec::new().resize(ResizeTo::Width(33)).raw_frames();
    let mut transform = |frame: RgbaImage| -> anyhow::Result<TransformOutput<RgbaImage>> {
        Ok(TransformOutput::Frame(frame))
    };

    let out = run_pipeline(
        &BasicBackend,
        &resolved(&png_bytes(100, 50)),
        &mut transform,
        &spec,
        &config,
    )
    .unwrap();

    let frames = match out {
        PipelineOutput::Frames(frames) => frames,
        PipelineOutput::Artifact(_) => panic!("expected raw frames"),
    };
    assert_eq!(frames.frames[0].image.dimensions(), (33, 17));
}

#[test]
fn frame_count_alone_picks_the_container() {
    let config = PipelineConfig::default();
    let mut identity = |frame: RgbaImage| -> anyhow::Result<TransformOutput<RgbaImage>> {
        Ok(TransformOutput::Frame(frame))
    };

    let artifact = run_pipeline(
        &BasicBackend,
        &resolved(&png_bytes(4, 4)),
        &mut identity,
        &RunSpec::new(),
        &config,
    )
    .unwrap()
    .into_artifact()
    .unwrap();
    assert_eq!(artifact.format, ArtifactFormat::Png);

    let mut fan_out = |frame: RgbaImage| -> anyhow::Result<TransformOutput<RgbaImage>> {
        Ok(TransformOutput::Sequence(vec![frame.clone(), frame]))
    };
    let spec = RunSpec::new().frame_policy(FramePolicy::FirstFrameOnly);
    let artifact = run_pipeline(
        &BasicBackend,
        &resolved(&png_bytes(4, 4)),
        &mut fan_out,
        &spec,
        &config,
    )
    .unwrap()
    .into_artifact()
    .unwrap();
    assert_eq!(artifact.format, ArtifactFormat::Gif);
    assert!(artifact.bytes.starts_with(b"GIF8"));
}

#[test]
fn pre_encoded_output_passes_through_untouched() {
    let backend = StubBackend::with_frames(&[(0, 100)]);
    let config = PipelineConfig::default();
    let spec = RunSpec::new().frame_policy(FramePolicy::FirstFrameOnly);
    let mut transform = |_tag: u32| -> anyhow::Result<TransformOutput<u32>> {
        Ok(TransformOutput::Encoded(b"GIF89a-fake".to_vec()))
    };

    let artifact = run_pipeline(&backend, &resolved(b"x"), &mut transform, &spec, &config)
        .unwrap()
        .into_artifact()
        .unwrap();
    assert_eq!(artifact.bytes, b"GIF89a-fake");
    assert_eq!(artifact.format, ArtifactFormat::Gif);
}

#[test]
fn three_frame_flip_mirrors_each_frame_in_place() {
    // 100x50 gradient frames, one gradient offset per frame.
    let mut gif = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut gif, 100, 50, &[]).unwrap();
        for k in 0..3u32 {
            let img = RgbaImage::from_fn(100, 50, |x, _| {
                let v = ((x * 2 + k * 30) % 256) as u8;
                image::Rgba([v, v, v, 255])
            });
            let mut pixels = img.into_raw();
            let mut frame = gif::Frame::from_rgba_speed(100, 50, &mut pixels, 10);
            frame.delay = 10 + k as u16 * 5;
            encoder.write_frame(&frame).unwrap();
        }
    }

    let config = PipelineConfig::default();
    let source = BasicBackend.decode(&gif, config.max_frames).unwrap();

    let mut flip = |frame: RgbaImage| -> anyhow::Result<TransformOutput<RgbaImage>> {
        Ok(TransformOutput::Frame(image::imageops::flip_horizontal(
            &frame,
        )))
    };
    let spec = RunSpec::new().raw_frames();
    let out = run_pipeline(&BasicBackend, &resolved(&gif), &mut flip, &spec, &config).unwrap();
    let frames = match out {
        PipelineOutput::Frames(frames) => frames,
        PipelineOutput::Artifact(_) => panic!("expected raw frames"),
    };

    assert_eq!(frames.len(), 3);
    for (got, src) in frames.frames.iter().zip(&source.frames) {
        assert_eq!(got.image.dimensions(), (100, 50));
        assert_eq!(got.delay_ms, src.delay_ms);
        assert_eq!(
            got.image.as_raw(),
            image::imageops::flip_horizontal(&src.image).as_raw()
        );
    }
}
