use super::*;

#[test]
fn prop_size_width_only_rounds_up() {
    assert_eq!(prop_size((100, 50), ResizeTo::Width(33)), (33, 17));
    assert_eq!(prop_size((100, 50), ResizeTo::Width(200)), (200, 100));
}

#[test]
fn prop_size_height_only_rounds_up() {
    assert_eq!(prop_size((100, 50), ResizeTo::Height(33)), (66, 33));
    assert_eq!(prop_size((50, 100), ResizeTo::Height(33)), (17, 33));
}

#[test]
fn prop_size_exact_ignores_aspect() {
    assert_eq!(prop_size((100, 50), ResizeTo::Exact(7, 9)), (7, 9));
}

#[test]
fn prop_size_never_collapses_to_zero() {
    assert_eq!(prop_size((10_000, 1), ResizeTo::Width(1)), (1, 1));
    assert_eq!(prop_size((1, 10_000), ResizeTo::Height(1)), (1, 1));
}

#[test]
fn single_frame_sequences_are_static() {
    let seq = FrameSequence::single(42u32);
    assert_eq!(seq.len(), 1);
    assert!(!seq.is_animated());
    assert_eq!(seq.frames[0].delay_ms, 0);
}

#[test]
fn run_spec_defaults_fan_out_and_encode() {
    let spec = RunSpec::new();
    assert_eq!(spec.frame_policy, FramePolicy::AllFrames);
    assert_eq!(spec.output, OutputMode::Artifact);
    assert!(spec.resize.is_none());
    assert!(spec.duration.is_none());
}

#[test]
fn run_spec_builder_sets_every_knob() {
    let spec = RunSpec::new()
        .resize(ResizeTo::Width(64))
        .frame_policy(FramePolicy::FirstFrameOnly)
        .duration(DurationOverride::Uniform(80))
        .raw_frames();
    assert_eq!(spec.resize, Some(ResizeTo::Width(64)));
    assert_eq!(spec.frame_policy, FramePolicy::FirstFrameOnly);
    assert_eq!(spec.duration, Some(DurationOverride::Uniform(80)));
    assert_eq!(spec.output, OutputMode::Frames);
}
