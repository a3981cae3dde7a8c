pub mod adapter;
pub mod advanced;
pub mod basic;
pub mod bridge;
pub mod decode;
pub mod encode;

use crate::foundation::error::PipelineResult;

/// A decoded bitmap plus the delay it displays for within an animation.
///
/// Static images are sequences of length 1 with a zero delay.
#[derive(Clone, Debug)]
pub struct TimedFrame<F> {
    /// Decoded frame data in the owning backend's pixel model.
    pub image: F,
    /// Display duration in milliseconds. Frame disposal is always "replace
    /// with background"; it is fixed at encode time, never stored per frame.
    pub delay_ms: u32,
}

/// Ordered, non-empty list of decoded frames. Insertion order is display
/// order and is never reordered.
#[derive(Clone, Debug)]
pub struct FrameSequence<F> {
    /// Frames in display order.
    pub frames: Vec<TimedFrame<F>>,
}

impl<F> FrameSequence<F> {
    /// Sequence holding a single static frame.
    pub fn single(image: F) -> Self {
        Self {
            frames: vec![TimedFrame { image, delay_ms: 0 }],
        }
    }

    /// Whether this sequence represents an animated input.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Frame count.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence is empty. Decode never produces an empty
    /// sequence; this exists for completeness.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// One of the two interchangeable decode/transform/encode subsystems.
///
/// The two implementations differ in pixel model ([`basic`] keeps straight
/// alpha, [`advanced`] is premultiplied end-to-end) and are selected
/// statically; the adapter hides the difference behind this contract.
pub trait Backend: Send + Sync {
    /// Decoded frame representation.
    type Frame: Clone + Send + 'static;

    /// Short backend name used in spans and error context.
    fn name(&self) -> &'static str;

    /// Decode an encoded buffer into a frame sequence, honoring the frame
    /// ceiling. Unreadable buffers are a `BadFormat` error.
    fn decode(&self, bytes: &[u8], max_frames: usize) -> PipelineResult<FrameSequence<Self::Frame>>;

    /// Pixel dimensions of a frame.
    fn dimensions(&self, frame: &Self::Frame) -> (u32, u32);

    /// Resize a frame to exact dimensions with a high-quality filter.
    fn resize(&self, frame: &Self::Frame, width: u32, height: u32) -> Self::Frame;

    /// Encode a single frame as a static raster (PNG).
    fn encode_static(&self, frame: &Self::Frame) -> PipelineResult<Vec<u8>>;

    /// Encode a sequence as an animated raster (GIF), disposal fixed to
    /// "replace with background".
    fn encode_animated(&self, seq: &FrameSequence<Self::Frame>) -> PipelineResult<Vec<u8>>;
}

/// What a leaf transform handed back for one invocation.
pub enum TransformOutput<F> {
    /// A single transformed frame.
    Frame(F),
    /// A transform-generated sequence (e.g. an animation built from a static
    /// source). Only legal under [`FramePolicy::FirstFrameOnly`].
    Sequence(Vec<F>),
    /// An already-encoded buffer, used when the leaf produced a format the
    /// adapter does not model. Passed through untouched.
    Encoded(Vec<u8>),
}

/// A leaf transform plugged into the pipeline.
///
/// Takes `&mut self` so that fan-out transforms may carry state between
/// frames (progressive accumulation effects); the adapter guarantees frames
/// arrive strictly in display order. Errors are opaque leaf failures and
/// surface as [`crate::PipelineError::Transform`].
pub trait Transform<B: Backend> {
    /// Transform one decoded frame.
    fn apply(&mut self, frame: B::Frame) -> anyhow::Result<TransformOutput<B::Frame>>;
}

impl<B, T> Transform<B> for T
where
    B: Backend,
    T: FnMut(B::Frame) -> anyhow::Result<TransformOutput<B::Frame>>,
{
    fn apply(&mut self, frame: B::Frame) -> anyhow::Result<TransformOutput<B::Frame>> {
        self(frame)
    }
}

/// Target size for the optional pre-transform resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeTo {
    /// Fix the width, derive the height preserving aspect ratio.
    Width(u32),
    /// Fix the height, derive the width preserving aspect ratio.
    Height(u32),
    /// Exact dimensions; aspect ratio is not preserved.
    Exact(u32, u32),
}

/// How animated inputs are fed to the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FramePolicy {
    /// Invoke the transform independently on every frame, in order, each
    /// output inheriting its source frame's delay.
    #[default]
    AllFrames,
    /// Invoke the transform once on the first frame only. Transforms that
    /// generate their own sequences must use this policy.
    FirstFrameOnly,
}

/// Explicit per-call frame timing override for the encoded output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DurationOverride {
    /// One delay applied uniformly to every output frame, milliseconds.
    Uniform(u32),
    /// Parallel list of per-frame delays, milliseconds. Must match the output
    /// frame count.
    PerFrame(Vec<u32>),
}

/// What the adapter should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Normalize into an encoded, reply-ready artifact.
    #[default]
    Artifact,
    /// Hand back raw decoded frames (introspection commands).
    Frames,
}

/// Per-invocation pipeline configuration, replacing the source ecosystem's
/// decorator stacking with one explicit value.
#[derive(Clone, Debug, Default)]
pub struct RunSpec {
    /// Optional pre-transform resize.
    pub resize: Option<ResizeTo>,
    /// Fan-out policy for animated inputs.
    pub frame_policy: FramePolicy,
    /// Optional output timing override.
    pub duration: Option<DurationOverride>,
    /// Artifact vs raw-frames output.
    pub output: OutputMode,
}

impl RunSpec {
    /// Spec with all defaults: fan out across frames, inherit delays, encode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a resize target.
    pub fn resize(mut self, resize: ResizeTo) -> Self {
        self.resize = Some(resize);
        self
    }

    /// Set the fan-out policy.
    pub fn frame_policy(mut self, policy: FramePolicy) -> Self {
        self.frame_policy = policy;
        self
    }

    /// Set a timing override.
    pub fn duration(mut self, duration: DurationOverride) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Request raw decoded frames instead of an encoded artifact.
    pub fn raw_frames(mut self) -> Self {
        self.output = OutputMode::Frames;
        self
    }
}

/// Compute missing target dimensions preserving aspect ratio.
///
/// With only a width given, `height = ceil(width / w * h)`; symmetrically for
/// a height-only request. `Exact` passes through.
pub fn prop_size(current: (u32, u32), resize: ResizeTo) -> (u32, u32) {
    let (w, h) = (current.0.max(1) as f64, current.1.max(1) as f64);
    match resize {
        ResizeTo::Width(width) => {
            let height = (width as f64 / w * h).ceil() as u32;
            (width, height.max(1))
        }
        ResizeTo::Height(height) => {
            let width = (height as f64 / h * w).ceil() as u32;
            (width.max(1), height)
        }
        ResizeTo::Exact(width, height) => (width, height),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/core.rs"]
mod tests;
