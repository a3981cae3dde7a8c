use crate::backend::encode::{ArtifactFormat, EncodedArtifact};
use crate::backend::{
    Backend, DurationOverride, FramePolicy, FrameSequence, OutputMode, RunSpec, TimedFrame,
    Transform, TransformOutput, prop_size,
};
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{PipelineError, PipelineResult};
use crate::source::guard::check_size;
use crate::source::resolver::ResolvedImage;

/// Result of a full adapter run.
#[derive(Debug)]
pub enum PipelineOutput<F> {
    /// Reply-ready encoded artifact.
    Artifact(EncodedArtifact),
    /// Raw decoded frames, for introspection callers that disabled encoding.
    Frames(FrameSequence<F>),
}

impl<F> PipelineOutput<F> {
    /// Unwrap the artifact; error if the run produced raw frames.
    pub fn into_artifact(self) -> PipelineResult<EncodedArtifact> {
        match self {
            Self::Artifact(artifact) => Ok(artifact),
            Self::Frames(_) => Err(PipelineError::bad_format(
                "pipeline run produced raw frames, not an artifact",
            )),
        }
    }
}

/// Run the full decode → resize → fan-out → transform → encode chain.
///
/// This is the synchronous CPU-bound core; callers go through
/// [`crate::Dispatcher`] to keep it off the I/O thread.
///
/// Stages, in order:
///
/// 1. re-check the size guard (decode must never see an oversized buffer)
/// 2. decode into a [`FrameSequence`] (frame ceiling enforced)
/// 3. optional aspect-preserving resize of every frame
/// 4. frame fan-out per [`FramePolicy`], strictly sequential and
///    order-preserving: output frame *i* derives from input frame *i* and
///    inherits its delay
/// 5. normalize the transform output and encode, unless raw frames were
///    requested
#[tracing::instrument(skip_all, fields(backend = backend.name(), bytes = resolved.bytes.len()))]
pub fn run_pipeline<B, T>(
    backend: &B,
    resolved: &ResolvedImage,
    transform: &mut T,
    spec: &RunSpec,
    config: &PipelineConfig,
) -> PipelineResult<PipelineOutput<B::Frame>>
where
    B: Backend,
    T: Transform<B> + ?Sized,
{
    check_size(resolved.bytes.len(), config.max_bytes)?;

    let mut seq = backend.decode(&resolved.bytes, config.max_frames)?;

    if let Some(resize) = spec.resize {
        let current = match seq.frames.first() {
            Some(first) => backend.dimensions(&first.image),
            None => return Err(PipelineError::bad_format("image contains no frames")),
        };
        let (width, height) = prop_size(current, resize);
        for timed in &mut seq.frames {
            timed.image = backend.resize(&timed.image, width, height);
        }
    }

    let normalized = apply_transform(seq, transform, spec, config)?;

    let mut frames = match normalized {
        Normalized::Encoded(bytes) => {
            // Pre-encoded leaf output bypasses the encode step entirely; the
            // format tag still follows the single/multi frame rule as far as
            // the adapter can know, so declare it by sniffing the container.
            let format = if bytes.starts_with(b"GIF8") {
                ArtifactFormat::Gif
            } else {
                ArtifactFormat::Png
            };
            return Ok(PipelineOutput::Artifact(EncodedArtifact::new(
                bytes, format,
            )));
        }
        Normalized::Frames(frames) => frames,
    };

    apply_duration(&mut frames, spec)?;

    if spec.output == OutputMode::Frames {
        return Ok(PipelineOutput::Frames(frames));
    }

    // Exactly one of static/animated is chosen by frame count, never by the
    // source buffer's declared format.
    let artifact = if frames.is_animated() {
        EncodedArtifact::new(backend.encode_animated(&frames)?, ArtifactFormat::Gif)
    } else {
        let only = frames
            .frames
            .first()
            .ok_or_else(|| PipelineError::bad_format("transform produced no frames"))?;
        EncodedArtifact::new(backend.encode_static(&only.image)?, ArtifactFormat::Png)
    };

    Ok(PipelineOutput::Artifact(artifact))
}

enum Normalized<F> {
    Frames(FrameSequence<F>),
    Encoded(Vec<u8>),
}

fn apply_transform<B, T>(
    seq: FrameSequence<B::Frame>,
    transform: &mut T,
    spec: &RunSpec,
    config: &PipelineConfig,
) -> PipelineResult<Normalized<B::Frame>>
where
    B: Backend,
    T: Transform<B> + ?Sized,
{
    if spec.frame_policy == FramePolicy::AllFrames && seq.is_animated() {
        let mut out = Vec::with_capacity(seq.len());
        for timed in seq.frames {
            let result = transform
                .apply(timed.image)
                .map_err(PipelineError::Transform)?;
            match result {
                TransformOutput::Frame(image) => out.push(TimedFrame {
                    image,
                    delay_ms: timed.delay_ms,
                }),
                TransformOutput::Sequence(_) => {
                    return Err(PipelineError::transform(anyhow::anyhow!(
                        "transform returned its own sequence during frame fan-out; \
                         sequence-generating transforms must use FramePolicy::FirstFrameOnly"
                    )));
                }
                TransformOutput::Encoded(_) => {
                    return Err(PipelineError::transform(anyhow::anyhow!(
                        "transform returned pre-encoded bytes during frame fan-out"
                    )));
                }
            }
        }
        return Ok(Normalized::Frames(FrameSequence { frames: out }));
    }

    let first = seq
        .frames
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::bad_format("image contains no frames"))?;

    let result = transform
        .apply(first.image)
        .map_err(PipelineError::Transform)?;

    Ok(match result {
        TransformOutput::Frame(image) => Normalized::Frames(FrameSequence {
            frames: vec![TimedFrame {
                image,
                delay_ms: first.delay_ms,
            }],
        }),
        TransformOutput::Sequence(images) => {
            let delay_ms = config.default_frame_delay_ms;
            Normalized::Frames(FrameSequence {
                frames: images
                    .into_iter()
                    .map(|image| TimedFrame { image, delay_ms })
                    .collect(),
            })
        }
        TransformOutput::Encoded(bytes) => Normalized::Encoded(bytes),
    })
}

/// Apply an explicit per-call duration override to the output frames.
fn apply_duration<F>(frames: &mut FrameSequence<F>, spec: &RunSpec) -> PipelineResult<()> {
    match &spec.duration {
        None => Ok(()),
        Some(DurationOverride::Uniform(ms)) => {
            for timed in &mut frames.frames {
                timed.delay_ms = *ms;
            }
            Ok(())
        }
        Some(DurationOverride::PerFrame(delays)) => {
            if delays.len() != frames.len() {
                return Err(PipelineError::transform(anyhow::anyhow!(
                    "per-frame duration list has {} entries for {} frames",
                    delays.len(),
                    frames.len()
                )));
            }
            for (timed, ms) in frames.frames.iter_mut().zip(delays) {
                timed.delay_ms = *ms;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/adapter.rs"]
mod tests;
