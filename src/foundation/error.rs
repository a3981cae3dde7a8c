use std::time::Duration;

/// Convenience result type used across the pipeline.
pub type PipelineResult<T> = Result<T, PipelineError>;

const MIL: f64 = 1_000_000.0;

/// Top-level error taxonomy for a pipeline invocation.
///
/// Every variant is recoverable at the command boundary: the invocation fails,
/// the process does not. Individual source-resolution candidates failing is
/// *not* an error; only exhaustion of the whole resolution order is.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No candidate image reference could be fetched after exhausting the full
    /// resolution order. Practically unreachable because of the author-avatar
    /// fallback, kept as a defensive case.
    #[error("no image could be resolved from the provided reference")]
    SourceUnresolvable,

    /// Raw buffer exceeds the configured byte ceiling, checked before decode.
    #[error(
        "The size of the provided image (`{:.2} MB`) exceeds the limit of `{} MB`",
        *size as f64 / MIL,
        *limit as f64 / MIL
    )]
    ImageTooLarge {
        /// Observed buffer size in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// Decoded animation carries more frames than the configured ceiling.
    /// Decoding stops at the ceiling, so `count` is the lowest frame count
    /// the input is known to have, not its true total.
    #[error(
        "Provided image has a frame-count of at least `{count}`, which exceeds the limit of `{limit}`"
    )]
    TooManyFrames {
        /// Frames observed before decoding stopped.
        count: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// Buffer fetched successfully but could not be decoded as an image.
    #[error("could not read the provided image: {0}")]
    BadFormat(String),

    /// A color argument could not be parsed.
    #[error("`{0}` is not a valid color!")]
    InvalidColor(String),

    /// Dispatch exceeded the configured wall-clock budget.
    #[error("Image process took too long and timed out, the timeout is `{}s`", budget.as_secs())]
    ProcessTimeout {
        /// Configured processing budget.
        budget: Duration,
    },

    /// The leaf transform raised an unexpected error; the full chain is kept
    /// for logging and paste-service upload.
    #[error("transform failed: {0}")]
    Transform(#[source] anyhow::Error),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PipelineError {
    /// Build a [`PipelineError::BadFormat`] value.
    pub fn bad_format(msg: impl Into<String>) -> Self {
        Self::BadFormat(msg.into())
    }

    /// Build a [`PipelineError::InvalidColor`] value.
    pub fn invalid_color(arg: impl Into<String>) -> Self {
        Self::InvalidColor(arg.into())
    }

    /// Build a [`PipelineError::Transform`] value from a leaf failure.
    pub fn transform(err: impl Into<anyhow::Error>) -> Self {
        Self::Transform(err.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
