use std::time::Duration;

use serde::Deserialize;

/// Process-wide pipeline limits and knobs.
///
/// Constructed once at startup (typically deserialized from the bot's config
/// file) and passed by shared reference into every invocation. Nothing in the
/// pipeline mutates it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum raw input size in bytes, enforced before any decode work.
    pub max_bytes: usize,
    /// Maximum decoded frame count for animated inputs.
    pub max_frames: usize,
    /// Wall-clock budget for a full decode/transform/encode dispatch, seconds.
    pub timeout_secs: u64,
    /// Fixed per-invoker cooldown window, seconds. Owners bypass it.
    pub cooldown_secs: u64,
    /// Square canvas size used when rasterizing vector emoji assets.
    pub emoji_canvas: u32,
    /// Worker-pool width for CPU-bound pipeline runs.
    pub workers: usize,
    /// Frame delay assigned to transform-generated sequences that carry no
    /// explicit duration, milliseconds.
    pub default_frame_delay_ms: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_bytes: 15_000_000,
            max_frames: 200,
            timeout_secs: 60,
            cooldown_secs: 7,
            emoji_canvas: 500,
            workers: 4,
            default_frame_delay_ms: 100,
        }
    }
}

impl PipelineConfig {
    /// Processing budget as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cooldown window as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
