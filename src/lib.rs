//! Pixelmill is a media resolution and transformation pipeline for chat bots.
//!
//! Given a loosely-specified reference to an image (a mention, an emoji, a URL,
//! an attachment, a sticker, an embed, or a reply chain carrying any of these),
//! Pixelmill resolves a concrete byte buffer, enforces size and frame ceilings,
//! runs the buffer through a single-frame or animated transform, and serializes
//! the result back into an attachable artifact with correct timing metadata.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `Option<&str> + Message -> ResolvedImage` (fixed priority order,
//!    individual candidate failures are swallowed)
//! 2. **Guard**: raw byte ceiling is enforced before any decode work
//! 3. **Run**: `ResolvedImage -> FrameSequence -> transform fan-out -> EncodedArtifact`
//!    on one of two raster backends
//! 4. **Dispatch**: the decode/transform/encode chain runs on a bounded worker
//!    pool, timed and wrapped in a global timeout
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Two backends, one contract**: straight-alpha ([`BasicBackend`]) and
//!   premultiplied RGBA8 ([`AdvancedBackend`]) frames behind the [`Backend`] trait,
//!   selected statically.
//! - **Order-preserving fan-out**: animated inputs are processed strictly
//!   sequentially; output frame *i* always derives from input frame *i*.
//! - **No IO past the resolver**: decode, transform, and encode are pure CPU work
//!   and never touch the network.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod backend;
mod cooldown;
mod dispatch;
mod foundation;
mod report;
mod source;

pub mod transforms;

pub use assets::{AssetStore, assets, nearest_color};
pub use backend::adapter::{PipelineOutput, run_pipeline};
pub use backend::advanced::{AdvancedBackend, Raster};
pub use backend::basic::BasicBackend;
pub use backend::bridge::{ArrayTransform, ColorModel, PixelArray, from_array, to_array};
pub use backend::encode::{ArtifactFormat, EncodedArtifact, encode_animated_gif, encode_static_png};
pub use backend::{
    Backend, DurationOverride, FramePolicy, FrameSequence, OutputMode, ResizeTo, RunSpec,
    TimedFrame, Transform, TransformOutput, prop_size,
};
pub use cooldown::{CooldownGate, CooldownVerdict};
pub use dispatch::{Dispatched, Dispatcher};
pub use foundation::color::{Rgba8, parse_color};
pub use foundation::config::PipelineConfig;
pub use foundation::error::{PipelineError, PipelineResult};
pub use report::{
    MESSAGE_LIMIT, MystbinSink, PasteSink, format_process_time, render_error,
    report_internal_failure, truncate,
};
pub use source::emoji::{custom_emoji_url, rasterize_svg, unicode_emoji_url};
pub use source::fetch::{ByteFetcher, FetchedBytes, HttpFetcher, fetch_image};
pub use source::guard::check_size;
pub use source::message::{Attachment, Embed, ImageReference, Message, Sticker, StickerFormat};
pub use source::resolver::{AvatarDirectory, NoDirectory, ResolvedImage, SourceResolver};
