//! Representative leaf transforms.
//!
//! The production filter catalogue is a thin external layer (~60 functions);
//! the leaves here exist to exercise every mode the pipeline supports: plain
//! per-frame transforms on both backends, array-bridge transforms,
//! sequence-generating transforms, and the raw-frames introspection path.

pub mod advanced;
pub mod array;
pub mod basic;
pub mod info;

pub use advanced::{invert_raster, tint};
pub use array::{block_mosaic, sobel_edges};
pub use basic::{circular, dissolve, flip_horizontal, grayscale, invert};
pub use info::{ImageSummary, inspect, palette_swatch};
