use crate::foundation::error::{PipelineError, PipelineResult};

/// Straight-alpha RGBA8 color value used for transform arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

const NAMED: &[(&str, Rgba8)] = &[
    ("black", Rgba8::rgb(0, 0, 0)),
    ("white", Rgba8::rgb(255, 255, 255)),
    ("red", Rgba8::rgb(255, 0, 0)),
    ("green", Rgba8::rgb(0, 128, 0)),
    ("blue", Rgba8::rgb(0, 0, 255)),
    ("yellow", Rgba8::rgb(255, 255, 0)),
    ("cyan", Rgba8::rgb(0, 255, 255)),
    ("magenta", Rgba8::rgb(255, 0, 255)),
    ("gray", Rgba8::rgb(128, 128, 128)),
    ("orange", Rgba8::rgb(255, 165, 0)),
    ("purple", Rgba8::rgb(128, 0, 128)),
    ("pink", Rgba8::rgb(255, 192, 203)),
];

/// Parse a user-supplied color argument.
///
/// Accepts `#RRGGBB` / `#RRGGBBAA` hex (leading `#` optional) and a small set
/// of common color names. Anything else is [`PipelineError::InvalidColor`].
pub fn parse_color(argument: &str) -> PipelineResult<Rgba8> {
    let s = argument.trim();

    if let Some(named) = NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, c)| *c)
    {
        return Ok(named);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    let invalid = || PipelineError::invalid_color(argument);

    let byte = |pair: &str| u8::from_str_radix(pair, 16).map_err(|_| invalid());

    match hex.len() {
        6 => Ok(Rgba8 {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: 255,
        }),
        8 => Ok(Rgba8 {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: byte(&hex[6..8])?,
        }),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
