use serde::Deserialize;

/// A file attached to an inbound message.
#[derive(Clone, Debug, Deserialize)]
pub struct Attachment {
    /// CDN URL the file can be fetched from.
    pub url: String,
    /// Declared content type, if the platform supplied one.
    pub content_type: Option<String>,
}

impl Attachment {
    /// Whether the declared content type marks this attachment as an image.
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Encoding of a message sticker asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerFormat {
    /// Plain raster sticker (PNG/APNG/GIF), fetchable as image bytes.
    Raster,
    /// Vector keyframe animation; not fetchable as image bytes, skipped.
    VectorAnimation,
}

/// A sticker carried by an inbound message.
#[derive(Clone, Debug, Deserialize)]
pub struct Sticker {
    /// CDN URL of the sticker asset.
    pub url: String,
    /// Asset encoding.
    pub format: StickerFormat,
}

/// A rendered embed exposing image URLs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Embed {
    /// Primary embedded image URL.
    pub image_url: Option<String>,
    /// Thumbnail URL, used when no primary image exists.
    pub thumbnail_url: Option<String>,
}

impl Embed {
    /// First usable image URL exposed by this embed.
    pub fn best_image_url(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.thumbnail_url.as_deref())
    }
}

/// Platform-agnostic view of the invoking chat message.
///
/// The gateway/command framework is an external collaborator; it is expected
/// to project whatever the platform delivers into this shape before calling
/// the resolver.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Message {
    /// Raw text content.
    #[serde(default)]
    pub content: String,
    /// Avatar URL of the message author; the resolver's never-failing fallback.
    #[serde(default)]
    pub author_avatar_url: String,
    /// File attachments, in platform order.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Stickers, in platform order.
    #[serde(default)]
    pub stickers: Vec<Sticker>,
    /// Rendered embeds, in platform order.
    #[serde(default)]
    pub embeds: Vec<Embed>,
    /// The replied-to message, when this message is a reply and the referenced
    /// message still exists.
    #[serde(default)]
    pub reference: Option<Box<Message>>,
}

/// A single concrete candidate produced while interpreting an explicit
/// argument string, before any bytes have been fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageReference {
    /// A member or user avatar, already resolved to its CDN URL.
    AvatarUrl(String),
    /// A custom (guild) emoji asset URL.
    CustomEmoji(String),
    /// A standard unicode emoji, to be looked up on the emoji CDN.
    UnicodeEmoji(String),
    /// A raw URL to fetch directly.
    Url(String),
    /// An already-fetched byte buffer.
    Bytes(Vec<u8>),
}
