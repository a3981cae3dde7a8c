use tracing::debug;

use crate::{
    foundation::config::PipelineConfig,
    foundation::error::{PipelineError, PipelineResult},
    source::emoji,
    source::fetch::{ByteFetcher, FetchedBytes, fetch_image},
    source::guard::check_size,
    source::message::{ImageReference, Message, StickerFormat},
};

/// An owned byte buffer ready for the backend adapter, plus the content type
/// inferred while fetching. Always within the configured byte ceiling.
#[derive(Clone, Debug)]
pub struct ResolvedImage {
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
    /// Content type declared by the source, if any.
    pub content_type: Option<String>,
}

/// Mention lookup seam.
///
/// Turning `@member` / `@user` argument tokens into avatar URLs needs the
/// chat-platform directory, which is an external collaborator. Contexts
/// without one use [`NoDirectory`], which simply skips both converters.
pub trait AvatarDirectory: Send + Sync {
    /// Avatar URL for a guild-member mention/token, if it resolves.
    fn member_avatar_url(&self, argument: &str) -> Option<String>;
    /// Avatar URL for a platform-user mention/token, if it resolves.
    fn user_avatar_url(&self, argument: &str) -> Option<String>;
}

/// [`AvatarDirectory`] that never resolves anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDirectory;

impl AvatarDirectory for NoDirectory {
    fn member_avatar_url(&self, _argument: &str) -> Option<String> {
        None
    }

    fn user_avatar_url(&self, _argument: &str) -> Option<String> {
        None
    }
}

/// Turns a heterogeneous, ambiguous user-supplied reference into concrete
/// image bytes.
///
/// Resolution order, first success wins:
///
/// 1. explicit argument: member avatar → user avatar → custom emoji →
///    unicode emoji → direct URL
/// 2. invoking message: attachments → stickers → embeds
/// 3. replied-to message: step 2, then step 1 on its first content token
/// 4. the invoking author's own avatar
///
/// Every individual fetch failure is swallowed (logged at debug) and the next
/// candidate is tried. The returned buffer has already passed the size guard.
pub struct SourceResolver<'a, F, D> {
    fetcher: &'a F,
    directory: &'a D,
    config: &'a PipelineConfig,
}

impl<'a, F: ByteFetcher, D: AvatarDirectory> SourceResolver<'a, F, D> {
    /// Build a resolver borrowing the shared fetcher, directory, and config.
    pub fn new(fetcher: &'a F, directory: &'a D, config: &'a PipelineConfig) -> Self {
        Self {
            fetcher,
            directory,
            config,
        }
    }

    /// Run the full resolution order for one invocation.
    #[tracing::instrument(skip_all)]
    pub async fn resolve(
        &self,
        argument: Option<&str>,
        message: &Message,
    ) -> PipelineResult<ResolvedImage> {
        if let Some(arg) = argument
            && let Some(found) = self.try_argument(arg).await
        {
            return self.guarded(found);
        }

        if let Some(found) = self.try_message(message).await {
            return self.guarded(found);
        }

        if let Some(reply) = message.reference.as_deref() {
            if let Some(found) = self.try_message(reply).await {
                return self.guarded(found);
            }

            if let Some(token) = reply.content.split_whitespace().next()
                && let Some(found) = self.try_argument(token).await
            {
                return self.guarded(found);
            }
        }

        // Author avatar: the never-failing fallback. A fetch error here means
        // the platform CDN itself is down; surface the defensive variant.
        match fetch_image(self.fetcher, &message.author_avatar_url).await {
            Ok(found) => self.guarded(found),
            Err(err) => {
                debug!(error = %err, "author avatar fallback failed");
                Err(PipelineError::SourceUnresolvable)
            }
        }
    }

    /// Interpret an explicit argument string, trying each converter in fixed
    /// priority order.
    async fn try_argument(&self, argument: &str) -> Option<FetchedBytes> {
        for candidate in self.candidates(argument) {
            match self.fetch_reference(&candidate).await {
                Ok(found) => return Some(found),
                Err(err) => {
                    debug!(?candidate, error = %err, "argument candidate failed");
                }
            }
        }
        None
    }

    /// Candidate references for an argument, in converter priority order.
    fn candidates(&self, argument: &str) -> Vec<ImageReference> {
        let mut out = Vec::new();

        if let Some(url) = self.directory.member_avatar_url(argument) {
            out.push(ImageReference::AvatarUrl(url));
        }
        if let Some(url) = self.directory.user_avatar_url(argument) {
            out.push(ImageReference::AvatarUrl(url));
        }
        if let Some(url) = emoji::custom_emoji_url(argument) {
            out.push(ImageReference::CustomEmoji(url));
        }
        out.push(ImageReference::UnicodeEmoji(argument.trim().to_owned()));
        out.push(ImageReference::Url(argument.to_owned()));
        out
    }

    async fn fetch_reference(&self, reference: &ImageReference) -> anyhow::Result<FetchedBytes> {
        match reference {
            ImageReference::AvatarUrl(url)
            | ImageReference::CustomEmoji(url)
            | ImageReference::Url(url) => fetch_image(self.fetcher, url).await,
            ImageReference::UnicodeEmoji(arg) => self.fetch_unicode_emoji(arg).await,
            ImageReference::Bytes(bytes) => Ok(FetchedBytes {
                bytes: bytes.clone(),
                content_type: None,
            }),
        }
    }

    /// Fetch a unicode emoji asset, rasterizing vector assets onto the fixed
    /// emoji canvas so downstream stages only see raster buffers.
    async fn fetch_unicode_emoji(&self, emoji_arg: &str) -> anyhow::Result<FetchedBytes> {
        let (url, is_svg) = emoji::unicode_emoji_url(emoji_arg);
        let fetched = self.fetcher.fetch(&url).await?;

        if !is_svg {
            return Ok(fetched);
        }

        let canvas = self.config.emoji_canvas;
        let rgba = emoji::rasterize_svg(&fetched.bytes, canvas)?;
        let png = emoji::rgba_to_png(rgba, canvas)?;
        Ok(FetchedBytes {
            bytes: png,
            content_type: Some("image/png".to_owned()),
        })
    }

    /// Inspect a message body: attachments, then stickers, then embeds.
    async fn try_message(&self, message: &Message) -> Option<FetchedBytes> {
        if let Some(file) = message.attachments.first()
            && file.is_image()
        {
            match self.fetcher.fetch(&file.url).await {
                Ok(found) => return Some(found),
                Err(err) => debug!(url = %file.url, error = %err, "attachment fetch failed"),
            }
        }

        if let Some(sticker) = message
            .stickers
            .iter()
            .find(|s| s.format != StickerFormat::VectorAnimation)
        {
            match fetch_image(self.fetcher, &sticker.url).await {
                Ok(found) => return Some(found),
                Err(err) => debug!(url = %sticker.url, error = %err, "sticker fetch failed"),
            }
        }

        for embed in &message.embeds {
            let Some(url) = embed.best_image_url() else {
                continue;
            };
            match fetch_image(self.fetcher, url).await {
                Ok(found) => return Some(found),
                Err(err) => debug!(url, error = %err, "embed fetch failed"),
            }
        }

        None
    }

    fn guarded(&self, found: FetchedBytes) -> PipelineResult<ResolvedImage> {
        check_size(found.bytes.len(), self.config.max_bytes)?;
        Ok(ResolvedImage {
            bytes: found.bytes,
            content_type: found.content_type,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/resolver.rs"]
mod tests;
