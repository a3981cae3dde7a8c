use std::sync::LazyLock;

use anyhow::{Context, bail};
use regex::Regex;

static MEDIA_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://(www\.)?tenor\.com/view/\S+").unwrap());
static MEDIA_ASSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://(www\.)?c\.tenor\.com/\S+?/\S+?\.gif").unwrap());

/// Bytes fetched from a URL together with the content type the server declared.
#[derive(Clone, Debug)]
pub struct FetchedBytes {
    /// Response body.
    pub bytes: Vec<u8>,
    /// `Content-Type` header value, if present.
    pub content_type: Option<String>,
}

/// Network access seam for the source resolver.
///
/// Production code uses [`HttpFetcher`]; tests substitute an in-memory map.
/// Implementations report failures through `anyhow`; the resolver treats any
/// failure as "this candidate failed" and moves on.
pub trait ByteFetcher: Send + Sync {
    /// Fetch `url` and return the body plus declared content type.
    fn fetch(&self, url: &str) -> impl Future<Output = anyhow::Result<FetchedBytes>> + Send;
}

/// [`ByteFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Wrap an existing client (connection pool is shared with the rest of
    /// the bot).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ByteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<FetchedBytes> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request '{url}'"))?
            .error_for_status()
            .with_context(|| format!("fetch '{url}'"))?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_owned());
        let bytes = resp.bytes().await.context("read response body")?.to_vec();

        Ok(FetchedBytes {
            bytes,
            content_type,
        })
    }
}

/// Fetch a URL that must resolve to image bytes.
///
/// Accepts responses whose content type starts with `image/`. URLs matching
/// the known media-page pattern are fetched as HTML first and the embedded
/// playable asset URL is extracted and fetched instead.
pub async fn fetch_image<F: ByteFetcher>(fetcher: &F, url: &str) -> anyhow::Result<FetchedBytes> {
    let url = url.trim().trim_matches(['<', '>']);

    if MEDIA_PAGE.is_match(url) {
        let page = fetcher.fetch(url).await?;
        let html = String::from_utf8_lossy(&page.bytes);
        let Some(asset) = MEDIA_ASSET.find(&html) else {
            bail!("media page at '{url}' exposes no playable image");
        };
        return fetch_image_direct(fetcher, asset.as_str()).await;
    }

    fetch_image_direct(fetcher, url).await
}

async fn fetch_image_direct<F: ByteFetcher>(
    fetcher: &F,
    url: &str,
) -> anyhow::Result<FetchedBytes> {
    let fetched = fetcher.fetch(url).await?;
    match fetched.content_type.as_deref() {
        Some(ct) if ct.starts_with("image/") => Ok(fetched),
        other => bail!(
            "'{url}' reported content type {:?}, not an image",
            other.unwrap_or("<none>")
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/fetch.rs"]
mod tests;
