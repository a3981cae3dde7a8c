use anyhow::Context;
use serde_json::json;
use tracing::error;

use crate::foundation::error::PipelineError;

/// Chat-platform message length ceiling.
pub const MESSAGE_LIMIT: usize = 2000;

/// Destination for failure reports too long to inline in a reply.
pub trait PasteSink: Send + Sync {
    /// Upload `text` and return a public URL for it.
    fn post(&self, text: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

/// [`PasteSink`] posting to a mystbin-compatible paste service.
#[derive(Clone, Debug)]
pub struct MystbinSink {
    client: reqwest::Client,
    endpoint: String,
    base_url: String,
}

impl MystbinSink {
    /// Sink for the public mystb.in instance.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: "https://mystb.in/api/paste".to_owned(),
            base_url: "https://mystb.in".to_owned(),
        }
    }
}

impl PasteSink for MystbinSink {
    async fn post(&self, text: &str) -> anyhow::Result<String> {
        let payload = json!({
            "files": [{ "filename": "traceback.txt", "content": text }],
        });

        let resp: serde_json::Value = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .context("post paste")?
            .error_for_status()
            .context("paste service rejected upload")?
            .json()
            .await
            .context("decode paste response")?;

        let id = resp
            .get("id")
            .and_then(|v| v.as_str())
            .context("paste response carries no id")?;
        Ok(format!("{}/{id}", self.base_url))
    }
}

/// Reply line reporting how long a dispatch took.
pub fn format_process_time(elapsed: std::time::Duration) -> String {
    format!("**Process Time:** `{:.2} ms`", elapsed.as_secs_f64() * 1000.0)
}

/// Clamp `content` to `limit` characters, ending with a placeholder when cut.
pub fn truncate(content: &str, limit: usize) -> String {
    const PLACEHOLDER: &str = "...";
    if content.chars().count() <= limit {
        return content.to_owned();
    }
    let keep = limit.saturating_sub(PLACEHOLDER.len());
    let mut out: String = content.chars().take(keep).collect();
    out.push_str(PLACEHOLDER);
    out
}

/// Render a pipeline error as a single user-facing reply.
///
/// Every taxonomy variant carries its own user wording via `Display`;
/// internal transform failures get a generic line here. Callers that can
/// reach a paste service should prefer [`report_internal_failure`] for those.
pub fn render_error(err: &PipelineError) -> String {
    match err {
        PipelineError::Transform(inner) => {
            truncate(&format!("An unexpected error occurred: `{inner}`"), MESSAGE_LIMIT)
        }
        other => truncate(&other.to_string(), MESSAGE_LIMIT),
    }
}

/// Render an internal transform failure with its full error chain.
///
/// The chain is always logged. When the rendered text fits the message limit
/// it is inlined; otherwise it is uploaded to the paste service and the link
/// is returned instead. If the upload itself fails, the text is truncated.
pub async fn report_internal_failure<S: PasteSink>(err: &anyhow::Error, sink: &S) -> String {
    let detail = format!("{err:?}");
    error!(error = %detail, "transform failed");

    let rendered = format!("An unexpected error occurred:\n```\n{detail}\n```");
    if rendered.chars().count() <= MESSAGE_LIMIT {
        return rendered;
    }

    match sink.post(&detail).await {
        Ok(url) => format!("An unexpected error occurred, full details: {url}"),
        Err(post_err) => {
            error!(error = %post_err, "paste upload failed");
            truncate(&rendered, MESSAGE_LIMIT)
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/report.rs"]
mod tests;
