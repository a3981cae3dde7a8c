use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::backend::adapter::run_pipeline;
use crate::backend::encode::EncodedArtifact;
use crate::backend::{Backend, RunSpec, Transform};
use crate::foundation::config::PipelineConfig;
use crate::foundation::error::{PipelineError, PipelineResult};
use crate::source::resolver::ResolvedImage;

/// A finished dispatch: the artifact plus how long the full run took.
#[derive(Clone, Debug)]
pub struct Dispatched {
    /// Reply-ready encoded artifact.
    pub artifact: EncodedArtifact,
    /// Wall-clock time around the full call: queueing, decode, transform,
    /// and encode.
    pub elapsed: Duration,
}

/// Runs pipeline invocations on a bounded worker pool.
///
/// Decode/transform/encode are CPU-bound and can take seconds; running them
/// on the I/O thread would stall every concurrent command. The dispatcher
/// owns the pool (a semaphore over `spawn_blocking` workers), measures
/// wall-clock time around the full call, and wraps everything in the global
/// processing timeout. There is no retry: failures surface immediately.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl Dispatcher {
    /// Build a dispatcher sized from the pipeline config.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(config.workers.max(1))),
            timeout: config.timeout(),
        }
    }

    /// Run one full pipeline invocation off-thread and await its artifact.
    ///
    /// The timeout covers the whole dispatch, queueing for a worker included:
    /// an invocation stuck behind a saturated pool past its budget fails with
    /// [`PipelineError::ProcessTimeout`] instead of running late. On timeout
    /// the worker result is abandoned (the thread is not killed, its output is
    /// discarded); no partial artifact ever reaches the caller.
    #[tracing::instrument(skip_all, fields(backend = backend.name()))]
    pub async fn dispatch<B, T>(
        &self,
        backend: B,
        resolved: ResolvedImage,
        transform: T,
        spec: RunSpec,
        config: &PipelineConfig,
    ) -> PipelineResult<Dispatched>
    where
        B: Backend + 'static,
        T: Transform<B> + Send + 'static,
    {
        let start = Instant::now();
        let run_config = config.clone();

        let work = async {
            let _permit = self
                .semaphore
                .acquire()
                .await
                .map_err(|e| anyhow::anyhow!("worker pool closed: {e}"))?;
            debug!(
                available = self.semaphore.available_permits(),
                "worker acquired"
            );

            let handle = tokio::task::spawn_blocking(move || {
                let mut transform = transform;
                run_pipeline(&backend, &resolved, &mut transform, &spec, &run_config)
                    .and_then(|output| output.into_artifact())
            });

            match handle.await {
                Ok(result) => result,
                Err(join_err) => Err(PipelineError::transform(anyhow::anyhow!(
                    "pipeline worker panicked: {join_err}"
                ))),
            }
        };

        match tokio::time::timeout(self.timeout, work).await {
            Err(_) => {
                warn!(budget_secs = self.timeout.as_secs(), "dispatch timed out");
                Err(PipelineError::ProcessTimeout {
                    budget: self.timeout,
                })
            }
            Ok(result) => result.map(|artifact| Dispatched {
                artifact,
                elapsed: start.elapsed(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/dispatch.rs"]
mod tests;
