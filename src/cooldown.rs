use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of a cooldown check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownVerdict {
    /// The invocation may enter the pipeline.
    Ready,
    /// The invoker is inside the fixed window; retry after this long.
    Cooling {
        /// Remaining time until the window opens again.
        retry_after: Duration,
    },
}

/// Fixed-window per-invoker gate bounding concurrent pipeline usage.
///
/// One invocation per window per invoker (default window 7 s); bot owners
/// bypass the gate entirely. The map only ever grows by one entry per unique
/// invoker and entries are reused, so no eviction is needed.
#[derive(Debug)]
pub struct CooldownGate {
    window: Duration,
    last_seen: Mutex<HashMap<u64, Instant>>,
}

impl CooldownGate {
    /// Build a gate with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Check (and, when ready, consume) the invoker's window.
    pub fn check(&self, invoker: u64, is_owner: bool) -> CooldownVerdict {
        if is_owner {
            return CooldownVerdict::Ready;
        }

        let now = Instant::now();
        let mut last_seen = match self.last_seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(last) = last_seen.get(&invoker) {
            let since = now.duration_since(*last);
            if since < self.window {
                return CooldownVerdict::Cooling {
                    retry_after: self.window - since,
                };
            }
        }

        last_seen.insert(invoker, now);
        CooldownVerdict::Ready
    }
}

#[cfg(test)]
#[path = "../tests/unit/cooldown.rs"]
mod tests;
