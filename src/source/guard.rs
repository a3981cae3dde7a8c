use crate::foundation::error::{PipelineError, PipelineResult};

/// Enforce the raw-buffer byte ceiling.
///
/// Runs on fetched bytes *before* any decode work so that a pathological or
/// malicious source can never force an expensive decode of an oversized
/// payload. The resolver applies it to every returned buffer; the backend
/// adapter re-checks defensively.
pub fn check_size(size: usize, limit: usize) -> PipelineResult<()> {
    if size > limit {
        return Err(PipelineError::ImageTooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/source/guard.rs"]
mod tests;
