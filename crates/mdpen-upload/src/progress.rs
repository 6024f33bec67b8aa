//! Where batch progress goes.
//!
//! The orchestrator never surfaces upload errors to its caller directly.
//! Percentages, failures and completions are pushed to a `ProgressSink`
//! instead, and per-task results are available from `BatchHandle::join`.

use std::sync::Arc;

use crate::batch::{BatchId, UploadBatch};
use crate::error::UploadError;

/// A failed task, as handed to `ProgressSink::on_failure`.
#[derive(Debug, Clone, Copy)]
pub struct UploadFailure<'a> {
    pub index: usize,
    pub file_name: &'a str,
    pub error: &'a UploadError,
}

/// Consumer of batch progress.
///
/// Calls for one batch are serialized and percentages never decrease.
/// Implementations must not call back into the batch that invoked them.
pub trait ProgressSink: Send + Sync {
    /// Aggregate completion of the batch, in `0..=100`.
    fn on_progress(&self, batch: BatchId, percent: u8);

    /// One task failed. Its siblings keep going.
    fn on_failure(&self, batch: BatchId, failure: &UploadFailure<'_>);

    /// One task succeeded and its link was inserted.
    fn on_complete(&self, batch: BatchId, file_name: &str, url: &str) {
        let _ = (batch, file_name, url);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Arc<S> {
    fn on_progress(&self, batch: BatchId, percent: u8) {
        (**self).on_progress(batch, percent)
    }

    fn on_failure(&self, batch: BatchId, failure: &UploadFailure<'_>) {
        (**self).on_failure(batch, failure)
    }

    fn on_complete(&self, batch: BatchId, file_name: &str, url: &str) {
        (**self).on_complete(batch, file_name, url)
    }
}

/// Sink that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_progress(&self, batch: BatchId, percent: u8) {
        tracing::debug!(%batch, percent, "upload progress");
    }

    fn on_failure(&self, batch: BatchId, failure: &UploadFailure<'_>) {
        tracing::warn!(
            %batch,
            index = failure.index,
            file = failure.file_name,
            error = %failure.error,
            "upload failed"
        );
    }

    fn on_complete(&self, batch: BatchId, file_name: &str, url: &str) {
        tracing::info!(%batch, file = file_name, url, "upload complete");
    }
}

/// Per-task progress handle given to the transport.
#[derive(Clone)]
pub struct ProgressReporter {
    batch: Arc<UploadBatch>,
    index: usize,
}

impl ProgressReporter {
    pub(crate) fn new(batch: Arc<UploadBatch>, index: usize) -> Self {
        Self { batch, index }
    }

    /// Report the absolute number of bytes sent so far for this file.
    ///
    /// Returns the batch percentage after the update.
    pub fn report(&self, loaded: u64) -> u8 {
        self.batch.record_progress(self.index, loaded)
    }

    /// Size of the file this reporter belongs to.
    pub fn expected(&self) -> u64 {
        self.batch.task_size(self.index).unwrap_or(0)
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("batch", &self.batch.id())
            .field("index", &self.index)
            .finish()
    }
}
