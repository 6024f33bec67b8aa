//! Concurrent uploads into a shared editor.
//!
//! Each file in a batch becomes its own spawned task. Tasks report
//! progress into the batch, and on success insert a markdown link at
//! whatever the editor's caret is at that moment. Failures stay inside
//! their task: they are recorded on the batch, sent to the sink, and
//! returned from `BatchHandle::join`.

use std::sync::{Arc, Mutex, PoisonError};

use mdpen_editor_core::TextHost;
use n0_future::task::JoinHandle;
use smol_str::SmolStr;

use crate::batch::{BatchId, UploadBatch};
use crate::config::UploadConfig;
use crate::drop_zone::UploadSource;
use crate::error::UploadError;
use crate::file::{UploadFile, markdown_link};
use crate::progress::{ProgressReporter, ProgressSink};
use crate::response::parse_response;
use crate::transport::{UploadRequest, UploadTransport};

/// Result of one task.
#[derive(Debug)]
pub struct TaskOutcome {
    pub index: usize,
    pub file_name: SmolStr,
    /// The stored file's URL
    pub result: Result<String, UploadError>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Handle to a running batch.
///
/// Dropping it detaches the tasks; they still finish and insert their links.
pub struct BatchHandle {
    batch: Arc<UploadBatch>,
    handles: Vec<JoinHandle<Result<String, UploadError>>>,
}

impl BatchHandle {
    pub fn id(&self) -> BatchId {
        self.batch.id()
    }

    pub fn batch(&self) -> &Arc<UploadBatch> {
        &self.batch
    }

    /// Wait for every task. Outcomes are in file order, not completion order.
    pub async fn join(self) -> Vec<TaskOutcome> {
        let tasks = self.batch.tasks();
        let results = n0_future::join_all(self.handles).await;
        tasks
            .into_iter()
            .zip(results)
            .map(|(task, joined)| TaskOutcome {
                index: task.index,
                file_name: task.file_name,
                result: joined.unwrap_or_else(|e| Err(UploadError::from(e))),
            })
            .collect()
    }
}

impl std::fmt::Debug for BatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchHandle")
            .field("batch", &self.batch)
            .field("tasks", &self.handles.len())
            .finish()
    }
}

/// Runs upload batches against one editor.
pub struct UploadOrchestrator<T, H> {
    transport: Arc<T>,
    host: Arc<Mutex<H>>,
    config: Arc<UploadConfig>,
}

impl<T, H> Clone for UploadOrchestrator<T, H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            host: self.host.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T, H> UploadOrchestrator<T, H>
where
    T: UploadTransport,
    H: TextHost + Send + 'static,
{
    pub fn new(transport: T, host: Arc<Mutex<H>>, config: UploadConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            host,
            config: Arc::new(config),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn host(&self) -> &Arc<Mutex<H>> {
        &self.host
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Start uploading `files`, one concurrent task each.
    ///
    /// Must be called from within the runtime that will drive the tasks.
    pub fn start_batch<S>(
        &self,
        files: Vec<UploadFile>,
        sink: S,
        source: UploadSource,
    ) -> BatchHandle
    where
        S: ProgressSink + 'static,
    {
        let batch = Arc::new(UploadBatch::new(&files, Arc::new(sink)));
        tracing::info!(
            batch = %batch.id(),
            ?source,
            files = files.len(),
            total_bytes = batch.total_bytes_expected(),
            "starting upload batch"
        );

        let handles = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let job = UploadJob {
                    transport: self.transport.clone(),
                    host: self.host.clone(),
                    config: self.config.clone(),
                    batch: batch.clone(),
                    index,
                };
                n0_future::task::spawn(job.run(file))
            })
            .collect();

        BatchHandle { batch, handles }
    }
}

struct UploadJob<T, H> {
    transport: Arc<T>,
    host: Arc<Mutex<H>>,
    config: Arc<UploadConfig>,
    batch: Arc<UploadBatch>,
    index: usize,
}

impl<T, H> UploadJob<T, H>
where
    T: UploadTransport,
    H: TextHost + Send + 'static,
{
    async fn run(self, file: UploadFile) -> Result<String, UploadError> {
        let file_name = file.name.clone();
        let image = file.is_image(&self.config.image_extensions);

        self.batch.mark_in_flight(self.index);
        match self.upload(file).await {
            Ok(url) => {
                let link = markdown_link(&file_name, &url, image);
                self.insert(&link);
                self.batch.mark_succeeded(self.index, &url);
                tracing::info!(
                    batch = %self.batch.id(),
                    index = self.index,
                    file = %file_name,
                    %url,
                    image,
                    "upload inserted"
                );
                Ok(url)
            }
            Err(err) => {
                tracing::warn!(
                    batch = %self.batch.id(),
                    index = self.index,
                    file = %file_name,
                    error = %err,
                    "upload failed"
                );
                self.batch.mark_failed(self.index, &err);
                Err(err)
            }
        }
    }

    async fn upload(&self, file: UploadFile) -> Result<String, UploadError> {
        let request = UploadRequest {
            endpoint: self.config.endpoint.clone(),
            token: self.config.token.clone(),
            file,
        };
        let progress = ProgressReporter::new(self.batch.clone(), self.index);
        let body = self.transport.send(request, progress).await?;
        Ok(parse_response(&body)?.url)
    }

    /// Insert at the caret as it is now, not as it was when the batch began.
    fn insert(&self, link: &str) {
        let mut host = self.host.lock().unwrap_or_else(PoisonError::into_inner);
        host.insert_at_caret(link);
    }
}
