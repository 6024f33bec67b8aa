//! mdpen-upload: multi-file uploads into a markdown editor.
//!
//! One user action (picker selection or drop) becomes an `UploadBatch`.
//! Every file is sent concurrently through an `UploadTransport`; the batch
//! aggregates byte progress into a single percentage for a `ProgressSink`,
//! and each successful upload inserts a markdown link or image at the
//! editor's current caret.

pub mod batch;
pub mod config;
pub mod drop_zone;
pub mod error;
pub mod file;
pub mod orchestrator;
pub mod progress;
pub mod response;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod task;
pub mod transport;

pub use batch::{BatchId, UploadBatch, progress_percent};
pub use config::UploadConfig;
pub use drop_zone::{DropZone, EventDisposition, UploadSource};
pub use error::{ConfigError, UploadError};
pub use file::{UploadFile, is_image_file, markdown_link};
pub use orchestrator::{BatchHandle, TaskOutcome, UploadOrchestrator};
pub use progress::{ProgressReporter, ProgressSink, TracingSink, UploadFailure};
pub use response::{UploadResponse, parse_response};
pub use task::{UploadState, UploadTask};
#[cfg(all(
    feature = "http",
    not(all(target_family = "wasm", target_os = "unknown"))
))]
pub use transport::HttpTransport;
pub use transport::{UploadRequest, UploadTransport};
