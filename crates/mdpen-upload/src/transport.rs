//! Sending one file to the upload endpoint.
//!
//! `UploadTransport` is the seam the orchestrator talks to. `HttpTransport`
//! is the reqwest-backed implementation for native targets; browser builds
//! and tests plug in their own.

use std::future::Future;

use bytes::Bytes;

use crate::error::UploadError;
use crate::file::UploadFile;
use crate::progress::ProgressReporter;

/// Everything needed to send one file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub endpoint: String,
    pub token: Option<String>,
    pub file: UploadFile,
}

impl UploadRequest {
    /// Form fields sent alongside the file part, in order.
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("contentType", self.file.mime_type.to_string()),
            ("size", self.file.size.to_string()),
            ("token", self.token.clone().unwrap_or_default()),
        ]
    }
}

/// Sends a file and returns the raw response body.
///
/// Implementations report absolute byte counts through `progress` as the
/// body goes out. Non-success responses are errors; the body of a success
/// response is parsed by the orchestrator.
pub trait UploadTransport: Send + Sync + 'static {
    fn send(
        &self,
        request: UploadRequest,
        progress: ProgressReporter,
    ) -> impl Future<Output = Result<Bytes, UploadError>> + Send;
}

#[cfg(all(
    feature = "http",
    not(all(target_family = "wasm", target_os = "unknown"))
))]
pub use http::HttpTransport;

#[cfg(all(
    feature = "http",
    not(all(target_family = "wasm", target_os = "unknown"))
))]
mod http {
    use bytes::Bytes;
    use futures_util::StreamExt;
    use reqwest::multipart::{Form, Part};

    use super::{UploadRequest, UploadTransport};
    use crate::config::UploadConfig;
    use crate::error::UploadError;
    use crate::progress::ProgressReporter;

    /// Multipart POST over reqwest.
    ///
    /// The file part is streamed in `chunk_size` pieces and progress is
    /// reported as each piece is handed to the request body.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
        chunk_size: usize,
    }

    impl HttpTransport {
        pub fn new(chunk_size: usize) -> Self {
            Self::with_client(reqwest::Client::new(), chunk_size)
        }

        pub fn from_config(config: &UploadConfig) -> Self {
            Self::new(config.chunk_size)
        }

        pub fn with_client(client: reqwest::Client, chunk_size: usize) -> Self {
            Self {
                client,
                chunk_size: chunk_size.max(1),
            }
        }
    }

    impl Default for HttpTransport {
        fn default() -> Self {
            Self::new(UploadConfig::DEFAULT_CHUNK_SIZE)
        }
    }

    impl UploadTransport for HttpTransport {
        async fn send(
            &self,
            request: UploadRequest,
            progress: ProgressReporter,
        ) -> Result<Bytes, UploadError> {
            let endpoint = request.endpoint.clone();
            let fields = request.form_fields();
            let file = request.file;

            let chunks = split_chunks(&file.data, self.chunk_size);
            let mut sent = 0u64;
            let body = futures_util::stream::iter(chunks).map(move |chunk| {
                sent += chunk.len() as u64;
                progress.report(sent);
                Ok::<_, std::io::Error>(chunk)
            });

            let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), file.size)
                .file_name(file.name.to_string())
                .mime_str(&file.mime_type)
                .map_err(|e| UploadError::transport(&endpoint, e))?;

            let mut form = Form::new().part("file", part);
            for (name, value) in fields {
                form = form.text(name, value);
            }

            tracing::debug!(%endpoint, file = %file.name, size = file.size, "sending upload");
            let response = self
                .client
                .post(&endpoint)
                .multipart(form)
                .send()
                .await
                .map_err(|e| UploadError::transport(&endpoint, e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(UploadError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            response
                .bytes()
                .await
                .map_err(|e| UploadError::transport(&endpoint, e))
        }
    }

    fn split_chunks(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
        (0..data.len())
            .step_by(chunk_size)
            .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use std::sync::Arc;

        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::task::JoinHandle;

        use super::*;
        use crate::batch::UploadBatch;
        use crate::file::UploadFile;
        use crate::progress::TracingSink;

        /// Accept one connection, read the whole request, answer with
        /// `status` and `body`. The handle yields the raw request.
        async fn serve_once(
            status: &'static str,
            body: &'static str,
        ) -> (String, JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let endpoint = format!("http://{}/upload", listener.local_addr().unwrap());
            let server = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                while !request_complete(&request) {
                    let n = stream.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
                String::from_utf8_lossy(&request).into_owned()
            });
            (endpoint, server)
        }

        fn request_complete(request: &[u8]) -> bool {
            let text = String::from_utf8_lossy(request);
            let Some(head_end) = text.find("\r\n\r\n") else {
                return false;
            };
            let head = text[..head_end].to_ascii_lowercase();
            let received = request.len() - (head_end + 4);
            match head.lines().find_map(|l| l.strip_prefix("content-length:")) {
                Some(len) => len.trim().parse::<usize>().is_ok_and(|len| received >= len),
                None => text.ends_with("0\r\n\r\n"),
            }
        }

        fn upload(endpoint: String) -> (UploadRequest, Arc<UploadBatch>) {
            let file = UploadFile::new("notes.txt", vec![b'x'; 10]).with_mime_type("text/plain");
            let batch = Arc::new(UploadBatch::new(
                std::slice::from_ref(&file),
                Arc::new(TracingSink),
            ));
            let request = UploadRequest {
                endpoint,
                token: Some("jwt".into()),
                file,
            };
            (request, batch)
        }

        #[tokio::test]
        async fn test_send_posts_multipart_form() {
            let reply = r#"{"url":"/files/notes.txt"}"#;
            let (endpoint, server) = serve_once("200 OK", reply).await;
            let (request, batch) = upload(endpoint);

            let progress = ProgressReporter::new(batch.clone(), 0);
            let body = HttpTransport::new(4).send(request, progress).await.unwrap();
            assert_eq!(body, reply);

            let captured = server.await.unwrap();
            assert!(captured.starts_with("POST /upload "), "{captured}");
            assert!(captured.contains(r#"name="file"; filename="notes.txt""#));
            assert!(captured.contains("name=\"contentType\"\r\n\r\ntext/plain\r\n"));
            assert!(captured.contains("name=\"size\"\r\n\r\n10\r\n"));
            assert!(captured.contains("name=\"token\"\r\n\r\njwt\r\n"));

            // Every chunk went out, so the file counts as fully sent.
            assert_eq!(batch.task(0).unwrap().bytes_loaded, 10);
            assert_eq!(batch.percent(), 100);
        }

        #[tokio::test]
        async fn test_error_status_is_returned() {
            let (endpoint, server) = serve_once("500 Internal Server Error", "disk full").await;
            let (request, batch) = upload(endpoint);

            let progress = ProgressReporter::new(batch, 0);
            let err = HttpTransport::new(4).send(request, progress).await.unwrap_err();
            assert!(
                matches!(&err, UploadError::Status { status: 500, body } if body == "disk full"),
                "{err:?}"
            );
            server.await.unwrap();
        }

        #[test]
        fn test_split_chunks() {
            let data = Bytes::from_static(b"abcdefg");
            let chunks = split_chunks(&data, 3);
            assert_eq!(chunks, vec!["abc", "def", "g"]);
            assert!(split_chunks(&Bytes::new(), 3).is_empty());
        }

        #[test]
        fn test_zero_chunk_size_is_clamped() {
            assert_eq!(HttpTransport::new(0).chunk_size, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields() {
        let request = UploadRequest {
            endpoint: "/upload".into(),
            token: Some("jwt".into()),
            file: UploadFile::new("notes.txt", "hello").with_mime_type("text/plain"),
        };
        assert_eq!(
            request.form_fields(),
            [
                ("contentType", "text/plain".to_string()),
                ("size", "5".to_string()),
                ("token", "jwt".to_string()),
            ]
        );
    }
}
