//! Parsing the upload endpoint's reply.

use serde::Deserialize;

use crate::error::UploadError;

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Where the stored file can be fetched from
    pub url: String,
}

/// Parse an endpoint response.
///
/// Anything other than a JSON object with a string `url` is a protocol error.
pub fn parse_response(body: &[u8]) -> Result<UploadResponse, UploadError> {
    serde_json::from_slice(body).map_err(|e| UploadError::protocol(e.to_string()))
}
