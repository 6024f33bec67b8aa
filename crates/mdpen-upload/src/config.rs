//! Upload endpoint configuration.

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::ConfigError;

/// Upload endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Endpoint receiving the multipart POST.
    pub endpoint: String,
    /// Opaque token forwarded in the `token` form field.
    pub token: Option<String>,
    /// Extensions (without the dot) that are embedded as images.
    pub image_extensions: Vec<SmolStr>,
    /// Size of the body chunks the HTTP transport reports progress for.
    pub chunk_size: usize,
}

impl UploadConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
    pub const DEFAULT_IMAGE_EXTENSIONS: [&'static str; 5] = ["jpg", "jpeg", "png", "gif", "svg"];

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `MDPEN_UPLOAD_URL`: endpoint receiving uploads
    ///
    /// Optional env vars:
    /// - `MDPEN_UPLOAD_TOKEN`: token sent with every file
    /// - `MDPEN_UPLOAD_CHUNK_SIZE`: progress granularity in bytes (default: 64 KiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var("MDPEN_UPLOAD_URL").map_err(|_| ConfigError::MissingEnv {
            var: "MDPEN_UPLOAD_URL",
        })?;

        let token = std::env::var("MDPEN_UPLOAD_TOKEN").ok();

        let chunk_size = match std::env::var("MDPEN_UPLOAD_CHUNK_SIZE") {
            Ok(raw) => parse_chunk_size(&raw)?,
            Err(_) => Self::DEFAULT_CHUNK_SIZE,
        };

        Ok(Self {
            endpoint,
            token,
            chunk_size,
            ..Default::default()
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: None,
            image_extensions: Self::DEFAULT_IMAGE_EXTENSIONS
                .into_iter()
                .map(SmolStr::new_static)
                .collect(),
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
        }
    }
}

fn parse_chunk_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(ConfigError::InvalidEnv {
            var: "MDPEN_UPLOAD_CHUNK_SIZE",
            message: "must be greater than zero".into(),
        }),
        Ok(size) => Ok(size),
        Err(e) => Err(ConfigError::InvalidEnv {
            var: "MDPEN_UPLOAD_CHUNK_SIZE",
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UploadConfig::new("https://example.com/upload");
        assert_eq!(config.endpoint, "https://example.com/upload");
        assert_eq!(config.token, None);
        assert_eq!(config.chunk_size, UploadConfig::DEFAULT_CHUNK_SIZE);
        assert_eq!(config.image_extensions, ["jpg", "jpeg", "png", "gif", "svg"]);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: UploadConfig =
            serde_json::from_str(r#"{"endpoint": "/upload", "image_extensions": ["webp"]}"#)
                .unwrap();
        assert_eq!(config.endpoint, "/upload");
        assert_eq!(config.image_extensions, ["webp"]);
        assert_eq!(config.chunk_size, UploadConfig::DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_parse_chunk_size() {
        assert_eq!(parse_chunk_size(" 1024 ").unwrap(), 1024);
        assert!(matches!(
            parse_chunk_size("0"),
            Err(ConfigError::InvalidEnv { .. })
        ));
        assert!(matches!(
            parse_chunk_size("lots"),
            Err(ConfigError::InvalidEnv { .. })
        ));
    }
}
