//! Errors raised while uploading.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from a single upload task.
///
/// These never escape the orchestrator: each one ends up in that task's
/// `TaskOutcome` and in the sink's failure channel.
#[derive(Debug, Error, Diagnostic)]
pub enum UploadError {
    #[error("request to {endpoint} failed: {message}")]
    #[diagnostic(code(upload::transport), help("check that the upload endpoint is reachable"))]
    Transport { endpoint: String, message: String },

    #[error("upload endpoint returned status {status}")]
    #[diagnostic(code(upload::status))]
    Status { status: u16, body: String },

    #[error("malformed upload response: {message}")]
    #[diagnostic(
        code(upload::protocol),
        help("the endpoint must answer with a JSON object carrying a string `url`")
    )]
    Protocol { message: String },

    #[error("failed to stream file body")]
    #[diagnostic(code(upload::io))]
    Io(#[from] std::io::Error),

    #[error("upload task did not run to completion")]
    #[diagnostic(code(upload::task))]
    Task(#[from] n0_future::task::JoinError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl UploadError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("missing environment variable: {var}")]
    #[diagnostic(code(config::missing_env))]
    MissingEnv { var: &'static str },

    #[error("invalid value for {var}: {message}")]
    #[diagnostic(code(config::invalid_env))]
    InvalidEnv { var: &'static str, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_transparent() {
        let err = UploadError::from(ConfigError::MissingEnv {
            var: "MDPEN_UPLOAD_URL",
        });
        assert_eq!(
            err.to_string(),
            "missing environment variable: MDPEN_UPLOAD_URL"
        );
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("config::missing_env")
        );
    }

    #[test]
    fn test_protocol_error_code() {
        let err = UploadError::protocol("missing `url`");
        assert_eq!(err.to_string(), "malformed upload response: missing `url`");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("upload::protocol")
        );
    }
}
