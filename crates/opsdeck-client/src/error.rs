use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Raised before any request leaves the machine.
    #[error("{0}")]
    Validation(String),

    /// The server throttled us. Deserves distinct, longer-lived messaging.
    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after_seconds: Option<u64>,
    },

    /// Connection-level failure (DNS, TLS, refused, timeout).
    #[error("Connection issue: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a business error.
    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        user_message: Option<String>,
    },

    /// An `error` envelope arrived mid-stream.
    #[error("{message}")]
    Analysis {
        message: String,
        details: Option<String>,
        user_message: Option<String>,
    },

    #[error("Failed to parse stream line: {source}\n  line: {line}")]
    Parse {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stream ended without ever delivering a result envelope.
    #[error("No data received from analysis")]
    NoAnalysisData,

    /// The document exists but has nothing renderable. Regenerate it.
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl ApiError {
    /// The message to put in front of a person. Prefers the server's
    /// `userMessage` when one was provided.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Server {
                user_message: Some(m),
                ..
            }
            | ApiError::Analysis {
                user_message: Some(m),
                ..
            } => m.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_user_message() {
        let err = ApiError::Server {
            status: 500,
            message: "jd generation failed: upstream 502".into(),
            user_message: Some("We couldn't generate this role right now.".into()),
        };
        assert_eq!(
            err.display_message(),
            "We couldn't generate this role right now."
        );
    }

    #[test]
    fn display_falls_back_to_internal_message() {
        let err = ApiError::Analysis {
            message: "model refused".into(),
            details: Some("stage=draft".into()),
            user_message: None,
        };
        assert_eq!(err.display_message(), "model refused");
    }

    #[test]
    fn no_data_message_is_stable() {
        assert_eq!(
            ApiError::NoAnalysisData.to_string(),
            "No data received from analysis"
        );
    }
}
