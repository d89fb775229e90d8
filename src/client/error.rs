use derive_more::Display;
use reqwest::StatusCode;

#[derive(Debug, Display)]
pub enum ClientError {
    /// No HTTP response: connect failure, timeout, undecodable body.
    #[display(fmt = "network error: {}", _0)]
    Network(reqwest::Error),

    #[display(fmt = "not found")]
    NotFound { detail: Option<String> },

    /// Failure status carrying a human readable `detail`.
    #[display(fmt = "rejected with {}: {}", status, detail)]
    Validation { status: StatusCode, detail: String },

    /// Failure status without a usable `detail`.
    #[display(fmt = "server error {}", status)]
    Server { status: StatusCode },
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e)
    }
}

impl ClientError {
    /// Server supplied detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation { detail, .. } => Some(detail),
            Self::NotFound { detail } => detail.as_deref(),
            Self::Network(_) | Self::Server { .. } => None,
        }
    }

    /// What to show the user: the server's detail verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }

    /// Treat a missing referenced entity as a rejected submission.
    pub(crate) fn not_found_as_validation(self) -> Self {
        match self {
            Self::NotFound { detail } => Self::Validation {
                status: StatusCode::NOT_FOUND,
                detail: detail.unwrap_or_else(|| "Employee not found".to_string()),
            },
            other => other,
        }
    }

    /// Classify a failure response from its status and raw body.
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let detail = extract_detail(body);

        if status == StatusCode::NOT_FOUND {
            return Self::NotFound { detail };
        }
        // 5xx bodies are never shown to the user
        if status.is_server_error() {
            return Self::Server { status };
        }

        match detail {
            Some(detail) => Self::Validation { status, detail },
            None => Self::Server { status },
        }
    }
}

/// `{"detail": "msg"}` or `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;

    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
