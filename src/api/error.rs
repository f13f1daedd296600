use thiserror::Error;

/// Failures talking to the backend. All of them are recoverable and end up
/// as a transcript message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(String),

	#[error("request timed out")]
	Timeout,

	#[error("server returned {status}")]
	Status { status: u16 },

	#[error("unexpected response: {0}")]
	Decode(String),

	#[error("invalid request: {0}")]
	Request(String),
}

impl From<reqwest::Error> for ApiError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			ApiError::Timeout
		} else if err.is_decode() {
			ApiError::Decode(err.to_string())
		} else if let Some(status) = err.status() {
			ApiError::Status {
				status: status.as_u16(),
			}
		} else if err.is_builder() {
			ApiError::Request(err.to_string())
		} else {
			ApiError::Network(err.to_string())
		}
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		ApiError::Decode(err.to_string())
	}
}
