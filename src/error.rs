use thiserror::Error;

#[cfg(feature = "web")]
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
#[cfg(feature = "web")]
use serde_json::json;

/// Every failure the gallery can surface to a caller.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// A create payload is missing a required field or carries a bad `type`.
    #[error("{0}")]
    Validation(String),

    /// No graph with the given id exists in the collection.
    #[error("no graph with id '{0}'")]
    NotFound(String),

    /// The request body could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a JSON array of graphs.
    #[error("data file is not valid JSON: {0}")]
    Corrupt(serde_json::Error),

    /// The collection could not be turned into JSON for writing.
    #[error("failed to encode graphs for storage: {0}")]
    Encode(serde_json::Error),

    /// Fetching a widget script from upstream failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type GalleryResult<T> = Result<T, GalleryError>;

#[cfg(feature = "web")]
impl GalleryError {
    fn status(&self) -> StatusCode {
        match self {
            GalleryError::Validation(_) | GalleryError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GalleryError::NotFound(_) => StatusCode::NOT_FOUND,
            GalleryError::Io(_)
            | GalleryError::Corrupt(_)
            | GalleryError::Encode(_)
            | GalleryError::Upstream(_)
            | GalleryError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            GalleryError::Validation(_) => "Validation failed",
            GalleryError::NotFound(_) => "Graph not found",
            GalleryError::BadRequest(_) => "Invalid request body",
            GalleryError::Io(_) | GalleryError::Corrupt(_) | GalleryError::Encode(_) => {
                "Storage failure"
            }
            GalleryError::Upstream(_) => "Failed to load script",
            GalleryError::Config(_) => "Something went wrong!",
        }
    }
}

// Convert an error into an HTTP response with a `{error, message}` body
#[cfg(feature = "web")]
impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        let body = Json(json!({
            "error": self.summary(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(feature = "web")]
impl From<JsonRejection> for GalleryError {
    fn from(rejection: JsonRejection) -> Self {
        GalleryError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = GalleryError::NotFound("42".to_string());
        assert_eq!(err.to_string(), "no graph with id '42'");
    }

    #[test]
    fn encode_failures_are_not_reported_as_corrupt_data() {
        use std::collections::HashMap;

        let unencodable = HashMap::from([(vec![1u8], 1)]);
        let err = GalleryError::Encode(serde_json::to_string(&unencodable).unwrap_err());

        let message = err.to_string();
        assert!(message.starts_with("failed to encode graphs for storage"));
        assert!(!message.contains("not valid JSON"));
    }

    #[cfg(feature = "web")]
    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            GalleryError::Validation("title is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GalleryError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        let corrupt = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert_eq!(
            GalleryError::Corrupt(corrupt).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
