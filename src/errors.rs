use axum::http::StatusCode;
use chrono::NaiveDate;

/// Failures raised by the log store. Only the first two ever reach callers;
/// the persistence variants are recovered inside the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    #[error("unknown task `{0}`")]
    UnknownTask(String),
    #[error("no log exists for {0}")]
    NoSuchDay(NaiveDate),
    #[error("storage unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error("stored log data is malformed: {0}")]
    MalformedPersistedState(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::UnknownTask(_) | LogError::NoSuchDay(_) => Self::not_found(err.to_string()),
            other => Self::internal(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
