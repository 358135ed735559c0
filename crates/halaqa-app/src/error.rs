use thiserror::Error;

/// Application-level errors (CLI layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] halaqa_service::error::ServiceError),

    #[error(transparent)]
    CalendarError(#[from] halaqa_calendar::error::CalendarError),

    #[error(transparent)]
    CoreError(#[from] halaqa_core::error::CoreError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid log filter '{level}': {reason}")]
    LogFilter { level: String, reason: String },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
