use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CalendarError(#[from] halaqa_calendar::error::CalendarError),

    #[error(transparent)]
    CoreError(#[from] halaqa_core::error::CoreError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("All requested times conflict with existing sessions ({0} skipped)")]
    AllTimesConflict(usize),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
