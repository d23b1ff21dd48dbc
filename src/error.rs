#[derive(thiserror::Error, Debug)]
pub enum RecError {
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Feature schema mismatch: expected {expected} columns, got {actual}")]
    Schema { expected: usize, actual: usize },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RecResult<T> = Result<T, RecError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    NotFound,
    DataUnavailable,
    ValidationError(String),
}

impl<T> Outcome<T> {
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> From<RecError> for Outcome<T> {
    fn from(err: RecError) -> Self {
        match err {
            RecError::Validation(msg) => Outcome::ValidationError(msg),
            _ => Outcome::DataUnavailable,
        }
    }
}
