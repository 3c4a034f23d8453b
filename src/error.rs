use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("owner not found")]
    OwnerNotFound,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("weather gateway not configured")]
    WeatherUnconfigured,

    #[error("weather fetch failed: {0}")]
    WeatherFetch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
