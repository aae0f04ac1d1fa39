use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema unavailable: {0}")]
    SchemaUnavailable(#[source] sqlx::Error),

    #[error("Completion unavailable: {0}")]
    CompletionUnavailable(String),

    #[error("Completion timed out after {0:?}")]
    CompletionTimeout(Duration),

    #[error("Completion cancelled")]
    Cancelled,

    /// The engine (or the empty statement check in front of it) refused the
    /// statement. Carries the engine's own message.
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Statement rejected: {0}")]
    StatementRejected(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl From<confique::Error> for Error {
    fn from(value: confique::Error) -> Self {
        Error::Config(value.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::CompletionUnavailable(value.to_string())
    }
}

impl From<sqlparser::parser::ParserError> for Error {
    fn from(value: sqlparser::parser::ParserError) -> Self {
        Error::StatementRejected(format!("statement could not be parsed: {value}"))
    }
}
