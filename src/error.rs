use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure reported through the writer's last-error channel.
    #[error("{0}")]
    Writer(String),
}

impl WriterError {
    pub fn writer(message: impl Into<String>) -> Self {
        Self::Writer(message.into())
    }
}

pub type Result<T> = std::result::Result<T, WriterError>;
