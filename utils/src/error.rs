use std::sync::PoisonError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The scan root could not be enumerated, so there is nothing to audit.
    #[error("root path {path} is not accessible: {source}")]
    RootInaccessible {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}: {source}")]
    WithSource {
        message: String,
        #[source]
        source: BoxedSource,
    },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Wrap a lower level error with a short description of what was being attempted.
    pub fn with_source(message: impl Into<String>, source: BoxedSource) -> Self {
        Error::WithSource {
            message: message.into(),
            source,
        }
    }

    pub fn is_root_inaccessible(&self) -> bool {
        matches!(self, Error::RootInaccessible { .. })
    }
}

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Error::Message(format!("configuration lock poisoned: {}", err))
    }
}
