use std::sync::Arc;

/// The single error type for all typebus operations.
///
/// Every fallible API returns `typebus::Result<T>` (alias for
/// `Result<T, typebus::Error>`). Sinks return it from their delivery
/// callbacks; the subject hands the first failure back to the publisher
/// exactly as the sink produced it, without wrapping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("Sink error: {0}")]
    Sink(String),

    #[error("External error: {0}")]
    External(#[source] Arc<dyn std::error::Error + Send + Sync>),

    #[error("Publish nested deeper than {0} levels")]
    PublishDepthExceeded(usize),
}

impl Error {
    /// Wrap a foreign error raised inside a delivery callback.
    pub fn external(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::External(Arc::new(e))
    }

    /// Report a delivery failure described by a plain message.
    pub fn sink(message: impl Into<String>) -> Self {
        Error::Sink(message.into())
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sink(a), Self::Sink(b)) => a == b,
            (Self::External(a), Self::External(b)) => Arc::ptr_eq(a, b),
            (Self::PublishDepthExceeded(a), Self::PublishDepthExceeded(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::external(e)
    }
}
