use thiserror::Error;

/// Failure to obtain a source table at load time.
///
/// Never surfaced by the engine: [`crate::AggregateIndex::load`] turns it into the
/// synthetic fallback index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("source table unavailable: {0}")]
    Unavailable(String),

    #[error("source table malformed: {0}")]
    Malformed(String),
}

impl SourceError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
