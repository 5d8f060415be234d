use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Network or service failure on any store call.
    #[error("Keyword store unavailable: {0}")]
    StoreUnavailable(String),

    /// Raised by the manual add path when the lowercase term is already stored.
    #[error("Keyword \"{0}\" already exists")]
    DuplicateTerm(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl Error {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
