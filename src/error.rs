use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid character {0:?} in identifier")]
    InvalidCharacter(char),
    #[error("country code {0} is not in the registry")]
    UnknownCountry(String),
    #[error("expected length {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("identifier is structurally malformed")]
    MalformedInput,
    #[error("check digits do not match")]
    BadChecksum,
}
