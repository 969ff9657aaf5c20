use serde::Serialize;

/// Error taxonomy shared by every layer. Callers are expected to branch on
/// the kind: Conflict means the operation lost a race or hit a guarded
/// transition, Unavailable is worth retrying, ValidationFailed is not.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Conflict,
    Unavailable,
    ValidationFailed,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Unavailable(_) => ErrorKind::Unavailable,
            Error::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip() {
        assert_eq!(
            Error::Conflict("room sold out".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            Error::ValidationFailed("check-out before check-in".into()).kind(),
            ErrorKind::ValidationFailed
        );
    }
}
