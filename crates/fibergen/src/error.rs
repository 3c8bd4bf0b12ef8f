//! Error types and result alias for the crate.
//!
//! Geometric infeasibility is kept distinct from configuration errors so
//! callers can tell "these parameters admit no fiber" apart from "this
//! parameter is out of its domain".
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unable to construct fibers with current parameters: {0}")]
    Infeasible(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is a geometric infeasibility rather than a
    /// validation or internal failure.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Error::Infeasible(_))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn infeasible_is_distinguishable() {
        let err = Error::Infeasible("circles do not intersect".into());
        assert!(err.is_infeasible());
        assert!(!Error::InvalidConfig("bad".into()).is_infeasible());
    }

    #[test]
    fn messages_render_with_context() {
        let err = Error::Infeasible("span too long".into());
        assert_eq!(
            err.to_string(),
            "unable to construct fibers with current parameters: span too long"
        );
    }
}
