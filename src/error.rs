use std::fmt::Display;

use thiserror::Error;

/// Boxed error returned by [`EncodeValues`](crate::EncodeValues) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for `serde_urlvalues`.
#[derive(Debug, Error)]
pub enum Error {
    /// The top-level value is not a string, map or struct.
    #[error("expected string/map/struct but got {found:?}")]
    TypeMismatch { found: &'static str },

    /// A custom encoder failed.
    #[error("custom encoder failed at key {key:?}: {source}")]
    CustomEncode {
        key: String,
        #[source]
        source: BoxError,
    },

    /// The record encoder failed for the struct found at `key`.
    #[error("encoding struct at key {key:?}: {source}")]
    Record {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// A top-level string could not be parsed as a querystring.
    #[error("parsing failed with error: '{message}' at position: {position}")]
    Parse { message: String, position: usize },

    /// A map key was not a scalar value.
    #[error("unsupported map key: {0}")]
    UnsupportedKey(&'static str),

    /// A custom time layout is not a valid format string.
    #[error("invalid time layout: {0:?}")]
    InvalidTimeLayout(String),

    /// A timestamp cannot be represented in the requested unit.
    #[error("timestamp out of range: {0}")]
    TimeOutOfRange(String),

    /// Message produced by a `Serialize` implementation.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Generate a parsing error message with position.
    pub fn parse_err<T>(msg: T, position: usize) -> Self
    where
        T: Display,
    {
        Error::Parse {
            message: msg.to_string(),
            position,
        }
    }

    pub(crate) fn custom_encode(key: &str, source: BoxError) -> Self {
        Error::CustomEncode {
            key: key.to_owned(),
            source,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
