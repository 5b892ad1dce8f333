//! Types for errors returned by this crate's decoders, encoders, and record accessors.
use std::{fmt::Display, io, str::Utf8Error};

/// An alias for a `Result` with [`enum@Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error from decoding or encoding DBN, or from converting between DBN types.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error while reading or writing a DBN stream.
    #[error("{1}: {0}")]
    Io(#[source] io::Error, String),
    /// An error decoding DBN, e.g. an invalid header or a record with an inconsistent
    /// length.
    #[error("{0}")]
    Decode(String),
    /// An error encoding DBN, e.g. an unsupported combination of version and schema.
    #[error("{0}")]
    Encode(String),
    /// An error converting a value between two representations, e.g. an unrecognized
    /// enum discriminant.
    #[error("couldn't convert '{input}' to {desired_type}")]
    Conversion {
        /// The value that couldn't be converted, rendered as a string.
        input: String,
        /// The name of the type the value couldn't be converted to.
        desired_type: &'static str,
    },
    /// An error decoding a fixed-width string field as UTF-8.
    #[error("{1}: {0}")]
    Utf8(#[source] Utf8Error, String),
    /// An invalid argument was passed to a function.
    #[error("bad argument {param_name}: {desc}")]
    BadArgument {
        /// The name of the invalid parameter.
        param_name: String,
        /// A description of why the argument was invalid.
        desc: String,
    },
}

impl Error {
    /// Creates a new I/O error with added context.
    pub fn io(error: io::Error, context: impl Into<String>) -> Self {
        Self::Io(error, context.into())
    }

    /// Creates a new decode error with the given message.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a new encode error with the given message.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Creates a new conversion error for a value that couldn't be converted to `T`.
    pub fn conversion<T>(input: impl Display) -> Self {
        Self::Conversion {
            input: input.to_string(),
            desired_type: std::any::type_name::<T>(),
        }
    }

    /// Creates a new UTF-8 decoding error with added context.
    pub fn utf8(error: Utf8Error, context: impl Into<String>) -> Self {
        Self::Utf8(error, context.into())
    }

    /// Creates a new bad-argument error.
    pub fn bad_arg(param_name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self::BadArgument {
            param_name: param_name.into(),
            desc: desc.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Io(error, "I/O error".to_owned())
    }
}

/// Converts an unexpected-EOF I/O error into `Ok(None)`, propagating any other kind
/// of error. Used when reaching the end of a reader is a normal, expected outcome
/// rather than a failure.
pub fn silence_eof_error<T>(err: io::Error) -> io::Result<Option<T>> {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Ok(None)
    } else {
        Err(err)
    }
}
