//! Errors surfaced by the command-line front end.

use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing a file failed
    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The codec rejected the input or the container
    #[error(transparent)]
    Codec(#[from] huffcode_core::Error),

    /// `--chars` input that isn't valid UTF-8
    #[error("input is not UTF-8")]
    NotUtf8(#[from] FromUtf8Error),

    /// Decoding did not reproduce the original text
    #[error("decoded text differs from the original")]
    RoundTrip,
}

impl AppError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| AppError::Io {
            action,
            path,
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
