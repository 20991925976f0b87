use std::io;

use thiserror::Error;

use crate::ColorChoiceParseError;

/// Errors produced by an [`IoHub`](crate::IoHub).
#[derive(Error, Debug)]
pub enum HubError {
    /// The underlying stream rejected a write. Nothing is retried.
    #[error("failed to write to stream: {0}")]
    StreamWrite(#[from] io::Error),

    /// The input stream failed while reading a line.
    #[error("failed to read from input stream: {0}")]
    StreamRead(#[source] io::Error),

    /// A configuration value could not be parsed.
    #[error("invalid hub configuration: {0}")]
    InvalidConfig(#[from] ColorChoiceParseError),
}

pub type Result<T> = std::result::Result<T, HubError>;
