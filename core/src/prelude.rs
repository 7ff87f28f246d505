/// Fatal errors raised while decoding a container.
///
/// Decoding is all-or-nothing: any of these aborts the decode and no
/// partial volume is returned.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid container: {0}")]
    Format(String),
    #[error("malformed metadata block: {0}")]
    Metadata(#[from] serde_json::Error),
    #[error("checksum mismatch: preamble '{expected}' vs epilogue '{actual}'")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("data block '{name}' unreadable: {reason}")]
    Block { name: String, reason: String },
}

/// Non-fatal, per-operation errors from slice extraction.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("index {index} out of range for {axis} axis of extent {extent}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        extent: usize,
    },
}

pub type DecodeResult<T> = Result<T, DecodeError>;
pub type ProcessResult<T> = Result<T, ProcessError>;
