use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The input ended before the expected layout was fully read.
    #[error("blob data is truncated")]
    TooShort,

    #[error("malformed blob data: {reason}")]
    Malformed { reason: String },

    #[error("failed to inflate zlib-compressed blob data")]
    InflateFailed,
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CodecError::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(_: std::io::Error) -> Self {
        // Reads in this crate only ever fail by running off the end of an
        // in-memory buffer.
        CodecError::TooShort
    }
}
