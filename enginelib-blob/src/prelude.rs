pub use crate::error::CodecError;

pub type Result<T> = std::result::Result<T, CodecError>;
