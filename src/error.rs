use std::fmt;

#[derive(Debug)]
pub enum GeminiError {
    ConfigError(String),
    DecodeError(String),
    RequestError(String),
    ResponseError(String),
    SerializationError(String),
    FileError(String),
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            GeminiError::DecodeError(msg) => write!(f, "Image decode error: {}", msg),
            GeminiError::RequestError(msg) => write!(f, "Request error: {}", msg),
            GeminiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
            GeminiError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            GeminiError::FileError(msg) => write!(f, "File error: {}", msg),
        }
    }
}

impl std::error::Error for GeminiError {}

pub type Result<T> = std::result::Result<T, GeminiError>;
