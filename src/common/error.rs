use rust_bert::RustBertError;
use rust_tokenizers::error::TokenizerError;
use tch::TchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BertSumError {
    #[error("Endpoint not available error: {0}")]
    FileDownloadError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Tch tensor error: {0}")]
    TchError(String),

    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    #[error("Encoder error: {0}")]
    EncoderError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),

    #[error("Value error: {0}")]
    ValueError(String),

    #[error("Candidate and reference counts differ: {candidates} candidates, {references} references")]
    LengthMismatch { candidates: usize, references: usize },
}

impl From<cached_path::Error> for BertSumError {
    fn from(error: cached_path::Error) -> Self {
        BertSumError::FileDownloadError(error.to_string())
    }
}

impl From<std::io::Error> for BertSumError {
    fn from(error: std::io::Error) -> Self {
        BertSumError::IOError(error.to_string())
    }
}

impl From<TokenizerError> for BertSumError {
    fn from(error: TokenizerError) -> Self {
        BertSumError::TokenizerError(error.to_string())
    }
}

impl From<TchError> for BertSumError {
    fn from(error: TchError) -> Self {
        BertSumError::TchError(error.to_string())
    }
}

impl From<RustBertError> for BertSumError {
    fn from(error: RustBertError) -> Self {
        BertSumError::EncoderError(error.to_string())
    }
}

impl From<serde_json::Error> for BertSumError {
    fn from(error: serde_json::Error) -> Self {
        BertSumError::SerializationError(error.to_string())
    }
}
