//! Error types for contract ingestion

use thiserror::Error;

/// Errors that can occur while reading a contract
#[derive(Error, Debug)]
pub enum ReaderError {
    /// File type cannot be turned into text
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A page is upside down and cannot be corrected for this format
    #[error("Rotation not supported: page {page} of {locator} is upside down")]
    RotationUnsupported {
        /// Contract locator
        locator: String,
        /// 1-based page number
        page: u32,
    },

    /// PDF could not be parsed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Text file is not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Remote contract could not be fetched
    #[error("Download failed: {0}")]
    Download(String),

    /// Local paths are disabled for this reader
    #[error("Local files are not allowed: {0}")]
    LocalPathRejected(String),

    /// Remote contract exceeds the download limit
    #[error("Download too large: {locator} exceeds {limit} bytes")]
    TooLarge {
        /// Contract locator
        locator: String,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
