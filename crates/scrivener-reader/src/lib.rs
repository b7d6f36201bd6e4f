//! Scrivener Contract Reader
//!
//! Turns a contract locator into raw text for the extraction pipeline.
//!
//! # Supported inputs
//!
//! - Local paths and `http(s)://` URLs
//! - Plain text (`.txt`, `.md`), read as UTF-8
//! - Digital PDFs (`.pdf`), read with `lopdf`; upside-down pages are rejected
//!
//! Images and scanned PDFs without a text layer are rejected: OCR is out of
//! scope.
//!
//! # Examples
//!
//! ```no_run
//! use scrivener_reader::FileReader;
//!
//! # async fn example() -> Result<(), scrivener_reader::ReaderError> {
//! let reader = FileReader::new();
//! let text = reader.read("contracts/jane_doe.pdf").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod pdf;
mod reader;

pub use error::ReaderError;
pub use pdf::{extract_pdf_text, page_rotation};
pub use reader::{
    ContractFormat, FileReader, DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MAX_DOWNLOAD_BYTES,
};
