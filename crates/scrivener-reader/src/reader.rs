//! Contract reader for local paths and http(s) URLs

use crate::error::ReaderError;
use crate::pdf::extract_pdf_text;
use reqwest::Url;
use scrivener_domain::traits::ContractReader;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for downloading a remote contract
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Default cap on a downloaded contract (50 MiB)
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// How a contract's bytes are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// UTF-8 text (`.txt`, `.md`)
    PlainText,
    /// Digital PDF with a text layer
    Pdf,
}

impl ContractFormat {
    /// Determine the format from a file name or URL path
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for images (OCR is not available) and for
    /// unknown extensions.
    pub fn from_name(name: &str) -> Result<Self, ReaderError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "text" | "md" => Ok(ContractFormat::PlainText),
            "pdf" => Ok(ContractFormat::Pdf),
            "jpg" | "jpeg" | "png" | "tif" | "tiff" => Err(ReaderError::UnsupportedFormat(format!(
                "{} is an image; OCR is not supported",
                name
            ))),
            _ => Err(ReaderError::UnsupportedFormat(format!(
                "File type not supported: {}",
                name
            ))),
        }
    }
}

/// Reads contracts from the filesystem or over HTTP
///
/// Local paths can be disabled for readers serving untrusted callers.
#[derive(Debug, Clone)]
pub struct FileReader {
    client: reqwest::Client,
    local_files: bool,
    max_download_bytes: u64,
}

impl FileReader {
    /// Create a reader with the default download timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS))
    }

    /// Create a reader with a custom download timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            local_files: true,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        }
    }

    /// Allow or reject locators that are not http(s) URLs
    pub fn with_local_files(mut self, allowed: bool) -> Self {
        self.local_files = allowed;
        self
    }

    /// Cap the size of a downloaded contract
    pub fn with_max_download_bytes(mut self, limit: u64) -> Self {
        self.max_download_bytes = limit;
        self
    }

    /// Whether local paths are read
    pub fn allows_local_files(&self) -> bool {
        self.local_files
    }

    /// Read a contract from a local path or an http(s) URL
    ///
    /// # Errors
    ///
    /// Returns `LocalPathRejected` for a local path when local files are
    /// disabled, and `TooLarge` when a download exceeds the limit.
    pub async fn read(&self, locator: &str) -> Result<String, ReaderError> {
        match remote_url(locator) {
            Some(url) => self.read_remote(url, locator).await,
            None if self.local_files => self.read_local(locator).await,
            None => Err(ReaderError::LocalPathRejected(locator.to_string())),
        }
    }

    async fn read_local(&self, path: &str) -> Result<String, ReaderError> {
        let format = ContractFormat::from_name(path)?;
        let bytes = tokio::fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path);
        decode(format, bytes, path).await
    }

    async fn read_remote(&self, url: Url, locator: &str) -> Result<String, ReaderError> {
        let format = ContractFormat::from_name(url.path())?;

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReaderError::Download(format!("{}: {}", locator, e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReaderError::Download(format!("{}: HTTP {}", locator, status)));
        }

        let too_large = || ReaderError::TooLarge {
            locator: locator.to_string(),
            limit: self.max_download_bytes,
        };
        if response
            .content_length()
            .is_some_and(|length| length > self.max_download_bytes)
        {
            return Err(too_large());
        }

        // Content-Length may be absent or wrong, so the cap also holds while streaming
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ReaderError::Download(format!("{}: {}", locator, e)))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_download_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        info!("Downloaded {} bytes from {}", bytes.len(), locator);
        decode(format, bytes, locator).await
    }
}

impl Default for FileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractReader for FileReader {
    type Error = ReaderError;

    async fn read_contract(&self, locator: &str) -> Result<String, Self::Error> {
        self.read(locator).await
    }
}

fn remote_url(locator: &str) -> Option<Url> {
    Url::parse(locator)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

async fn decode(format: ContractFormat, bytes: Vec<u8>, locator: &str) -> Result<String, ReaderError> {
    match format {
        ContractFormat::PlainText => {
            String::from_utf8(bytes).map_err(|e| ReaderError::Encoding(format!("{}: {}", locator, e)))
        }
        ContractFormat::Pdf => {
            // Parsing is CPU bound
            let locator = locator.to_string();
            tokio::task::spawn_blocking(move || extract_pdf_text(&bytes, &locator))
                .await
                .map_err(|e| ReaderError::Pdf(format!("Task join error: {}", e)))?
        }
    }
}
