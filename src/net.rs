//! Blocking HTTP downloads.
//!
//! Every request runs to completion on the calling thread. No timeout is
//! configured, so a stalled server stalls the run.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{ProvisionError, Result};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("devsetup/", env!("CARGO_PKG_VERSION"));

/// Source of remote files.
pub trait Downloader {
    /// Fetches the full body of `url`.
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetches `url` as text.
    fn get_text(&self, url: &str) -> Result<String> {
        let bytes = self.get_bytes(url)?;
        String::from_utf8(bytes).map_err(|e| ProvisionError::InvalidResponse {
            url: url.to_string(),
            message: format!("body is not UTF-8: {}", e),
        })
    }

    /// Downloads `url` into `dest`, returning the number of bytes written.
    fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let bytes = self.get_bytes(url)?;
        fs::write(dest, &bytes).map_err(|e| ProvisionError::io(dest, e))?;
        Ok(bytes.len() as u64)
    }
}

/// reqwest-backed downloader.
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    /// Creates a client with no request timeout.
    ///
    /// # Errors
    /// Returns `Network` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ProvisionError::Network {
                url: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// Returns the underlying client for API callers.
    #[must_use]
    pub fn inner(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    /// Sends a GET and checks the status.
    fn send(&self, url: &str) -> Result<reqwest::blocking::Response> {
        if url.is_empty() {
            return Err(ProvisionError::InvalidResponse {
                url: String::new(),
                message: "empty URL".to_string(),
            });
        }

        debug!("GET {}", url);
        let start = Instant::now();

        let response = self.client.get(url).send().map_err(|e| {
            debug!("HTTP request failed: {}", e);
            network_error(url, &e)
        })?;

        let status = response.status();
        debug!("Response: {} in {:?}", status, start.elapsed());

        if !status.is_success() {
            return Err(ProvisionError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

impl Downloader for HttpClient {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url)?;
        let bytes = response.bytes().map_err(|e| network_error(url, &e))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        let start = Instant::now();
        let mut response = self.send(url)?;

        let mut file = fs::File::create(dest).map_err(|e| ProvisionError::io(dest, e))?;
        let written = response
            .copy_to(&mut file)
            .map_err(|e| network_error(url, &e))?;

        info!(
            "Downloaded {} bytes to {} in {:?}",
            written,
            dest.display(),
            start.elapsed()
        );
        Ok(written)
    }
}

/// Converts a reqwest error into a `Network` error for `url`.
pub(crate) fn network_error(url: &str, err: &reqwest::Error) -> ProvisionError {
    ProvisionError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Canned {
        body: Vec<u8>,
        calls: RefCell<Vec<String>>,
    }

    impl Downloader for Canned {
        fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    #[test]
    fn test_default_download_to_writes_body() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("font.ttf");
        let canned = Canned {
            body: b"glyphs".to_vec(),
            calls: RefCell::new(Vec::new()),
        };

        let written = canned.download_to("https://x/font.ttf", &dest).unwrap();
        assert_eq!(written, 6);
        assert_eq!(fs::read(&dest).unwrap(), b"glyphs");
        assert_eq!(canned.calls.borrow().as_slice(), ["https://x/font.ttf"]);
    }

    #[test]
    fn test_get_text_rejects_invalid_utf8() {
        let canned = Canned {
            body: vec![0xff, 0xfe, 0x00],
            calls: RefCell::new(Vec::new()),
        };
        let err = canned.get_text("https://x/list.txt").unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidResponse { .. }));
    }

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn test_empty_url_is_an_error() {
        let http = HttpClient::new().unwrap();
        let err = http.get_bytes("").unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidResponse { .. }));
    }
}
