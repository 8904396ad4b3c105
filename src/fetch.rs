//! # Document Fetching
//!
//! Thin network/file boundary supplying the raw forecast and buoy documents.
//!
//! ## Data Sources
//! - **Forecast**: NDBC HTML rendering of the NWS zone forecast product,
//!   e.g. `https://www.ndbc.noaa.gov/data/Forecasts/FZCA52.TJSJ.html`
//! - **Buoy**: NDBC realtime2 file (`41043.spec`) or the station page
//!   (`station_page.php?station=41043`)
//!
//! ## Error Handling
//! Every failure surfaces as a [`FetchError`]; there is no retry. The caller
//! decides what a missing document means (fallback text for the forecast, an
//! all-missing observation for the buoy).

use crate::config::FetchConfig;
use std::path::Path;
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while obtaining a raw document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, timeout, TLS, or body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Local document could not be read
    #[error("document IO: {0}")]
    Io(#[from] io::Error),
}

/// HTTP client for NDBC documents.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Fetcher { client })
    }

    /// GET `url` and return the body as text.
    ///
    /// # Example
    /// ```no_run
    /// use wave_card_lib::config::FetchConfig;
    /// use wave_card_lib::fetch::Fetcher;
    ///
    /// # async fn run() -> Result<(), wave_card_lib::fetch::FetchError> {
    /// let fetcher = Fetcher::new(&FetchConfig::default())?;
    /// let body = fetcher
    ///     .fetch("https://www.ndbc.noaa.gov/data/realtime2/41043.spec")
    ///     .await?;
    /// println!("{} bytes", body.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Fetched document");
        Ok(body)
    }
}

/// Read a previously saved document from disk.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String, FetchError> {
    let body = fs::read_to_string(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = body.len(), "Read document");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_document_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "WVHT SwH SwP SwD\nMM 4 9 ENE\n").unwrap();
        let body = read_document(file.path()).unwrap();
        assert!(body.starts_with("WVHT"));
    }

    #[test]
    fn test_read_missing_document() {
        let err = read_document("/nonexistent/41043.spec").unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
        assert!(err.to_string().starts_with("document IO"));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(Fetcher::new(&FetchConfig::default()).is_ok());
    }
}
