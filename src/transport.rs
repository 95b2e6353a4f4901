use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use crate::error::DownloaderError;

pub type Body = Box<dyn Read + Send>;

/// Single-shot GET. Implementations never retry.
pub trait Transport: Send + Sync {
    fn fetch(&self, url: &str, authorization: Option<&str>) -> Result<Body, DownloaderError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, DownloaderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "migration-downloader/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .map_err(|err| DownloaderError::InvalidConfig(err.to_string()))?,
        );
        // The archive blob is large, so only the connect phase is bounded.
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| DownloaderError::Transport {
                url: String::new(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }

    fn handle_status(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, DownloaderError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "request failed".to_string());
        Err(DownloaderError::HttpStatus {
            url: url.to_string(),
            status,
            message,
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, authorization: Option<&str>) -> Result<Body, DownloaderError> {
        let mut request = self.client.get(url);
        if let Some(value) = authorization {
            let value =
                HeaderValue::from_str(value).map_err(|err| DownloaderError::Transport {
                    url: url.to_string(),
                    message: format!("invalid authorization header: {err}"),
                })?;
            request = request.header(AUTHORIZATION, value);
        }
        tracing::debug!(url, "sending request");
        let response = request.send().map_err(|err| DownloaderError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        let response = Self::handle_status(url, response)?;
        Ok(Box::new(response))
    }
}

/// Value of the `Authorization` header expected by the BioPortal REST API.
pub fn bioportal_authorization(api_key: &str) -> String {
    format!("apikey token={api_key}")
}
