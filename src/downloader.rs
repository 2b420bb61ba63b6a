use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::MirrorConfig;
use crate::error::{Error, Result};

/// Issues one GET per resource with the configured header set.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(config: &MirrorConfig) -> Result<Self> {
        let client = Self::build_http_client(&config.headers, config.timeout)?;
        Ok(Self { client })
    }

    fn build_http_client(headers: &[(String, String)], timeout: Duration) -> Result<Client> {
        let client = ClientBuilder::new()
            .use_rustls_tls()
            .default_headers(Self::header_map(headers)?)
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(client)
    }

    pub(crate) fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Error::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader(format!("{}: {}", name, value)))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    /// Raw response body, for assets.
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        debug!(%url, "sending request");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Http {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let content = response.bytes().await.map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, bytes = content.len(), "response received");

        Ok(content.to_vec())
    }

    /// Response body decoded with the encoding detected from its content, for pages.
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let content = self.fetch_bytes(url).await?;
        Ok(decode_html(&content))
    }
}

/// Declared charsets are unreliable on the mirrored sites, so the bytes decide.
pub fn decode_html(content: &[u8]) -> String {
    auto_encoder::auto_encode_bytes(content)
}
