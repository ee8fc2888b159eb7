use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::config::PortalConfig;
use crate::decode::decode_page;
use crate::page::Page;
use crate::types::PortalError;

/// The browsing capability the crawl worker consumes: "given a URL, return
/// the page". Failures are typed, never fatal to the caller by themselves.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<Page, PortalError>;

    /// Submits an HTML form and returns the page the portal lands on.
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<Page, PortalError>;
}

/// Portal session over HTTP: one cookie-holding client per crawl run.
#[derive(Debug)]
pub struct PortalClient {
    client: reqwest::Client,
    max_bytes: u64,
}

impl PortalClient {
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| PortalError::Network(err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    async fn read_page(&self, response: reqwest::Response) -> Result<Page, PortalError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::HttpStatus(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(PortalError::TooLarge {
                    max_bytes: self.max_bytes,
                });
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(PortalError::TooLarge {
                    max_bytes: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_page(&bytes, content_type.as_deref())?;
        campus_logging::campus_trace!(
            "fetched {} ({} bytes, {})",
            final_url,
            bytes.len(),
            decoded.encoding_label
        );
        Ok(Page::new(final_url, decoded.text))
    }
}

#[async_trait::async_trait]
impl PageSource for PortalClient {
    async fn fetch_page(&self, url: &str) -> Result<Page, PortalError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| PortalError::InvalidUrl(format!("{url}: {err}")))?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_page(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<Page, PortalError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| PortalError::InvalidUrl(format!("{url}: {err}")))?;
        let response = self
            .client
            .post(parsed)
            .form(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_page(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> PortalError {
    if err.is_timeout() {
        return PortalError::Timeout;
    }
    PortalError::Network(err.to_string())
}
