use crate::config::Config;
use crate::fetcher::{
    errors::FetchError,
    pipeline::process_response,
    types::{ImageResponse, PageResponse},
};
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, Response, header};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_IMAGE_SIZE: u64 = 8 * 1024 * 1024; // 8MB
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REDIRECTS: usize = 10;

// Plenty of news sites answer 403 to anything that looks like a bot.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Single-attempt HTTP fetcher for article pages and hero images.
///
/// Holds one pooled [`Client`]; clone it freely, clones share the pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher whose requests give up after `timeout` in total.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let client = ClientBuilder::new()
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.fetch_timeout())
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<PageResponse, FetchError> {
        let response = self.get(url).await?;

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        let body_bytes = read_body(response, MAX_BODY_SIZE).await?;
        let page = process_response(final_url, body_bytes, &content_type);

        debug!(
            "Fetched {} ({} bytes, charset {:?})",
            page.url_final,
            page.body_raw.len(),
            page.charset
        );
        Ok(page)
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch_image(&self, url: &str) -> Result<ImageResponse, FetchError> {
        let response = self.get(url).await?;

        let url_final = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_string);

        if let Some(ct) = &content_type
            && !ct.trim_start().to_ascii_lowercase().starts_with("image/")
        {
            return Err(FetchError::UnsupportedContentType(ct.clone()));
        }

        let bytes = read_body(response, MAX_IMAGE_SIZE).await?;
        debug!("Fetched image {} ({} bytes)", url_final, bytes.len());

        Ok(ImageResponse {
            url_final,
            content_type,
            bytes,
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let parsed_url = Url::parse(url.trim())?;
        if !matches!(parsed_url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(parsed_url.scheme().to_string()));
        }

        let response = self
            .client
            .get(parsed_url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        Ok(response)
    }
}

async fn read_body(response: Response, limit: u64) -> Result<Bytes, FetchError> {
    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > limit
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let body = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Content-Length may be missing or lie
    if body.len() as u64 > limit {
        return Err(FetchError::BodyTooLarge(body.len() as u64));
    }

    Ok(body)
}
