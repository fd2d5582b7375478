use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::debug;

use crate::model::{Page, UserRecord};

pub const DEFAULT_BASE_URL: &str = "https://randomuser.me/api/";
pub const DEFAULT_FIELDS: &str = "name,email,location,picture,phone,cell,dob";
pub const DEFAULT_SEED: &str = "abc";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

// Pages are reported 1-based, matching the `page=` query parameter.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request for page {page} failed: {source}")]
    Request {
        page: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("page {page} returned HTTP {status}")]
    Status {
        page: usize,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode page {page}: {source}")]
    Decode {
        page: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL {url}: {message}")]
    BaseUrl { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("invalid proxy {proxy}: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    Build {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ClientSettings {
    pub base_url: String,
    pub fields: String,
    pub seed: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fields: DEFAULT_FIELDS.to_string(),
            seed: DEFAULT_SEED.to_string(),
        }
    }
}

/// Read-only client for the randomuser.me query endpoint.
#[derive(Clone, Debug)]
pub struct UserApi {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl UserApi {
    pub fn new(http: reqwest::Client, settings: ClientSettings) -> Self {
        Self { http, settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// URL for request `index` (0-based) asking for `size` records.
    pub fn page_url(&self, index: usize, size: usize) -> Result<Url, ApiError> {
        page_url(&self.settings, index, size)
    }

    pub async fn fetch_page(&self, index: usize, size: usize) -> Result<Vec<UserRecord>, ApiError> {
        let page = index + 1;
        let url = self.page_url(index, size)?;
        debug!(page, size, %url, "fetching page");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Request { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { page, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request { page, source })?;
        let decoded = decode_page(&body).map_err(|source| ApiError::Decode { page, source })?;
        debug!(page, records = decoded.len(), "page decoded");
        Ok(decoded)
    }
}

/// Appends the query for request `index` to the base URL, keeping any query
/// the base already carries. Every value is form-encoded.
pub fn page_url(settings: &ClientSettings, index: usize, size: usize) -> Result<Url, ApiError> {
    let mut url = Url::parse(&settings.base_url).map_err(|e| ApiError::BaseUrl {
        url: settings.base_url.clone(),
        message: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("inc", &settings.fields)
        .append_pair("results", &size.to_string())
        .append_pair("seed", &settings.seed)
        .append_pair("page", &(index + 1).to_string())
        .append_key_only("noinfo");
    Ok(url)
}

pub fn decode_page(body: &[u8]) -> Result<Vec<UserRecord>, serde_json::Error> {
    serde_json::from_slice::<Page<UserRecord>>(body).map(|p| p.results)
}

pub fn build_http_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
) -> Result<reqwest::Client, HttpClientError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(DEFAULT_USER_AGENT),
    );

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(30));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout);

    // only an explicitly configured proxy is used, never the environment's
    builder = match proxy.filter(|p| !p.trim().is_empty()) {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy).map_err(|source| HttpClientError::Proxy {
                proxy: proxy.to_string(),
                source,
            })?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder
        .build()
        .map_err(|source| HttpClientError::Build { source })
}
