use super::types::{
    Credits, Genre, GenreListResponse, MediaDetail, MediaType, PagedResponse, Title,
};
use crate::util::{validate_base_url, UrlValidationError};
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP error: status {status} from {path}")]
    HttpStatus { status: u16, path: String },
    #[error("Malformed response from {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] UrlValidationError),
}

/// Coarse failure classes: transport, status, payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Transport,
    Status,
    Malformed,
    Configuration,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::ResponseTooLarge(_) => {
                ApiErrorKind::Transport
            }
            ApiError::HttpStatus { .. } => ApiErrorKind::Status,
            ApiError::Malformed { .. } => ApiErrorKind::Malformed,
            ApiError::InvalidBaseUrl(_) => ApiErrorKind::Configuration,
        }
    }
}

/// Connection settings injected into [`CatalogClient`].
///
/// Built from the loaded configuration in `main`; tests point `base_url` at
/// a local mock server.
pub struct ApiConfig {
    pub base_url: String,
    pub language: String,
    pub token: SecretString,
    pub request_timeout: Duration,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Read-only client for the catalog REST API.
///
/// Every request is a `GET` with `Accept: application/json` and the static
/// bearer token. Responses are size-limited and parsed into the explicit
/// schemas in [`super::types`].
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    language: String,
    token: SecretString,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = validate_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(config.request_timeout)
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.base_url != super::DEFAULT_API_BASE_URL {
            tracing::info!(base_url = %base_url, "Using custom API base URL");
        }

        Ok(Self {
            http,
            base_url,
            language: config.language,
            token: config.token,
            timeout: config.request_timeout,
        })
    }

    /// `GET /genre/movie/list`
    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        let body: GenreListResponse = self.get_json("/genre/movie/list", &[]).await?;
        Ok(body.genres)
    }

    /// `GET /movie/now_playing?language=..&page=1`
    pub async fn now_playing(&self) -> Result<Vec<Title>, ApiError> {
        let query = [("language", self.language.as_str()), ("page", "1")];
        self.listing("/movie/now_playing", &query).await
    }

    /// `GET /movie/top_rated`
    pub async fn top_rated(&self) -> Result<Vec<Title>, ApiError> {
        self.listing("/movie/top_rated", &[]).await
    }

    /// `GET /movie/popular`
    pub async fn popular(&self) -> Result<Vec<Title>, ApiError> {
        self.listing("/movie/popular", &[]).await
    }

    /// `GET /tv/popular`
    pub async fn tv_popular(&self) -> Result<Vec<Title>, ApiError> {
        self.listing("/tv/popular", &[]).await
    }

    /// `GET /{media_type}/{id}?language=..`
    pub async fn detail(&self, media_type: MediaType, id: u64) -> Result<MediaDetail, ApiError> {
        let path = format!("/{}/{}", media_type.as_path(), id);
        let query = [("language", self.language.as_str())];
        let detail = match media_type {
            MediaType::Movie => MediaDetail::Movie(self.get_json(&path, &query).await?),
            MediaType::Tv => MediaDetail::Tv(self.get_json(&path, &query).await?),
        };
        Ok(detail)
    }

    /// `GET /{media_type}/{id}/credits?language=..`
    pub async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, ApiError> {
        let path = format!("/{}/{}/credits", media_type.as_path(), id);
        let query = [("language", self.language.as_str())];
        self.get_json(&path, &query).await
    }

    async fn listing(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Title>, ApiError> {
        let page: PagedResponse<Title> = self.get_json(path, query).await?;
        tracing::debug!(path, page = page.page, count = page.results.len(), "Listing fetched");
        Ok(page.results)
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&full_path);
        url.set_query(None);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query);
        tracing::debug!(url = %url, "GET");

        let request = self
            .http
            .get(url)
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json");

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))??;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Non-success status");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let bytes = read_limited_bytes(response, MAX_RESPONSE_SIZE).await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Malformed {
            path: path.to_string(),
            source,
        })
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
