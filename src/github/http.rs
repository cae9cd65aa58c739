//! HTTP wrapper for the GitHub REST API: auth headers, status mapping, Link headers

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, ACCEPT, LINK};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

use crate::github::client::GitHubClientConfig;
use crate::github::response::{ApiErrorBody, GitHubError};

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";

/// A decoded response body with the pagination links that came with it
#[derive(Debug)]
pub struct Page<T> {
    pub body: T,
    pub links: HashMap<String, String>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.links.contains_key("next")
    }

    /// Page number of the `rel="last"` link, if any
    pub fn last_page(&self) -> Option<u64> {
        self.links.get("last").and_then(|url| page_param(url))
    }
}

/// HTTP client for GitHub operations
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &GitHubClientConfig) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Build a GET request with GitHub headers and bearer auth when a token is set
    fn build_request(&self, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let mut req = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query);

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        req
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, GitHubError> {
        debug!("GET {} {:?}", path, query);
        let resp = self.execute(self.build_request(path, query), path).await?;

        let links = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes).map_err(|e| GitHubError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        Ok(Page { body, links })
    }

    /// Send a request and map error statuses
    async fn execute(&self, req: RequestBuilder, path: &str) -> Result<Response, GitHubError> {
        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let headers = resp.headers().clone();
        let text = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        warn!("GitHub request {} failed with {}: {}", path, status, message);

        Err(match status {
            StatusCode::UNAUTHORIZED => GitHubError::Unauthorized(message),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS if is_rate_limited(status, &headers) => {
                GitHubError::RateLimited {
                    reset: rate_limit_reset(&headers),
                }
            }
            StatusCode::NOT_FOUND => GitHubError::NotFound(path.to_string()),
            status => GitHubError::Status {
                status: status.as_u16(),
                message,
            },
        })
    }
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    let exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    exhausted || status == StatusCode::TOO_MANY_REQUESTS
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Parse an RFC 8288 `Link` header into `rel -> url`
pub fn parse_link_header(value: &str) -> HashMap<String, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("link regex is valid")
    });

    re.captures_iter(value)
        .map(|caps| (caps[2].to_string(), caps[1].to_string()))
        .collect()
}

fn page_param(url: &str) -> Option<u64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[?&]page=(\d+)").expect("page regex is valid"));
    re.captures(url).and_then(|caps| caps[1].parse().ok())
}
