use std::fmt;
use std::time::Duration;

use forumsync_core::{Thread, ThreadId};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use sync_logging::{sync_debug, sync_warn};

use crate::wire::{LatestResponse, TopicDetail, TopicSummary};
use crate::{FailureKind, FetchError};

const API_KEY_HEADER: &str = "api-key";
const API_USERNAME_HEADER: &str = "api-username";

/// Limits applied to every forum request, feed and thread detail alike.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

/// Static API credentials sent as `Api-Key` / `Api-Username` headers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiCredentials {
    pub api_key: Option<String>,
    pub api_username: Option<String>,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_username", &self.api_username)
            .finish()
    }
}

/// Source of threads and their first-post HTML.
///
/// Both methods are fail-open: failures are logged and degrade to an empty
/// result so one bad request never aborts a run.
#[async_trait::async_trait]
pub trait ThreadSource: Send + Sync {
    async fn fetch_latest(&self) -> Vec<Thread>;

    async fn fetch_content(&self, thread_id: ThreadId) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct DiscourseSource {
    base_url: String,
    client: reqwest::Client,
    settings: FetchSettings,
}

impl DiscourseSource {
    pub fn new(
        base_url: &str,
        credentials: &ApiCredentials,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        reqwest::Url::parse(base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(auth_headers(credentials)?)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            settings,
        })
    }

    /// `GET {base}/latest.json`, first page only.
    pub async fn try_fetch_latest(&self) -> Result<Vec<Thread>, FetchError> {
        let url = format!("{}/latest.json", self.base_url);
        let body = self.get_json(&url).await?;
        let latest: LatestResponse = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(latest
            .topic_list
            .topics
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                match serde_json::from_value::<TopicSummary>(raw) {
                    Ok(topic) => Some(Thread::from(topic)),
                    Err(err) => {
                        sync_warn!("Skipping malformed topic #{index} in latest feed: {err}");
                        None
                    }
                }
            })
            .collect())
    }

    /// `GET {base}/t/{id}.json`, returning the first post's rendered HTML.
    pub async fn try_fetch_content(&self, thread_id: ThreadId) -> Result<String, FetchError> {
        let url = format!("{}/t/{}.json", self.base_url, thread_id);
        let body = self.get_json(&url).await?;
        let detail: TopicDetail = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        detail
            .first_post_html()
            .ok_or_else(|| FetchError::new(FailureKind::MissingContent, "post stream is empty"))
    }

    async fn get_json(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        sync_debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: Option<u64>) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl ThreadSource for DiscourseSource {
    async fn fetch_latest(&self) -> Vec<Thread> {
        match self.try_fetch_latest().await {
            Ok(threads) => threads,
            Err(err) => {
                sync_warn!("Error fetching latest threads: {err}");
                Vec::new()
            }
        }
    }

    async fn fetch_content(&self, thread_id: ThreadId) -> Option<String> {
        match self.try_fetch_content(thread_id).await {
            Ok(html) => Some(html),
            Err(err) => {
                sync_warn!("Error fetching post content for thread {thread_id}: {err}");
                None
            }
        }
    }
}

fn auth_headers(credentials: &ApiCredentials) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    if let Some(key) = credentials.api_key.as_deref() {
        let mut value = HeaderValue::from_str(key)
            .map_err(|_| FetchError::new(FailureKind::InvalidCredentials, "api key"))?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    }
    if let Some(username) = credentials.api_username.as_deref() {
        let value = HeaderValue::from_str(username)
            .map_err(|_| FetchError::new(FailureKind::InvalidCredentials, "api username"))?;
        headers.insert(HeaderName::from_static(API_USERNAME_HEADER), value);
    }
    Ok(headers)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
