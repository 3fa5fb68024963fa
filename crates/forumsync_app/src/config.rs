//! Run configuration: built-in defaults, then an optional RON file, then the
//! environment.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use forumsync_core::TagAllowList;
use forumsync_engine::{ApiCredentials, CommitIdentity, FetchSettings, GitTarget};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub forum: ForumConfig,
    pub tags: Vec<String>,
    pub target: TargetConfig,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    pub base_url: String,
    pub api_username: Option<String>,
    /// Prefer `DISCOURSE_API_KEY` over putting this in a file.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_response_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub repo_url: String,
    pub branch: String,
    pub content_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub committer_name: String,
    pub committer_email: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            forum: ForumConfig::default(),
            tags: ["blog", "news", "information", "feature"]
                .into_iter()
                .map(String::from)
                .collect(),
            target: TargetConfig::default(),
        }
    }
}

impl Default for ForumConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: String::new(),
            api_username: None,
            api_key: None,
            timeout_secs: fetch.request_timeout.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            max_response_bytes: fetch.max_bytes,
        }
    }
}

impl fmt::Debug for ForumConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForumConfig")
            .field("base_url", &self.base_url)
            .field("api_username", &self.api_username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            branch: "main".to_string(),
            content_dir: PathBuf::from("content/posts"),
            scratch_dir: PathBuf::from("hugo-content-temp"),
            committer_name: "Discourse Bot".to_string(),
            committer_email: "bot@localhost".to_string(),
        }
    }
}

/// Loads the configuration from `path` (if given) and the process environment.
pub fn load(path: Option<&Path>) -> anyhow::Result<SyncConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {path:?}"))?;
            SyncConfig::from_ron_str(&text)
                .with_context(|| format!("failed to parse config file {path:?}"))?
        }
        None => SyncConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

impl SyncConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Overrides fields from environment variables; empty values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = get("DISCOURSE_URL") {
            self.forum.base_url = url;
        }
        if let Some(key) = get("DISCOURSE_API_KEY") {
            self.forum.api_key = Some(key);
        }
        if let Some(username) = get("DISCOURSE_USERNAME") {
            self.forum.api_username = Some(username);
        }
        if let Some(tags) = get("FORUMSYNC_TAGS") {
            self.tags = tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(repo) = get("FORUMSYNC_REPO_URL") {
            self.target.repo_url = repo;
        }
        if let Some(branch) = get("FORUMSYNC_BRANCH") {
            self.target.branch = branch;
        }
        if let Some(dir) = get("FORUMSYNC_CONTENT_DIR") {
            self.target.content_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("FORUMSYNC_SCRATCH_DIR") {
            self.target.scratch_dir = PathBuf::from(dir);
        }
    }

    /// `publishing` is false for dry runs, which need no repository.
    pub fn validate(&self, publishing: bool) -> anyhow::Result<()> {
        if self.forum.base_url.trim().is_empty() {
            bail!("forum base URL is not configured (set DISCOURSE_URL or forum.base_url)");
        }
        url::Url::parse(&self.forum.base_url)
            .with_context(|| format!("invalid forum base URL {:?}", self.forum.base_url))?;
        if self.tags.is_empty() {
            bail!("tag allow-list is empty (set FORUMSYNC_TAGS or tags)");
        }
        if publishing {
            if self.target.repo_url.trim().is_empty() {
                bail!("target repository is not configured (set FORUMSYNC_REPO_URL or target.repo_url)");
            }
            if self.target.branch.trim().is_empty() {
                bail!("target branch is empty");
            }
            if !stays_inside(&self.target.content_dir) {
                bail!(
                    "content directory {:?} must be a relative path inside the repository",
                    self.target.content_dir
                );
            }
        }
        Ok(())
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.forum.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.forum.timeout_secs),
            max_bytes: self.forum.max_response_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials {
            api_key: self.forum.api_key.clone(),
            api_username: self.forum.api_username.clone(),
        }
    }

    pub fn allow_list(&self) -> TagAllowList {
        TagAllowList::new(self.tags.iter().cloned())
    }

    pub fn git_target(&self) -> GitTarget {
        GitTarget {
            repo_url: self.target.repo_url.clone(),
            branch: self.target.branch.clone(),
            content_dir: self.target.content_dir.clone(),
            scratch_dir: self.target.scratch_dir.clone(),
            identity: CommitIdentity {
                name: self.target.committer_name.clone(),
                email: self.target.committer_email.clone(),
            },
        }
    }
}

/// Relative, with no `..` and no root or prefix.
fn stays_inside(path: &Path) -> bool {
    path.components()
        .all(|part| matches!(part, Component::Normal(_) | Component::CurDir))
}
