use std::sync::Arc;

use anyhow::{Context, Result};
use common::config::PipelineConfig;
use normalizer::models::README_PLACEHOLDER;
use normalizer::{
    decode_readme, normalize_issue, normalize_user, IssuePayload, IssueRecord, ReadmePayload,
    UserAccount, UserPayload,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::GithubClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub per_page: u32,
    /// Maximum number of issue pages requested; 1 reproduces a single-page fetch.
    pub page_limit: u32,
}

impl FetchOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            per_page: config.effective_page_size(),
            page_limit: config.page_limit(),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Fail-soft front of the GitHub client: every operation returns a usable
/// value, substituting documented defaults when the remote side fails.
pub struct Ingestor<C: GithubClient + ?Sized> {
    client: Arc<C>,
    options: FetchOptions,
}

impl<C: GithubClient + ?Sized> Ingestor<C> {
    pub fn new(client: Arc<C>, options: FetchOptions) -> Self {
        Self { client, options }
    }

    /// Open issues of `owner/repo` in API order. Empty on any failure.
    pub async fn fetch_issues(&self, owner: &str, repo: &str) -> Vec<IssueRecord> {
        info!(owner, repo, "fetching issues");
        match self.try_fetch_issues(owner, repo).await {
            Ok(records) => {
                info!(owner, repo, count = records.len(), "fetched issues");
                records
            }
            Err(err) => {
                warn!(owner, repo, error = ?err, "failed to fetch issues, continuing with none");
                Vec::new()
            }
        }
    }

    async fn try_fetch_issues(&self, owner: &str, repo: &str) -> Result<Vec<IssueRecord>> {
        let per_page = self.options.per_page;
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let issues = self
                .client
                .list_open_issues(owner, repo, page, per_page)
                .await
                .with_context(|| format!("listing issues page {page}"))?;
            let fetched = issues.len();
            debug!(page, fetched, "received issue page");
            records.extend(issues.into_iter().filter_map(decode_issue));

            if fetched < per_page as usize {
                break;
            }
            if page >= self.options.page_limit {
                if self.options.page_limit > 1 {
                    warn!(
                        owner,
                        repo,
                        pages = page,
                        "stopped at the page limit, later issues were not fetched"
                    );
                }
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    /// Profile fields for `login`, or [`UserAccount::fallback`] on failure.
    pub async fn fetch_user_profile(&self, login: &str) -> UserAccount {
        let result = async {
            let value = self.client.get_user(login).await?;
            let payload: UserPayload = serde_json::from_value(value)?;
            Ok::<_, anyhow::Error>(normalize_user(&payload))
        }
        .await;

        match result {
            Ok(account) => {
                info!(login, "fetched user profile");
                account
            }
            Err(err) => {
                warn!(login, error = ?err, "failed to fetch user profile, using defaults");
                UserAccount::fallback(login)
            }
        }
    }

    /// README of the `login/login` profile repository, or a placeholder.
    pub async fn fetch_readme(&self, login: &str) -> String {
        let result = async {
            let value = self.client.get_readme(login, login).await?;
            let payload: ReadmePayload = serde_json::from_value(value)?;
            decode_readme(&payload)
        }
        .await;

        match result {
            Ok(readme) => {
                info!(login, bytes = readme.len(), "fetched profile readme");
                readme
            }
            Err(err) => {
                warn!(login, error = ?err, "failed to fetch profile readme, using placeholder");
                README_PLACEHOLDER.to_string()
            }
        }
    }
}

fn decode_issue(value: Value) -> Option<IssueRecord> {
    let number = value.get("number").and_then(Value::as_i64);
    match serde_json::from_value::<IssuePayload>(value) {
        Ok(payload) => Some(normalize_issue(&payload)),
        Err(err) => {
            warn!(number = ?number, error = %err, "skipping malformed issue");
            None
        }
    }
}
