use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use gh_transport::{parse_rate_limit, AccessToken, HttpExec};
use http::{header, Request, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Non-success response from the REST API.
#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
}

impl GithubApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match *self {
            GithubApiError::Http { status, .. } => status,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            GithubApiError::Http { endpoint, .. } => endpoint.as_str(),
        }
    }
}

/// The three GitHub REST reads the blog needs, returning raw JSON.
#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;
    async fn get_user(&self, login: &str) -> Result<Value>;
    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Value>;
}

pub struct HttpGithubClient {
    exec: Arc<dyn HttpExec>,
    base: Url,
    user_agent: String,
    token: Option<AccessToken>,
}

impl HttpGithubClient {
    pub fn new(
        exec: Arc<dyn HttpExec>,
        api_base: &str,
        user_agent: String,
        token: Option<AccessToken>,
    ) -> Result<Self> {
        let mut base = Url::parse(api_base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            exec,
            base,
            user_agent,
            token,
        })
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, url = %url, "Dispatching GitHub request");
        let response = self.execute(url).await?;
        if let Some(rate) = parse_rate_limit(response.headers()) {
            if rate.is_exhausted() {
                warn!(
                    endpoint = %endpoint,
                    limit = rate.limit,
                    reset = %rate.reset,
                    "GitHub rate limit exhausted"
                );
            } else {
                debug!(limit = rate.limit, remaining = rate.remaining, "GitHub rate limit");
            }
        }
        let status = response.status();
        if !status.is_success() {
            return Err(GithubApiError::status(status, endpoint).into());
        }
        let value: Value = serde_json::from_slice(response.body())?;
        Ok(value)
    }

    async fn get_json_array(&self, url: Url) -> Result<Vec<Value>> {
        let value = self.get_json(url).await?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(anyhow!("expected array response")),
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn execute(&self, url: Url) -> Result<http::Response<Vec<u8>>> {
        let uri: http::Uri = url.as_str().parse()?;
        let mut builder = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, token.authorization()?);
        }
        let request = builder.body(Vec::new())?;

        self.exec.execute(request).await
    }

    fn join(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl GithubClient for HttpGithubClient {
    async fn list_open_issues(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let path = format!("repos/{owner}/{repo}/issues");
        let mut url = self.join(&path)?;
        let params = [
            ("state", "open".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json_array(url).await
    }

    async fn get_user(&self, login: &str) -> Result<Value> {
        let path = format!("users/{login}");
        let url = self.join(&path)?;
        self.get_json(url).await
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> Result<Value> {
        let path = format!("repos/{owner}/{repo}/readme");
        let url = self.join(&path)?;
        self.get_json(url).await
    }
}
