use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<LabelPayload>,
    pub user: UserRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelPayload {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub bio: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub twitter_username: Option<String>,
    pub public_repos: Option<u64>,
    pub followers: Option<u64>,
    pub following: Option<u64>,
}

/// Body of `GET repos/{owner}/{repo}/readme`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmePayload {
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}
