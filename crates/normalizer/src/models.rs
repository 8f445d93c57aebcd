use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_AVATAR_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";

pub const README_PLACEHOLDER: &str = "# About me\nNo bio yet.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
}

/// An issue as persisted in the full record dump. `id` is the issue number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    pub id: i64,
    pub title: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub labels: Vec<Label>,
    pub user: Author,
}

impl IssueRecord {
    /// Exact, case-sensitive label match.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAccount {
    pub login: String,
    pub name: String,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: String,
    pub blog: String,
    pub location: String,
    pub company: String,
    pub twitter_username: String,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
}

impl UserAccount {
    /// Stand-in used when the profile cannot be fetched.
    pub fn fallback(login: &str) -> Self {
        Self {
            login: login.to_string(),
            name: login.to_string(),
            avatar_url: PLACEHOLDER_AVATAR_URL.to_string(),
            html_url: profile_url(login),
            bio: String::new(),
            blog: String::new(),
            location: String::new(),
            company: String::new(),
            twitter_username: String::new(),
            public_repos: 0,
            followers: 0,
            following: 0,
        }
    }

    pub fn with_readme(self, readme_content: impl Into<String>) -> UserProfile {
        UserProfile {
            account: self,
            readme_content: readme_content.into(),
        }
    }
}

/// The `user-info.json` document: account fields plus the profile README.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(flatten)]
    pub account: UserAccount,
    pub readme_content: String,
}

impl UserProfile {
    pub fn fallback(login: &str) -> Self {
        UserAccount::fallback(login).with_readme(README_PLACEHOLDER)
    }
}

pub fn profile_url(login: &str) -> String {
    format!("https://github.com/{login}")
}
