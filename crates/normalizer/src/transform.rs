use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_ENGINE, Engine as _};

use crate::models::{profile_url, Author, IssueRecord, Label, UserAccount, PLACEHOLDER_AVATAR_URL};
use crate::payloads::{IssuePayload, ReadmePayload, UserPayload};

pub fn normalize_issue(payload: &IssuePayload) -> IssueRecord {
    IssueRecord {
        id: payload.number,
        title: payload.title.clone(),
        body: payload.body.clone(),
        created_at: payload.created_at,
        updated_at: payload.updated_at,
        labels: payload
            .labels
            .iter()
            .map(|label| Label {
                name: label.name.clone(),
            })
            .collect(),
        user: Author {
            login: payload.user.login.clone(),
            avatar_url: payload.user.avatar_url.clone(),
        },
    }
}

pub fn normalize_user(payload: &UserPayload) -> UserAccount {
    let login = payload.login.clone();
    UserAccount {
        name: non_empty(payload.name.as_deref()).unwrap_or_else(|| login.clone()),
        avatar_url: non_empty(payload.avatar_url.as_deref())
            .unwrap_or_else(|| PLACEHOLDER_AVATAR_URL.to_string()),
        html_url: non_empty(payload.html_url.as_deref()).unwrap_or_else(|| profile_url(&login)),
        bio: payload.bio.clone().unwrap_or_default(),
        blog: payload.blog.clone().unwrap_or_default(),
        location: payload.location.clone().unwrap_or_default(),
        company: payload.company.clone().unwrap_or_default(),
        twitter_username: payload.twitter_username.clone().unwrap_or_default(),
        public_repos: payload.public_repos.unwrap_or(0),
        followers: payload.followers.unwrap_or(0),
        following: payload.following.unwrap_or(0),
        login,
    }
}

/// Decodes README content. The API wraps base64 at 60 columns, so line
/// breaks are dropped before decoding.
pub fn decode_readme(payload: &ReadmePayload) -> Result<String> {
    match payload.encoding.as_deref() {
        None | Some("base64") => {}
        Some(other) => return Err(anyhow!("unsupported readme encoding {other}")),
    }

    let compact: String = payload
        .content
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    let decoded = BASE64_ENGINE
        .decode(compact)
        .context("readme content is not valid base64")?;
    String::from_utf8(decoded).context("readme content is not valid utf-8")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn issue_normalization_keeps_label_order() {
        let payload: IssuePayload = serde_json::from_value(json!({
            "number": 7,
            "title": "Notes",
            "body": null,
            "state": "open",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "labels": [{"id": 1, "name": "Release"}, {"id": 2, "name": "rust"}],
            "user": {"login": "alice", "avatar_url": "https://avatars/alice", "id": 9}
        }))
        .unwrap();
        let record = normalize_issue(&payload);
        assert_eq!(record.id, 7);
        assert!(record.body.is_none());
        let names: Vec<_> = record.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Release", "rust"]);
        assert!(record.has_label("Release"));
        assert!(!record.has_label("release"));
        assert_eq!(record.user.login, "alice");
    }

    #[test]
    fn user_normalization_fills_defaults() {
        let payload: UserPayload = serde_json::from_value(json!({
            "login": "alice",
            "name": null,
            "avatar_url": "https://avatars/alice",
            "html_url": "https://github.com/alice",
            "bio": "Writes things",
            "followers": 12
        }))
        .unwrap();
        let account = normalize_user(&payload);
        assert_eq!(account.name, "alice");
        assert_eq!(account.bio, "Writes things");
        assert_eq!(account.blog, "");
        assert_eq!(account.followers, 12);
        assert_eq!(account.following, 0);
        assert_eq!(account.public_repos, 0);
    }

    #[test]
    fn readme_decodes_wrapped_base64() {
        let payload = ReadmePayload {
            content: "IyBIZWxs\nbyB3b3Js\nZA==\n".into(),
            encoding: Some("base64".into()),
        };
        assert_eq!(decode_readme(&payload).unwrap(), "# Hello world");
    }

    #[test]
    fn readme_rejects_bad_input() {
        let garbage = ReadmePayload {
            content: "***not base64***".into(),
            encoding: Some("base64".into()),
        };
        assert!(decode_readme(&garbage).is_err());

        let unknown = ReadmePayload {
            content: "IyBIZWxsbw==".into(),
            encoding: Some("utf-16".into()),
        };
        assert!(decode_readme(&unknown).is_err());
    }

    #[test]
    fn profile_document_flattens_account() {
        let profile = UserAccount::fallback("ghost").with_readme("# Hi");
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["login"], "ghost");
        assert_eq!(value["name"], "ghost");
        assert_eq!(value["public_repos"], 0);
        assert_eq!(value["readme_content"], "# Hi");
        assert!(value.get("account").is_none());
    }
}
