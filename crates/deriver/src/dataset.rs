use std::fs;
use std::path::Path;

use anyhow::Context;
use common::{AppError, Result};
use normalizer::{IssueRecord, UserProfile};
use serde::de::DeserializeOwned;

use crate::store::{ALL_CONTENT_FILE, POSTS_FILE, TAGS_FILE, USER_INFO_FILE};
use crate::summary::PostSummary;
use crate::tags::Tag;

/// Read side of the persisted documents, answering the lookups the page
/// layer performs.
#[derive(Debug, Clone)]
pub struct Dataset {
    marker: String,
    records: Vec<IssueRecord>,
    posts: Vec<PostSummary>,
    tags: Vec<Tag>,
    user: UserProfile,
}

impl Dataset {
    pub fn load(dir: impl AsRef<Path>, marker: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref();
        Ok(Self {
            marker: marker.into(),
            records: read_document(&dir.join(ALL_CONTENT_FILE))?,
            posts: read_document(&dir.join(POSTS_FILE))?,
            tags: read_document(&dir.join(TAGS_FILE))?,
            user: read_document(&dir.join(USER_INFO_FILE))?,
        })
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// Full record for a published post; unpublished ids are not exposed.
    pub fn post(&self, id: i64) -> Option<&IssueRecord> {
        self.records
            .iter()
            .find(|record| record.id == id && record.has_label(&self.marker))
    }

    pub fn posts_tagged(&self, tag: &str) -> Vec<&PostSummary> {
        self.posts
            .iter()
            .filter(|post| post.has_label_ignore_case(tag))
            .collect()
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|err| AppError::load(path, err))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", path.display()))
        .map_err(AppError::decode)
}
