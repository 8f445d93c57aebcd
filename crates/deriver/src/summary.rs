use chrono::{DateTime, Utc};
use common::text::excerpt;
use normalizer::{Author, IssueRecord, Label};
use serde::{Deserialize, Serialize};

/// Entry of `posts.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub labels: Vec<Label>,
    pub user: Author,
}

impl PostSummary {
    pub fn from_record(record: &IssueRecord, excerpt_chars: usize) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            excerpt: excerpt(record.body.as_deref(), excerpt_chars),
            created_at: record.created_at,
            updated_at: record.updated_at,
            labels: record.labels.clone(),
            user: record.user.clone(),
        }
    }

    pub fn has_label_ignore_case(&self, name: &str) -> bool {
        self.labels
            .iter()
            .any(|label| label.name.to_lowercase() == name.to_lowercase())
    }
}

pub fn summarize(published: &[&IssueRecord], excerpt_chars: usize) -> Vec<PostSummary> {
    published
        .iter()
        .map(|record| PostSummary::from_record(record, excerpt_chars))
        .collect()
}
