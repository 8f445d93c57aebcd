use std::fs;
use std::path::{Path, PathBuf};

use common::text::sha256_hex;
use common::{AppError, Result};
use normalizer::{IssueRecord, UserProfile};
use serde::Serialize;
use tracing::{info, warn};

use crate::summary::PostSummary;
use crate::tags::Tag;

pub const ALL_CONTENT_FILE: &str = "all-content.json";
pub const POSTS_FILE: &str = "posts.json";
pub const TAGS_FILE: &str = "tags.json";
pub const USER_INFO_FILE: &str = "user-info.json";

/// Everything the site reads at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSet {
    pub records: Vec<IssueRecord>,
    pub posts: Vec<PostSummary>,
    pub tags: Vec<Tag>,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
}

pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stages every document next to its target and renames them into place
    /// only once all staged writes succeeded, so a failed write leaves the
    /// previous documents untouched. A failed rename stops the run with the
    /// documents renamed before it already replaced; the staged files left
    /// over are removed and the error is returned.
    pub fn persist(&self, set: &DocumentSet) -> Result<Vec<WrittenDocument>> {
        let rendered = [
            (ALL_CONTENT_FILE, render(&set.records)?),
            (POSTS_FILE, render(&set.posts)?),
            (TAGS_FILE, render(&set.tags)?),
            (USER_INFO_FILE, render(&set.user)?),
        ];

        fs::create_dir_all(&self.dir).map_err(|err| AppError::persist(&self.dir, err))?;

        let mut staged: Vec<(PathBuf, PathBuf, &[u8])> = Vec::with_capacity(rendered.len());
        for (name, bytes) in &rendered {
            let target = self.dir.join(name);
            let tmp = self.dir.join(format!(".{name}.tmp"));
            if let Err(err) = fs::write(&tmp, bytes) {
                discard(staged.iter().map(|(tmp, _, _)| tmp.as_path()));
                let _ = fs::remove_file(&tmp);
                return Err(AppError::persist(tmp, err));
            }
            staged.push((tmp, target, bytes.as_slice()));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (position, (tmp, target, bytes)) in staged.iter().enumerate() {
            if let Err(err) = fs::rename(tmp, target) {
                discard(staged[position..].iter().map(|(tmp, _, _)| tmp.as_path()));
                return Err(AppError::persist(target, err));
            }
            let document = WrittenDocument {
                path: target.clone(),
                bytes: bytes.len(),
                sha256: sha256_hex(bytes),
            };
            info!(
                path = %document.path.display(),
                bytes = document.bytes,
                sha256 = %document.sha256,
                "wrote document"
            );
            written.push(document);
        }

        Ok(written)
    }
}

/// Pretty JSON with two-space indentation and a trailing newline.
fn render<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %err, "failed to remove staged document");
        }
    }
}
