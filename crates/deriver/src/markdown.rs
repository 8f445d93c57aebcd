use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use common::text::sha256_hex;
use common::{AppError, Result};
use normalizer::IssueRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::store::WrittenDocument;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("invalid regex"));
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("invalid regex"));

/// A published post rendered as a static-site Markdown page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownPost {
    pub file_name: String,
    pub content: String,
}

/// Repository the posts were fetched from; used for the front matter and the
/// link back to each issue.
#[derive(Debug, Clone, Copy)]
pub struct SourceRepo<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
}

impl SourceRepo<'_> {
    pub fn issue_url(&self, number: i64) -> String {
        format!("https://github.com/{}/{}/issues/{number}", self.owner, self.repo)
    }
}

pub fn export_markdown(published: &[&IssueRecord], source: SourceRepo<'_>) -> Vec<MarkdownPost> {
    published
        .iter()
        .map(|record| render_post_markdown(record, source))
        .collect()
}

/// Front matter (title, date, author, issue number, repo, tags), the body
/// verbatim, then a link back to the issue.
pub fn render_post_markdown(record: &IssueRecord, source: SourceRepo<'_>) -> MarkdownPost {
    let mut content = String::from("---\n");
    let _ = writeln!(content, "title: \"{}\"", quote(&record.title));
    let _ = writeln!(content, "date: {}", record.created_at.format(DATE_FORMAT));
    let _ = writeln!(content, "author: {}", record.user.login);
    let _ = writeln!(content, "issue_number: {}", record.id);
    let _ = writeln!(content, "repo: \"{}/{}\"", source.owner, source.repo);
    if !record.labels.is_empty() {
        content.push_str("tags:\n");
        for label in &record.labels {
            let _ = writeln!(content, "    - {}", label.name);
        }
    }
    content.push_str("---\n\n");
    content.push_str(record.body.as_deref().unwrap_or_default());
    let _ = write!(
        content,
        "\n\n---\n\n[View original issue]({})",
        source.issue_url(record.id)
    );

    MarkdownPost {
        file_name: format!("{}-{}-{}.md", source.repo, record.id, slugify(&record.title)),
        content,
    }
}

/// Lower-cased title with punctuation dropped and whitespace or hyphen runs
/// collapsed to a single `-`.
pub fn slugify(title: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(title, "");
    SEPARATOR_RUNS
        .replace_all(&cleaned.trim().to_lowercase(), "-")
        .into_owned()
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Writes each page into `dir`, replacing same-named files. Pages of posts
/// that are no longer published are left in place.
pub fn write_markdown(dir: &Path, posts: &[MarkdownPost]) -> Result<Vec<WrittenDocument>> {
    fs::create_dir_all(dir).map_err(|err| AppError::persist(dir, err))?;

    let mut written = Vec::with_capacity(posts.len());
    for post in posts {
        let path: PathBuf = dir.join(&post.file_name);
        fs::write(&path, &post.content).map_err(|err| AppError::persist(&path, err))?;
        let document = WrittenDocument {
            bytes: post.content.len(),
            sha256: sha256_hex(post.content.as_bytes()),
            path,
        };
        info!(
            path = %document.path.display(),
            bytes = document.bytes,
            "wrote markdown page"
        );
        written.push(document);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use normalizer::{Author, Label};

    const SOURCE: SourceRepo<'static> = SourceRepo {
        owner: "alice",
        repo: "notes",
    };

    fn record(id: i64, title: &str, labels: &[&str], body: Option<&str>) -> IssueRecord {
        IssueRecord {
            id,
            title: title.into(),
            body: body.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
            labels: labels
                .iter()
                .map(|name| Label {
                    name: name.to_string(),
                })
                .collect(),
            user: Author {
                login: "alice".into(),
                avatar_url: String::new(),
            },
        }
    }

    #[test]
    fn page_has_front_matter_body_and_issue_link() {
        let post = render_post_markdown(
            &record(12, "Hello, World!", &["Release", "go"], Some("# Hi\nthere")),
            SOURCE,
        );
        assert_eq!(post.file_name, "notes-12-hello-world.md");
        assert_eq!(
            post.content,
            "---\n\
             title: \"Hello, World!\"\n\
             date: 2024-03-09 14:05:07\n\
             author: alice\n\
             issue_number: 12\n\
             repo: \"alice/notes\"\n\
             tags:\n    - Release\n    - go\n\
             ---\n\n\
             # Hi\nthere\
             \n\n---\n\n[View original issue](https://github.com/alice/notes/issues/12)"
        );
    }

    #[test]
    fn missing_body_and_labels_still_render() {
        let post = render_post_markdown(&record(3, "Empty", &[], None), SOURCE);
        assert!(!post.content.contains("tags:"));
        assert!(post
            .content
            .contains("repo: \"alice/notes\"\n---\n\n\n\n---\n\n[View original issue]"));
    }

    #[test]
    fn quotes_in_titles_are_escaped() {
        let post = render_post_markdown(&record(4, r#"Say "hi" \o/"#, &[], None), SOURCE);
        assert!(post.content.contains(r#"title: "Say \"hi\" \\o/""#));
        assert_eq!(post.file_name, "notes-4-say-hi-o.md");
    }

    #[test]
    fn slugs_collapse_separators_and_keep_unicode_words() {
        assert_eq!(slugify("  Rust -- async   notes  "), "rust-async-notes");
        assert_eq!(slugify("Déjà vu: 笔记!"), "déjà-vu-笔记");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn pages_are_written_under_their_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("releases");
        let records = [
            record(1, "One", &["Release"], Some("a")),
            record(2, "Two", &["Release"], None),
        ];
        let published: Vec<_> = records.iter().collect();
        let posts = export_markdown(&published, SOURCE);

        let written = write_markdown(&out, &posts).unwrap();
        assert_eq!(written.len(), 2);
        for (document, post) in written.iter().zip(&posts) {
            assert_eq!(document.path, out.join(&post.file_name));
            assert_eq!(fs::read_to_string(&document.path).unwrap(), post.content);
            assert_eq!(document.sha256, sha256_hex(post.content.as_bytes()));
        }
    }

    #[test]
    fn unwritable_directory_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("releases");
        fs::write(&blocker, b"file").unwrap();
        let posts = [render_post_markdown(&record(1, "One", &[], None), SOURCE)];
        assert!(write_markdown(&blocker, &posts).unwrap_err().is_persist());
    }
}
