use std::sync::Arc;

use common::config::{AppConfig, GithubConfig, PipelineConfig};
use common::Result;
use deriver::{
    aggregate_tags, export_markdown, select_published, summarize, write_markdown, DocumentSet,
    DocumentStore, SourceRepo, WrittenDocument,
};
use ingestor::{FetchOptions, GithubClient, Ingestor};
use normalizer::{IssueRecord, UserProfile};
use tracing::{info, instrument, warn};

/// Everything fetched from GitHub in one run, before any derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub records: Vec<IssueRecord>,
    pub user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub issues: usize,
    pub published: usize,
    pub tags: usize,
    pub documents: Vec<WrittenDocument>,
    /// Markdown pages, empty unless `pipeline.markdown_dir` is set.
    pub pages: Vec<WrittenDocument>,
}

pub struct Pipeline<C: GithubClient + ?Sized> {
    ingestor: Ingestor<C>,
    github: GithubConfig,
    settings: PipelineConfig,
    store: DocumentStore,
}

impl<C: GithubClient + ?Sized> Pipeline<C> {
    pub fn new(client: Arc<C>, config: &AppConfig) -> Self {
        Self {
            ingestor: Ingestor::new(client, FetchOptions::from_config(&config.pipeline)),
            github: config.github.clone(),
            settings: config.pipeline.clone(),
            store: DocumentStore::new(config.pipeline.output_dir.clone()),
        }
    }

    /// Issues, profile and README are independent and fetched concurrently.
    pub async fn fetch(&self) -> Snapshot {
        let login = self.github.profile_login();
        let (records, account, readme) = tokio::join!(
            self.ingestor.fetch_issues(&self.github.owner, &self.github.repo),
            self.ingestor.fetch_user_profile(login),
            self.ingestor.fetch_readme(login),
        );
        Snapshot {
            records,
            user: account.with_readme(readme),
        }
    }

    pub fn derive(&self, snapshot: Snapshot) -> DocumentSet {
        derive_documents(
            snapshot,
            &self.settings.release_label,
            self.settings.excerpt_chars,
        )
    }

    /// Published records as Markdown pages, written only when an export
    /// directory is configured.
    pub fn export(&self, documents: &DocumentSet) -> Result<Vec<WrittenDocument>> {
        let Some(dir) = &self.settings.markdown_dir else {
            return Ok(Vec::new());
        };
        let published = select_published(&documents.records, &self.settings.release_label);
        let source = SourceRepo {
            owner: &self.github.owner,
            repo: &self.github.repo,
        };
        write_markdown(dir, &export_markdown(&published, source))
    }

    /// Fetch, derive and persist. Only persistence failures are returned.
    #[instrument(skip(self), fields(owner = %self.github.owner, repo = %self.github.repo))]
    pub async fn run(&self) -> Result<RunReport> {
        let snapshot = self.fetch().await;
        if snapshot.records.is_empty() {
            warn!("no issues fetched, writing empty collections");
        }

        let documents = self.derive(snapshot);
        let report = RunReport {
            issues: documents.records.len(),
            published: documents.posts.len(),
            tags: documents.tags.len(),
            documents: self.store.persist(&documents)?,
            pages: self.export(&documents)?,
        };
        info!(
            issues = report.issues,
            published = report.published,
            tags = report.tags,
            pages = report.pages.len(),
            marker = %self.settings.release_label,
            dir = %self.store.dir().display(),
            "prebuild data written"
        );
        Ok(report)
    }
}

/// Pure derivation of the four documents from a snapshot.
pub fn derive_documents(snapshot: Snapshot, marker: &str, excerpt_chars: usize) -> DocumentSet {
    let Snapshot { records, user } = snapshot;
    let published = select_published(&records, marker);
    let posts = summarize(&published, excerpt_chars);
    let tags = aggregate_tags(&published, marker);

    DocumentSet {
        records,
        posts,
        tags,
        user,
    }
}
