pub mod dataset;
pub mod markdown;
pub mod publish;
pub mod store;
pub mod summary;
pub mod tags;

pub use dataset::Dataset;
pub use markdown::{export_markdown, write_markdown, MarkdownPost, SourceRepo};
pub use publish::select_published;
pub use store::{DocumentSet, DocumentStore, WrittenDocument};
pub use summary::{summarize, PostSummary};
pub use tags::{aggregate_tags, Tag};
