pub mod client;
pub mod fetcher;

pub use client::{GithubApiError, GithubClient, HttpGithubClient};
pub use fetcher::{FetchOptions, Ingestor};
