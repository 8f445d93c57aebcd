use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_sources(
            path,
            Environment::default().separator("__").try_parsing(true),
            &LegacyEnv::from_process(),
        )
    }

    /// Layers `config/default`, `config/local`, the given environment source
    /// and finally the legacy variable names, later sources winning.
    pub fn from_sources<P: AsRef<Path>>(
        path: P,
        environment: Environment,
        legacy: &LegacyEnv,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(environment)
            .set_override_option("github.owner", legacy.repo_owner.clone())?
            .set_override_option("github.repo", legacy.repo_name.clone())?
            .set_override_option("github.profile_login", legacy.github_username.clone())?
            .set_override_option("github.token", legacy.github_token.clone())?
            .build()?
            .try_deserialize()
    }
}

/// The flat variable names used by existing deployments
/// (`REPO_OWNER`, `REPO_NAME`, `GITHUB_USERNAME`, `GITHUB_TOKEN`).
#[derive(Debug, Clone, Default)]
pub struct LegacyEnv {
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub github_username: Option<String>,
    pub github_token: Option<String>,
}

impl LegacyEnv {
    pub fn from_process() -> Self {
        Self {
            repo_owner: non_empty_var("REPO_OWNER"),
            repo_name: non_empty_var("REPO_NAME"),
            github_username: non_empty_var("GITHUB_USERNAME"),
            github_token: non_empty_var("GITHUB_TOKEN"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "GithubConfig::default_owner")]
    pub owner: String,
    #[serde(default = "GithubConfig::default_repo")]
    pub repo: String,
    #[serde(default)]
    pub profile_login: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "GithubConfig::default_user_agent")]
    pub user_agent: String,
    #[serde(default = "GithubConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "GithubConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: Self::default_owner(),
            repo: Self::default_repo(),
            profile_login: None,
            token: None,
            user_agent: Self::default_user_agent(),
            api_base: Self::default_api_base(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    fn default_owner() -> String {
        "luyanfcp".to_string()
    }

    fn default_repo() -> String {
        "note-snippet".to_string()
    }

    fn default_user_agent() -> String {
        "issue-blog-prebuild".to_string()
    }

    fn default_api_base() -> String {
        "https://api.github.com/".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    /// Account whose profile and profile README are published; the repository
    /// owner unless configured otherwise.
    pub fn profile_login(&self) -> &str {
        self.profile_login
            .as_deref()
            .filter(|login| !login.is_empty())
            .unwrap_or(&self.owner)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "PipelineConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "PipelineConfig::default_release_label")]
    pub release_label: String,
    #[serde(default = "PipelineConfig::default_page_size")]
    pub page_size: u32,
    #[serde(default = "PipelineConfig::default_paginate")]
    pub paginate: bool,
    #[serde(default = "PipelineConfig::default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "PipelineConfig::default_excerpt_chars")]
    pub excerpt_chars: usize,
    /// When set, every published post is also exported as a Markdown page
    /// into this directory.
    #[serde(default)]
    pub markdown_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            release_label: Self::default_release_label(),
            page_size: Self::default_page_size(),
            paginate: Self::default_paginate(),
            max_pages: Self::default_max_pages(),
            excerpt_chars: Self::default_excerpt_chars(),
            markdown_dir: None,
        }
    }
}

impl PipelineConfig {
    pub const MAX_PAGE_SIZE: u32 = 100;

    fn default_output_dir() -> PathBuf {
        PathBuf::from("src/data")
    }

    fn default_release_label() -> String {
        "Release".to_string()
    }

    const fn default_page_size() -> u32 {
        100
    }

    const fn default_paginate() -> bool {
        true
    }

    const fn default_max_pages() -> u32 {
        50
    }

    const fn default_excerpt_chars() -> usize {
        200
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, Self::MAX_PAGE_SIZE)
    }

    /// Upper bound on issue pages requested per run; 1 when pagination is off.
    pub fn page_limit(&self) -> u32 {
        if self.paginate {
            self.max_pages.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(pairs: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::default()
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn defaults_apply_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            AppConfig::from_sources(dir.path(), environment(&[]), &LegacyEnv::default()).unwrap();
        assert_eq!(config.github.owner, "luyanfcp");
        assert_eq!(config.github.repo, "note-snippet");
        assert_eq!(config.github.profile_login(), "luyanfcp");
        assert!(config.github.token().is_none());
        assert_eq!(config.pipeline.release_label, "Release");
        assert_eq!(config.pipeline.output_dir, PathBuf::from("src/data"));
        assert_eq!(config.pipeline.effective_page_size(), 100);
        assert_eq!(config.pipeline.page_limit(), 50);
        assert!(config.pipeline.markdown_dir.is_none());
    }

    #[test]
    fn nested_environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(
            dir.path().join("config/default.toml"),
            "[github]\nowner = \"from-file\"\nrepo = \"notes\"\n\n[pipeline]\npaginate = false\n",
        )
        .unwrap();

        let config = AppConfig::from_sources(
            dir.path(),
            environment(&[
                ("GITHUB__OWNER", "from-env"),
                ("PIPELINE__PAGE_SIZE", "500"),
                ("PIPELINE__MARKDOWN_DIR", "content/releases"),
            ]),
            &LegacyEnv::default(),
        )
        .unwrap();
        assert_eq!(config.github.owner, "from-env");
        assert_eq!(config.github.repo, "notes");
        assert_eq!(config.pipeline.effective_page_size(), 100);
        assert_eq!(config.pipeline.page_limit(), 1);
        assert_eq!(
            config.pipeline.markdown_dir,
            Some(PathBuf::from("content/releases"))
        );
    }

    #[test]
    fn legacy_variables_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = LegacyEnv {
            repo_owner: Some("alice".into()),
            repo_name: Some("blog".into()),
            github_username: Some("alice-profile".into()),
            github_token: Some("secret".into()),
        };
        let config = AppConfig::from_sources(
            dir.path(),
            environment(&[("GITHUB__OWNER", "bob")]),
            &legacy,
        )
        .unwrap();
        assert_eq!(config.github.owner, "alice");
        assert_eq!(config.github.repo, "blog");
        assert_eq!(config.github.profile_login(), "alice-profile");
        assert_eq!(config.github.token(), Some("secret"));
    }
}
