use super::tool::DEFAULT_TOOL_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Settings for repository builds: where repositories and the cache
/// live, which tool binary to run, and the fan-out bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildConfig {
    pub repo_root: PathBuf,
    pub cache_dir: PathBuf,
    pub tool_binary: PathBuf,
    pub default_repository: String,
    pub default_shell_size: u32,
    pub pool_width: usize,
    pub tool_timeout: Duration,
}

#[derive(Default)]
pub struct BuildConfigBuilder {
    repo_root: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    tool_binary: Option<PathBuf>,
    default_repository: Option<String>,
    default_shell_size: Option<u32>,
    pool_width: Option<usize>,
    tool_timeout: Option<Duration>,
}

impl BuildConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo_root(mut self, path: PathBuf) -> Self {
        self.repo_root = Some(path);
        self
    }
    pub fn cache_dir(mut self, path: PathBuf) -> Self {
        self.cache_dir = Some(path);
        self
    }
    pub fn tool_binary(mut self, path: PathBuf) -> Self {
        self.tool_binary = Some(path);
        self
    }
    pub fn default_repository(mut self, name: impl Into<String>) -> Self {
        self.default_repository = Some(name.into());
        self
    }
    pub fn default_shell_size(mut self, shell_size: u32) -> Self {
        self.default_shell_size = Some(shell_size);
        self
    }
    pub fn pool_width(mut self, width: usize) -> Self {
        self.pool_width = Some(width);
        self
    }
    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        Ok(BuildConfig {
            repo_root: self
                .repo_root
                .ok_or(ConfigError::MissingParameter("repo_root"))?,
            cache_dir: self
                .cache_dir
                .ok_or(ConfigError::MissingParameter("cache_dir"))?,
            tool_binary: self
                .tool_binary
                .ok_or(ConfigError::MissingParameter("tool_binary"))?,
            default_repository: self
                .default_repository
                .unwrap_or_else(|| "lipids".to_string()),
            default_shell_size: self.default_shell_size.unwrap_or(1),
            pool_width: self
                .pool_width
                .unwrap_or(super::generator::DEFAULT_POOL_WIDTH),
            tool_timeout: self.tool_timeout.unwrap_or(DEFAULT_TOOL_TIMEOUT),
        })
    }
}
