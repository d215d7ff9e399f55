//! CLI configuration.

use std::path::PathBuf;

use convo_core::AnalyzerConfig;

/// Preferences file used when `--state-file` is not given.
pub const DEFAULT_STATE_PATH: &str = ".convo-state.json";

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding persisted preferences.
    pub state_path: PathBuf,

    /// Analytics tuning.
    pub analyzer: AnalyzerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    /// Apply command line overrides on top of the defaults.
    pub fn with_overrides(mut self, state_path: Option<PathBuf>, keyword_limit: Option<usize>) -> Self {
        if let Some(path) = state_path {
            self.state_path = path;
        }
        if let Some(limit) = keyword_limit {
            self.analyzer.keyword_limit = limit;
        }
        self
    }
}
