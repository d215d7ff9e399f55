//! Analyzer configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for [`Analyzer`](crate::Analyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum number of keywords reported.
    pub keyword_limit: usize,

    /// Estimated model tokens per whitespace-separated word.
    pub tokens_per_word: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            keyword_limit: 10,
            tokens_per_word: 1.33,
        }
    }
}

impl AnalyzerConfig {
    /// Builder method to set the keyword limit.
    pub fn with_keyword_limit(mut self, limit: usize) -> Self {
        self.keyword_limit = limit;
        self
    }
}
