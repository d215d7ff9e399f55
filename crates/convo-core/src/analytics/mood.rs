//! Mood labels derived from a sentiment score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Friendly label for a sentiment score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    #[serde(rename = "very positive")]
    VeryPositive,
    #[serde(rename = "positive")]
    Positive,
    #[default]
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "very negative")]
    VeryNegative,
}

impl MoodLabel {
    /// Bucket a score: `>= 0.6`, `>= 0.2`, `(-0.2, 0.2)`, `<= -0.6`, rest.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.6 {
            Self::VeryPositive
        } else if score >= 0.2 {
            Self::Positive
        } else if score > -0.2 {
            Self::Neutral
        } else if score <= -0.6 {
            Self::VeryNegative
        } else {
            Self::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryPositive => "very positive",
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::VeryNegative => "very negative",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::VeryPositive => "😄",
            Self::Positive => "🙂",
            Self::Neutral => "😐",
            Self::Negative => "☹️",
            Self::VeryNegative => "😡",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(MoodLabel::from_score(1.0), MoodLabel::VeryPositive);
        assert_eq!(MoodLabel::from_score(0.6), MoodLabel::VeryPositive);
        assert_eq!(MoodLabel::from_score(0.59), MoodLabel::Positive);
        assert_eq!(MoodLabel::from_score(0.2), MoodLabel::Positive);
        assert_eq!(MoodLabel::from_score(0.19), MoodLabel::Neutral);
        assert_eq!(MoodLabel::from_score(0.0), MoodLabel::Neutral);
        assert_eq!(MoodLabel::from_score(-0.19), MoodLabel::Neutral);
        assert_eq!(MoodLabel::from_score(-0.2), MoodLabel::Negative);
        assert_eq!(MoodLabel::from_score(-0.59), MoodLabel::Negative);
        assert_eq!(MoodLabel::from_score(-0.6), MoodLabel::VeryNegative);
        assert_eq!(MoodLabel::from_score(-1.0), MoodLabel::VeryNegative);
    }

    #[test]
    fn test_label_serializes_as_text() {
        let json = serde_json::to_string(&MoodLabel::VeryNegative).unwrap();
        assert_eq!(json, "\"very negative\"");
    }

    #[test]
    fn test_emoji() {
        assert_eq!(MoodLabel::Neutral.emoji(), "😐");
        assert_eq!(MoodLabel::VeryPositive.emoji(), "😄");
    }
}
