//! Word tokenization shared by the scorers.

/// Lowercase `text` and split it into `[a-z0-9']` runs.
///
/// Everything else (whitespace, punctuation, non-ASCII letters) separates
/// tokens; empty tokens are dropped. Apostrophes stay inside the token so
/// contractions like `don't` survive intact.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|word| !word.is_empty())
        .map(str::to_owned)
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '\''
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's 2024..."),
            vec!["hello", "world", "it's", "2024"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ?! -- ").is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii_separates() {
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }
}
