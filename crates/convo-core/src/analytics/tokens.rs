//! Rough model token estimate.

/// Whitespace word count times `tokens_per_word`, rounded, never negative.
pub fn estimate(text: &str, tokens_per_word: f64) -> u64 {
    let words = text.split_whitespace().count();
    let tokens = (words as f64 * tokens_per_word).round();
    if tokens.is_finite() && tokens > 0.0 {
        tokens as u64
    } else {
        0
    }
}
