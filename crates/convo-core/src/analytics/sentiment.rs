//! Lexicon-based polarity scoring.

use super::text::tokenize;

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "awesome",
    "love",
    "happy",
    "thanks",
    "nice",
    "excellent",
    "amazing",
    "fantastic",
    "working",
    "fixed",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "hate",
    "sad",
    "angry",
    "problem",
    "awful",
    "worst",
    "poor",
    "broken",
    "damage",
    "damaged",
    "defect",
    "defective",
    "faulty",
    "notworking",
    "missing",
    "broke",
    "cracked",
    "scratched",
    "malfunction",
];

const NEGATORS: &[&str] = &["not", "don't", "never", "isn't", "aren't", "no"];

/// Prefixes that mark inflections of negative words (`damaging`, `breaks`).
const NEGATIVE_ROOTS: &[&str] = &["damag", "break", "defec", "fault", "malfunct"];

/// Matched against the whole lowercased text, not tokens.
const NEGATIVE_PHRASES: &[&str] = &["not working", "doesn't work", "did not work"];

/// Score the polarity of `text` in `[-1, 1]`.
///
/// Each lexicon hit contributes `+1` or `-1`, flipped when the previous token
/// is a negator. The first token that matches nothing triggers the phrase
/// check: if the text contains a negative phrase, `-1` is added once and
/// scanning stops. The sum is averaged over the contributing tokens.
pub fn score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let words = tokenize(&lower);

    let mut total: i64 = 0;
    let mut counted: u32 = 0;

    for (i, word) in words.iter().enumerate() {
        let word = word.as_str();
        let negated = i > 0 && NEGATORS.contains(&words[i - 1].as_str());
        let signed = |polarity: i64| if negated { -polarity } else { polarity };

        if POSITIVE_WORDS.contains(&word) {
            total += signed(1);
            counted += 1;
            continue;
        }

        if NEGATIVE_WORDS.contains(&word) || NEGATIVE_ROOTS.iter().any(|r| word.starts_with(*r)) {
            total += signed(-1);
            counted += 1;
            continue;
        }

        if NEGATIVE_PHRASES.iter().any(|phrase| lower.contains(*phrase)) {
            total -= 1;
            counted += 1;
            break;
        }
    }

    if counted == 0 {
        return 0.0;
    }

    (total as f64 / f64::from(counted)).clamp(-1.0, 1.0)
}
