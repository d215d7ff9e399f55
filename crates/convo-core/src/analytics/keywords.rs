//! Keyword extraction by weighted unigram/bigram frequency.

use super::text::tokenize;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "is", "a", "an", "and", "or", "to", "of", "in", "for", "on", "with", "you", "i", "it",
    "this", "that", "we", "our", "be", "are", "was", "if", "but", "so", "as", "at", "by", "from",
];

const MIN_UNIGRAM_LEN: usize = 3;
const MIN_BIGRAM_LEN: usize = 5;
const UNIGRAM_WEIGHT: u32 = 1;
const BIGRAM_WEIGHT: u32 = 2;

/// Frequency table that remembers first-insertion order.
#[derive(Debug, Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u32)>,
}

impl FrequencyTable {
    fn add(&mut self, term: String, weight: u32) {
        match self.index.get(&term) {
            Some(&slot) => self.entries[slot].1 += weight,
            None => {
                self.index.insert(term.clone(), self.entries.len());
                self.entries.push((term, weight));
            }
        }
    }

    /// Highest weights first; equal weights keep insertion order.
    fn into_ranked(mut self) -> Vec<(String, u32)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Rank terms in `text` and return at most `limit` of them.
///
/// Unigrams of at least three characters count once per occurrence; adjacent
/// non-stop-word pairs count twice. Every unigram is inserted before any
/// bigram, which decides ties.
pub fn extract(text: &str, limit: usize) -> Vec<String> {
    ranked(text)
        .into_iter()
        .take(limit)
        .map(|(term, _)| term)
        .collect()
}

/// Every term with its weight, best first.
pub fn ranked(text: &str) -> Vec<(String, u32)> {
    let words = tokenize(text);
    let mut table = FrequencyTable::default();

    for word in &words {
        if is_stop_word(word) || word.len() < MIN_UNIGRAM_LEN {
            continue;
        }
        table.add(word.clone(), UNIGRAM_WEIGHT);
    }

    for pair in words.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if is_stop_word(a) || is_stop_word(b) {
            continue;
        }
        let bigram = format!("{a} {b}");
        if bigram.len() < MIN_BIGRAM_LEN {
            continue;
        }
        table.add(bigram, BIGRAM_WEIGHT);
    }

    table.into_ranked()
}
