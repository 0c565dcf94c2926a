//! Top-N word-frequency reduction
//!
//! Pure reduction from the unordered aggregate counts to a bounded, ordered
//! ranking. Ordering is fully deterministic: count descending, then word
//! length descending, then lexicographic ascending, so repeated runs over
//! the same input produce an identical sequence.

use std::collections::HashMap;

/// Reduces a word-count mapping to its top `limit` entries
///
/// # Arguments
///
/// * `counts` - The unordered word counts
/// * `limit` - Maximum number of entries to keep; 0 yields an empty result
///
/// # Returns
///
/// At most `limit` (word, count) pairs, highest counts first
pub fn top_words(counts: &HashMap<String, u64>, limit: usize) -> Vec<(String, u64)> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(String, u64)> = counts
        .iter()
        .map(|(word, count)| (word.clone(), *count))
        .collect();

    ranked.sort_by(|(a_word, a_count), (b_word, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| b_word.len().cmp(&a_word.len()))
            .then_with(|| a_word.cmp(b_word))
    });

    ranked.truncate(limit);
    ranked
}
