//! Text utility functions for the Readmore core library.

/// Byte offsets of every character boundary in `s`, including `s.len()`.
///
/// Entry `i` is the byte index where the `i`-th character starts, so
/// `&s[..boundaries[n]]` is the prefix holding the first `n` characters.
pub fn char_boundaries(s: &str) -> Vec<usize> {
    s.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(s.len()))
        .collect()
}

/// The prefix of `s` holding its first `n` characters (all of `s` if shorter).
pub fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string to a maximum number of Unicode characters.
///
/// If the string exceeds `max_chars`, the result is the first `max_chars - 1`
/// characters followed by `…`. If `max_chars` is zero, returns an empty
/// string. Strings at or below the limit are returned unchanged.
///
/// Uses `.chars()` for multi-byte safety.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        format!("{}…", prefix_chars(s, max_chars - 1))
    }
}
