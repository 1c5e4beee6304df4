//! Small text helpers shared by the reply and summary generators.

/// Return at most the first `max_chars` characters of `s`.
///
/// Counts Unicode scalar values, so multi-byte text is never split mid-character.
pub fn prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_shorter_than_limit() {
        assert_eq!(prefix("hello", 50), "hello");
    }

    #[test]
    fn test_prefix_truncates() {
        assert_eq!(prefix("abcdefgh", 3), "abc");
    }

    #[test]
    fn test_prefix_multibyte() {
        assert_eq!(prefix("héllo wörld", 2), "hé");
        assert_eq!(prefix("日本語テキスト", 3), "日本語");
    }

    #[test]
    fn test_prefix_zero() {
        assert_eq!(prefix("abc", 0), "");
    }
}
