//! Text helpers applied at the store and notification boundaries.

/// Maximum length of the `last_error` cell and of error excerpts in
/// notifications.
pub const MAX_ERROR_CHARS: usize = 500;

/// Maximum length of the prompt excerpt included in notifications.
pub const MAX_PROMPT_EXCERPT_CHARS: usize = 280;

/// Return at most `max_chars` characters of `text`, never splitting a
/// UTF-8 code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_chars("a cat", 280), "a cat");
    }

    #[test]
    fn long_text_is_cut_at_limit() {
        let text = "x".repeat(600);
        assert_eq!(truncate_chars(&text, MAX_ERROR_CHARS).len(), 500);
    }

    #[test]
    fn exact_length_is_unchanged() {
        let text = "y".repeat(280);
        assert_eq!(truncate_chars(&text, 280), text);
    }

    #[test]
    fn multibyte_characters_are_not_split() {
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn zero_limit_yields_empty() {
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
