//! Text helpers for messages that end up in host error lines.

/// Truncate to at most `max_len` bytes, ending with `...` when shortened.
///
/// Cuts only at UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Collapse a multi-line response body into one line
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate("404 Not Found", 20), "404 Not Found");
    }

    #[test]
    fn test_truncate_long_body() {
        assert_eq!(truncate("502 Bad Gateway from nginx", 10), "502 Bad...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; cutting at byte 4 would split it.
        assert_eq!(truncate("cafés galore", 7), "caf...");
        assert_eq!(truncate("ééééé", 7), "éé...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(
            single_line("<html>\n  <body>Bad Gateway</body>\n</html>"),
            "<html> <body>Bad Gateway</body> </html>"
        );
    }
}
