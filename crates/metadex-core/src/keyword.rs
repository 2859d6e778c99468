//! Keyword wildcard formatting.
//!
//! The listing backend does substring matching on `%`-wrapped keywords.

/// Wrap a raw keyword for substring matching.
///
/// Blank input clears the filter. Non-blank input is wrapped as typed,
/// surrounding whitespace included.
pub fn wrap_keyword(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(format!("%{raw}%"))
    }
}

/// Strip the wildcard delimiters added by [`wrap_keyword`], for showing
/// the active filter back in the search box.
pub fn unwrap_keyword(wrapped: &str) -> &str {
    wrapped
        .strip_prefix('%')
        .and_then(|s| s.strip_suffix('%'))
        .unwrap_or(wrapped)
}

/// SQL-`LIKE` style match where `%` matches any run of characters.
/// Comparison is case-insensitive.
pub fn like_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();
    let parts: Vec<&str> = pattern.split('%').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut rest = text.as_str();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == last {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_non_empty_keyword() {
        assert_eq!(wrap_keyword("cpu").as_deref(), Some("%cpu%"));
        assert_eq!(wrap_keyword(" cpu").as_deref(), Some("% cpu%"));
    }

    #[test]
    fn blank_keyword_clears_filter() {
        assert_eq!(wrap_keyword(""), None);
        assert_eq!(wrap_keyword("   \t"), None);
    }

    #[test]
    fn unwrap_reverses_wrap() {
        assert_eq!(unwrap_keyword("%node%"), "node");
        assert_eq!(unwrap_keyword("plain"), "plain");
    }

    #[test]
    fn like_matches_substrings() {
        assert!(like_match("%node%", "node_cpu_seconds_total"));
        assert!(like_match("%CPU%", "node_cpu_seconds_total"));
        assert!(like_match("node%", "node_load1"));
        assert!(!like_match("node%", "go_node"));
        assert!(like_match("%total", "http_requests_total"));
        assert!(like_match("up", "UP"));
        assert!(!like_match("%disk%", "node_load1"));
    }
}
