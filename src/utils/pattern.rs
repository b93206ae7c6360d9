//! Regular expression helpers.

use regex::Regex;

/// Compiles a regex that must succeed (for compile-time constant patterns).
///
/// # Panics
///
/// Panics if the pattern does not compile (indicates a programming error).
pub fn parse_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

/// First capture group of `re` in `haystack`, parsed as an integer.
pub fn capture_i64(re: &Regex, haystack: &str) -> Option<i64> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_i64() {
        let re = parse_regex_unsafe(r"month_id=(\d+)", "test");
        assert_eq!(
            capture_i64(&re, "/calendar/month?month_id=1349074800000"),
            Some(1_349_074_800_000)
        );
        assert_eq!(capture_i64(&re, "/calendar/month"), None);
    }
}
