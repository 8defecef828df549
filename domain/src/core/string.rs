//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
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

/// Last `n` lines of a log. Build and run failures put the cause at the end.
pub fn tail_lines(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    let trimmed = s.trim_end_matches('\n');
    match trimmed.rmatch_indices('\n').nth(n - 1) {
        Some((idx, _)) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes; cutting inside it backs up to the boundary
        assert_eq!(truncate("ééééé", 8), "éé...");
    }

    #[test]
    fn test_tail_lines() {
        let log = "step 1\nstep 2\nstep 3\nerror: boom\n";
        assert_eq!(tail_lines(log, 2), "step 3\nerror: boom");
        assert_eq!(tail_lines(log, 10), "step 1\nstep 2\nstep 3\nerror: boom");
        assert_eq!(tail_lines(log, 0), "");
        assert_eq!(tail_lines("single", 1), "single");
    }
}
