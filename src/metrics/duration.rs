use regex::Regex;
use std::sync::LazyLock;

static DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*min\s*([0-9]+)?\s*s?").expect("invalid regex"));

/// Parse a free-text duration such as "3 min 45 s" into seconds
///
/// Text without a minutes component parses to zero.
pub fn parse_duration(text: &str) -> u64 {
    let Some(captures) = DURATION_REGEX.captures(text) else {
        return 0;
    };
    let minutes = captures
        .get(1)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0);
    let seconds = captures
        .get(2)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0);
    minutes.saturating_mul(60).saturating_add(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_and_seconds() {
        assert_eq!(parse_duration("3 min 45 s"), 225);
        assert_eq!(parse_duration("3min45s"), 225);
        assert_eq!(parse_duration("12 min"), 720);
        assert_eq!(parse_duration("0 min 9 s"), 9);
    }

    #[test]
    fn test_malformed_text_is_zero() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("45 s"), 0);
        assert_eq!(parse_duration("n/a"), 0);
    }
}
