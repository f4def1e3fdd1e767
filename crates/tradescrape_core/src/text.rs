//! Text normalizer: pure helpers applied before any numeric or phrase comparison.

/// Sentinel for a price-like field that is absent or not a number.
pub const PRICE_SENTINEL: f64 = -1.0;
/// Sentinel for a counter-like field (quantity, volume) that is absent or not a number.
pub const COUNT_SENTINEL: i64 = 0;

const NBSP_ARTIFACTS: &[&str] = &["&nbsp;", "&nbsp", "&#160;", "&#xa0;", "&#xA0;", "\u{a0}"];

/// Remove every occurrence of `sep` (thousands separators).
pub fn strip_separator(text: &str, sep: char) -> String {
    text.chars().filter(|&c| c != sep).collect()
}

/// Replace non-breaking-space markers, raw or entity-encoded, with a plain space.
pub fn collapse_entity_gaps(text: &str) -> String {
    if !text.contains('&') && !text.contains('\u{a0}') {
        return text.to_string();
    }
    let mut out = text.to_string();
    for artifact in NBSP_ARTIFACTS {
        if out.contains(artifact) {
            out = out.replace(artifact, " ");
        }
    }
    out
}

/// True iff `text` is non-empty and made only of ASCII digits, commas and periods.
///
/// Placeholders such as "−", "‐‐" or "" are not numeric.
pub fn is_numeric_token(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

/// Split a free-text block on whitespace of any width, including line breaks
/// and the ideographic space.
pub fn split_fields(text: &str) -> Vec<&str> {
    text.split(char::is_whitespace)
        .filter(|part| !part.is_empty())
        .collect()
}

/// First non-empty line of an accumulated cell.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Drop any of `suffixes` (unit markers such as 株 or 円) from the end of `text`.
pub fn trim_units<'a>(text: &'a str, suffixes: &[&str]) -> &'a str {
    let mut out = text.trim();
    for suffix in suffixes {
        if let Some(stripped) = out.strip_suffix(suffix) {
            out = stripped.trim_end();
        }
    }
    out
}

/// Parse a price cell, falling back to [`PRICE_SENTINEL`].
pub fn parse_price(text: &str) -> f64 {
    let token = trim_units(first_line(text), &["円"]);
    if !is_numeric_token(token) {
        return PRICE_SENTINEL;
    }
    strip_separator(token, ',')
        .parse::<f64>()
        .unwrap_or(PRICE_SENTINEL)
}

/// Parse a quantity or volume cell, falling back to [`COUNT_SENTINEL`].
pub fn parse_count(text: &str) -> i64 {
    let token = trim_units(first_line(text), &["株", "口"]);
    if !is_numeric_token(token) {
        return COUNT_SENTINEL;
    }
    strip_separator(token, ',')
        .parse::<i64>()
        .unwrap_or(COUNT_SENTINEL)
}

/// Parse a security code. Anything that is not a positive integer yields 0.
pub fn parse_code(text: &str) -> u32 {
    let token = text.trim();
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return 0;
    }
    token.parse::<u32>().unwrap_or(0)
}

/// Code from the first field of a cell such as "1301\n極洋".
pub fn leading_code(text: &str) -> u32 {
    split_fields(text).first().map_or(0, |field| parse_code(field))
}

/// First all-digit field of at least four characters, for cells that pack
/// name, code and exchange into one block.
pub fn find_code(text: &str) -> u32 {
    split_fields(text)
        .into_iter()
        .filter(|field| field.len() >= 4)
        .map(parse_code)
        .find(|&code| code > 0)
        .unwrap_or(0)
}

/// True when `text` contains any phrase of `set`.
pub fn contains_any(text: &str, set: &[&str]) -> bool {
    set.iter().any(|phrase| text.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_separator_is_idempotent() {
        let once = strip_separator("1,234,567", ',');
        assert_eq!(once, "1234567");
        assert_eq!(strip_separator(&once, ','), once);
    }

    #[test]
    fn collapse_entity_gaps_is_idempotent() {
        let raw = "a&nbsp;b&nbspc&#160;d\u{a0}e";
        let once = collapse_entity_gaps(raw);
        assert_eq!(once, "a b c d e");
        assert_eq!(collapse_entity_gaps(&once), once);
    }

    #[test]
    fn numeric_token_rejects_placeholders() {
        assert!(is_numeric_token("1,234.5"));
        assert!(!is_numeric_token("−"));
        assert!(!is_numeric_token("‐‐"));
        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("12a"));
    }

    #[test]
    fn placeholders_resolve_to_sentinels() {
        for placeholder in ["−", "‐‐", "", "--", "　"] {
            assert_eq!(parse_price(placeholder), PRICE_SENTINEL);
            assert_eq!(parse_count(placeholder), COUNT_SENTINEL);
        }
    }

    #[test]
    fn units_and_separators_are_removed_before_parsing() {
        assert_eq!(parse_price("1,234.5円"), 1234.5);
        assert_eq!(parse_count("1,000株"), 1000);
        assert_eq!(parse_count("300\n株"), 300);
    }

    #[test]
    fn split_fields_handles_mixed_whitespace() {
        assert_eq!(
            split_fields("1301\n 東証　信用 "),
            vec!["1301", "東証", "信用"]
        );
    }

    #[test]
    fn codes_are_found_in_packed_cells() {
        assert_eq!(leading_code("1301\n極洋"), 1301);
        assert_eq!(find_code("極洋 1301 東証"), 1301);
        assert_eq!(find_code("極洋 東証"), 0);
    }

    #[test]
    fn code_must_be_all_digits() {
        assert_eq!(parse_code(" 1301 "), 1301);
        assert_eq!(parse_code("13O1"), 0);
        assert_eq!(parse_code(""), 0);
    }
}
