/// Tokens read as "no value" (the usual NA spellings of CSV exports).
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Matches on the trimmed text, so whitespace-only cells are missing too.
pub fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

/// Trimmed cell text for parsing, or `None` when the cell counts as missing.
pub fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !is_missing(s))
}

/// Cell text exactly as the reader produced it, or `None` when missing.
pub fn present_verbatim(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !is_missing(s))
}

pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present() {
        assert_eq!(present(Some(" C ")), Some("C"));
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some("NaN")), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_present_verbatim_keeps_text_as_is() {
        assert_eq!(present_verbatim(Some("  lead")), Some("  lead"));
        assert_eq!(present_verbatim(Some("\"Captain\"")), Some("\"Captain\""));
        assert_eq!(present_verbatim(Some(" NA ")), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }
}
