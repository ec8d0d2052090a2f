/// Canonicalize free text into something parseable as an absolute URL.
///
/// The input is trimmed and, unless it already starts with `letters://`,
/// prefixed with `http://`. Nothing else is rewritten; an empty input
/// becomes `http://`.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if has_scheme_prefix(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// True when the string starts with one or more ASCII letters followed by `://`.
pub fn has_scheme_prefix(url: &str) -> bool {
    let letters = url.bytes().take_while(u8::is_ascii_alphabetic).count();
    letters > 0 && url[letters..].starts_with("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_added_when_missing() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
        assert_eq!(normalize_url("  example.com/a  "), "http://example.com/a");
    }

    #[test]
    fn test_existing_scheme_kept() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("FTP://example.com"), "FTP://example.com");
    }

    #[test]
    fn test_scheme_must_be_letters_only() {
        assert_eq!(normalize_url("h2p://x.com"), "http://h2p://x.com");
        assert_eq!(normalize_url("://x.com"), "http://://x.com");
        assert_eq!(normalize_url("mailto:a@b.com"), "http://mailto:a@b.com");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_url(""), "http://");
        assert_eq!(normalize_url("   "), "http://");
    }

    #[test]
    fn test_idempotent() {
        for input in ["example.com", "https://a.b/c?d=e", "", " www.x.org "] {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once);
        }
    }
}
