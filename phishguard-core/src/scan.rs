// Locating a URL inside free-form text

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"]+|www\.[^\s<>"]+"#).expect("static regex")
});

static BARE_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static regex"));

/// All URL-looking spans in the text, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<&str> {
    URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// True for inputs like `example.com` or `login.example.co.uk`.
pub fn is_bare_domain(text: &str) -> bool {
    BARE_DOMAIN.is_match(text)
}

/// The URL to score for a piece of text.
///
/// Only the first URL found is used; later ones are ignored. When the text
/// holds no URL, the whole trimmed text is used if it looks like a bare
/// domain.
pub fn find_target_url(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    URL_PATTERN
        .find(trimmed)
        .map(|m| m.as_str())
        .or_else(|| is_bare_domain(trimmed).then_some(trimmed))
}
