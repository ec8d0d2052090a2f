//! Fixed vocabularies shared by training and serving.
//!
//! These lists must match the ones the model was trained with, entry for
//! entry. They are not configurable.

/// Substrings that mark a URL as carrying a sensitive action word.
pub const REDIRECT_WORDS: [&str; 8] = [
    "redirect", "verify", "login", "account", "update", "signin", "auth", "confirm",
];

/// Substrings typical of brand impersonation.
pub const BRAND_MISMATCH_PATTERNS: [&str; 7] = [
    "paypa1",
    "secure-paypa",
    "verify-account",
    "confirm-account",
    "support-",
    "-login",
    "account-update",
];

/// Category absorbing every TLD the model was not trained on.
pub const SENTINEL_TLD: &str = "other";

/// Raw TLD reported when the host has no public suffix.
pub const UNKNOWN_TLD: &str = "unknown";

/// Case-insensitive check against one of the vocabularies above.
pub fn contains_any(lowercased: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|word| lowercased.contains(word))
}
