//! Lexical feature extraction from a normalized URL.
//!
//! Every count runs over the whole normalized string. Lengths are measured
//! in characters, not bytes.

use crate::error::{CoreError, Result};
use crate::vocab::{BRAND_MISMATCH_PATTERNS, REDIRECT_WORDS, UNKNOWN_TLD, contains_any};
use phishguard_model::{FeatureValue, TLD_COLUMN};
use regex::Regex;
use std::net::Ipv6Addr;
use std::sync::LazyLock;

pub const URL_LENGTH: &str = "URLLength";
pub const DOMAIN_LENGTH: &str = "DomainLength";
pub const IS_DOMAIN_IP: &str = "IsDomainIP";
pub const TLD_LENGTH: &str = "TLDLength";
pub const NO_OF_SUB_DOMAIN: &str = "NoOfSubDomain";
pub const HAS_OBFUSCATION: &str = "HasObfuscation";
pub const NO_OF_OBFUSCATED_CHAR: &str = "NoOfObfuscatedChar";
pub const OBFUSCATION_RATIO: &str = "ObfuscationRatio";
pub const NO_OF_LETTERS_IN_URL: &str = "NoOfLettersInURL";
pub const LETTER_RATIO_IN_URL: &str = "LetterRatioInURL";
pub const NO_OF_DEGITS_IN_URL: &str = "NoOfDegitsInURL";
pub const DEGIT_RATIO_IN_URL: &str = "DegitRatioInURL";
pub const NO_OF_EQUALS_IN_URL: &str = "NoOfEqualsInURL";
pub const NO_OF_QMARK_IN_URL: &str = "NoOfQMarkInURL";
pub const NO_OF_AMPERSAND_IN_URL: &str = "NoOfAmpersandInURL";
pub const NO_OF_OTHER_SPECIAL_CHARS_IN_URL: &str = "NoOfOtherSpecialCharsInURL";
pub const SPACIAL_CHAR_RATIO_IN_URL: &str = "SpacialCharRatioInURL";
pub const IS_HTTPS: &str = "IsHTTPS";
pub const CONTAINS_AT: &str = "ContainsAt";
pub const HAS_REDIRECT_WORD: &str = "HasRedirectWord";
pub const BRAND_MISMATCH_HINT: &str = "BrandMismatchHint";

static PERCENT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").expect("static regex"));

/// Host split along the public suffix list. Lives only inside one
/// extraction call.
#[derive(Debug, Default, PartialEq)]
struct ParsedUrl {
    scheme: String,
    host: String,
    subdomain: String,
    registered_domain: String,
    suffix: String,
    is_ipv4: bool,
}

/// Every feature computed for one URL, before schema alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeatures {
    pub url_length: usize,
    pub domain_length: usize,
    pub is_domain_ip: bool,
    /// Lowercased suffix, or "unknown" when there is none.
    pub tld: String,
    pub tld_length: usize,
    pub no_of_sub_domain: usize,
    pub has_obfuscation: bool,
    pub no_of_obfuscated_char: usize,
    pub obfuscation_ratio: f64,
    pub no_of_letters: usize,
    pub letter_ratio: f64,
    pub no_of_digits: usize,
    pub digit_ratio: f64,
    pub no_of_equals: usize,
    pub no_of_qmarks: usize,
    pub no_of_ampersands: usize,
    pub no_of_other_special_chars: usize,
    pub special_char_ratio: f64,
    pub is_https: bool,
    pub contains_at: bool,
    pub has_redirect_word: bool,
    pub brand_mismatch_hint: bool,
}

impl RawFeatures {
    /// Named row in the layout used at training time.
    pub fn to_row(&self) -> Vec<(&'static str, FeatureValue)> {
        vec![
            (URL_LENGTH, self.url_length.into()),
            (DOMAIN_LENGTH, self.domain_length.into()),
            (IS_DOMAIN_IP, self.is_domain_ip.into()),
            (TLD_COLUMN, self.tld.as_str().into()),
            (TLD_LENGTH, self.tld_length.into()),
            (NO_OF_SUB_DOMAIN, self.no_of_sub_domain.into()),
            (HAS_OBFUSCATION, self.has_obfuscation.into()),
            (NO_OF_OBFUSCATED_CHAR, self.no_of_obfuscated_char.into()),
            (OBFUSCATION_RATIO, self.obfuscation_ratio.into()),
            (NO_OF_LETTERS_IN_URL, self.no_of_letters.into()),
            (LETTER_RATIO_IN_URL, self.letter_ratio.into()),
            (NO_OF_DEGITS_IN_URL, self.no_of_digits.into()),
            (DEGIT_RATIO_IN_URL, self.digit_ratio.into()),
            (NO_OF_EQUALS_IN_URL, self.no_of_equals.into()),
            (NO_OF_QMARK_IN_URL, self.no_of_qmarks.into()),
            (NO_OF_AMPERSAND_IN_URL, self.no_of_ampersands.into()),
            (
                NO_OF_OTHER_SPECIAL_CHARS_IN_URL,
                self.no_of_other_special_chars.into(),
            ),
            (SPACIAL_CHAR_RATIO_IN_URL, self.special_char_ratio.into()),
            (IS_HTTPS, self.is_https.into()),
            (CONTAINS_AT, self.contains_at.into()),
            (HAS_REDIRECT_WORD, self.has_redirect_word.into()),
            (BRAND_MISMATCH_HINT, self.brand_mismatch_hint.into()),
        ]
    }
}

/// Compute the lexical features of an already-normalized URL.
pub fn extract_features(url: &str) -> Result<RawFeatures> {
    let parsed = parse_url(url)?;

    let url_length = url.chars().count();
    let no_of_letters = url.chars().filter(char::is_ascii_alphabetic).count();
    let no_of_digits = url.chars().filter(char::is_ascii_digit).count();
    let no_of_other_special_chars = url_length - no_of_letters - no_of_digits;
    let no_of_obfuscated_char = PERCENT_ESCAPE.find_iter(url).count();
    let contains_at = url.contains('@');

    let domain_length = if parsed.is_ipv4 {
        parsed.host.chars().count()
    } else {
        [
            parsed.subdomain.as_str(),
            parsed.registered_domain.as_str(),
            parsed.suffix.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
        .chars()
        .count()
    };

    let no_of_sub_domain = if parsed.is_ipv4 || parsed.subdomain.is_empty() {
        0
    } else {
        parsed.subdomain.matches('.').count() + 1
    };

    let tld = if parsed.suffix.is_empty() {
        UNKNOWN_TLD.to_string()
    } else {
        parsed.suffix.to_lowercase()
    };

    let lowered = url.to_lowercase();

    Ok(RawFeatures {
        url_length,
        domain_length,
        is_domain_ip: parsed.is_ipv4,
        tld_length: tld.chars().count(),
        tld,
        no_of_sub_domain,
        has_obfuscation: contains_at || no_of_obfuscated_char > 0,
        no_of_obfuscated_char,
        obfuscation_ratio: ratio(no_of_obfuscated_char, url_length),
        no_of_letters,
        letter_ratio: ratio(no_of_letters, url_length),
        no_of_digits,
        digit_ratio: ratio(no_of_digits, url_length),
        no_of_equals: url.matches('=').count(),
        no_of_qmarks: url.matches('?').count(),
        no_of_ampersands: url.matches('&').count(),
        no_of_other_special_chars,
        special_char_ratio: ratio(no_of_other_special_chars, url_length),
        is_https: parsed.scheme == "https",
        contains_at,
        has_redirect_word: contains_any(&lowered, &REDIRECT_WORDS),
        brand_mismatch_hint: contains_any(&lowered, &BRAND_MISMATCH_PATTERNS),
    })
}

/// Zero-safe division.
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Four dot-separated decimal octets, each 1-3 digits and at most 255.
pub fn is_ipv4_literal(host: &str) -> bool {
    let parts: Vec<&str> = host.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            (1..=3).contains(&part.len())
                && part.bytes().all(|b| b.is_ascii_digit())
                && part.parse::<u16>().is_ok_and(|n| n <= 255)
        })
}

fn parse_url(url: &str) -> Result<ParsedUrl> {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_alphabetic()) =>
        {
            (scheme.to_ascii_lowercase(), rest)
        }
        _ => return Ok(ParsedUrl::default()),
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let host = host_from_authority(authority)?;
    let is_ipv4 = is_ipv4_literal(&host);

    let mut parsed = ParsedUrl {
        scheme,
        is_ipv4,
        ..ParsedUrl::default()
    };
    let (subdomain, registered_domain, suffix) = split_host(&host, is_ipv4);
    parsed.subdomain = subdomain.to_string();
    parsed.registered_domain = if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]", host)
    } else {
        registered_domain.to_string()
    };
    parsed.suffix = suffix.to_string();
    parsed.host = host;
    Ok(parsed)
}

/// Host of an authority (`userinfo@host:port`), ASCII-lowercased so its
/// character count is unchanged. IPv6 literals come back without brackets.
fn host_from_authority(authority: &str) -> Result<String> {
    let has_open = authority.contains('[');
    let has_close = authority.contains(']');
    if has_open != has_close {
        return Err(CoreError::Extraction(format!(
            "invalid IPv6 URL authority '{}'",
            authority
        )));
    }

    let host_info = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = match host_info.split_once('[') {
        Some((_, bracketed)) => {
            let literal = bracketed.split_once(']').map_or(bracketed, |(inner, _)| inner);
            if literal.parse::<Ipv6Addr>().is_err() {
                return Err(CoreError::Extraction(format!(
                    "'{}' is not a valid IPv6 literal",
                    literal
                )));
            }
            literal
        }
        None => host_info.split_once(':').map_or(host_info, |(host, _)| host),
    };

    Ok(host.to_ascii_lowercase())
}

/// Split a host into (subdomain, registered domain, suffix).
fn split_host(host: &str, is_ipv4: bool) -> (&str, &str, &str) {
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return ("", "", "");
    }
    if is_ipv4 || host.parse::<Ipv6Addr>().is_ok() {
        return ("", host, "");
    }

    let suffix = icann_suffix(host);
    if suffix.is_empty() {
        return match host.rsplit_once('.') {
            Some((subdomain, last)) => (subdomain, last, ""),
            None => ("", host, ""),
        };
    }
    if suffix.len() == host.len() {
        return ("", "", suffix);
    }

    let prefix = &host[..host.len() - suffix.len() - 1];
    match prefix.rsplit_once('.') {
        Some((subdomain, registered)) => (subdomain, registered, suffix),
        None => ("", prefix, suffix),
    }
}

/// Longest ICANN public suffix of `host`, or "" when the last label is not
/// a listed suffix. Private-section matches are walked back to their ICANN
/// parent.
fn icann_suffix(host: &str) -> &str {
    let mut candidate = host;
    loop {
        let Some(suffix) = psl::suffix(candidate.as_bytes()) else {
            return "";
        };
        if !suffix.is_known() {
            return "";
        }
        let Some(matched) = candidate.get(candidate.len() - suffix.as_bytes().len()..) else {
            return "";
        };
        match suffix.typ() {
            Some(psl::Type::Private) => match matched.split_once('.') {
                Some((_, parent)) => candidate = parent,
                None => return "",
            },
            _ => return matched,
        }
    }
}
