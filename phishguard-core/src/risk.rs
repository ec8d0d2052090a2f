// Human-readable risk factors derived from an aligned feature vector.
// Presentation only: nothing here feeds the classification decision.

use crate::extract::{
    BRAND_MISMATCH_HINT, CONTAINS_AT, HAS_OBFUSCATION, HAS_REDIRECT_WORD, IS_DOMAIN_IP, IS_HTTPS,
    NO_OF_SUB_DOMAIN, SPACIAL_CHAR_RATIO_IN_URL, URL_LENGTH,
};
use crate::vocab::SENTINEL_TLD;
use phishguard_model::{FeatureVector, TLD_COLUMN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFactor {
    BrandLookalike,
    IpAddressHost,
    Obfuscation,
    SensitiveKeywords,
    MultipleSubdomains,
    NotHttps,
    HighSpecialCharRatio,
    VeryLongUrl,
    UncommonTld,
}

impl RiskFactor {
    /// Reporting order.
    pub const PRIORITY: [RiskFactor; 9] = [
        RiskFactor::BrandLookalike,
        RiskFactor::IpAddressHost,
        RiskFactor::Obfuscation,
        RiskFactor::SensitiveKeywords,
        RiskFactor::MultipleSubdomains,
        RiskFactor::NotHttps,
        RiskFactor::HighSpecialCharRatio,
        RiskFactor::VeryLongUrl,
        RiskFactor::UncommonTld,
    ];

    pub fn applies(&self, features: &FeatureVector) -> bool {
        let flag = |column: &str| features.number(column) == 1.0;
        match self {
            RiskFactor::BrandLookalike => flag(BRAND_MISMATCH_HINT),
            RiskFactor::IpAddressHost => flag(IS_DOMAIN_IP),
            RiskFactor::Obfuscation => flag(HAS_OBFUSCATION) || flag(CONTAINS_AT),
            RiskFactor::SensitiveKeywords => flag(HAS_REDIRECT_WORD),
            RiskFactor::MultipleSubdomains => features.number(NO_OF_SUB_DOMAIN) > 2.0,
            RiskFactor::NotHttps => features.number(IS_HTTPS) == 0.0,
            RiskFactor::HighSpecialCharRatio => features.number(SPACIAL_CHAR_RATIO_IN_URL) > 0.25,
            RiskFactor::VeryLongUrl => features.number(URL_LENGTH) > 75.0,
            RiskFactor::UncommonTld => {
                features.label(TLD_COLUMN) == Some(SENTINEL_TLD)
                    && features.number(IS_DOMAIN_IP) == 0.0
            }
        }
    }

    pub fn describe(&self, features: &FeatureVector) -> String {
        match self {
            RiskFactor::BrandLookalike => "Potential Brand Lookalike".to_string(),
            RiskFactor::IpAddressHost => "Uses IP Address Host".to_string(),
            RiskFactor::Obfuscation => "Contains Obfuscation (@ or %)".to_string(),
            RiskFactor::SensitiveKeywords => {
                "Contains Sensitive Keywords (login, verify etc.)".to_string()
            }
            RiskFactor::MultipleSubdomains => format!(
                "Multiple Subdomains ({})",
                features.number(NO_OF_SUB_DOMAIN) as i64
            ),
            RiskFactor::NotHttps => "Not HTTPS".to_string(),
            RiskFactor::HighSpecialCharRatio => "High Special Character Ratio".to_string(),
            RiskFactor::VeryLongUrl => "Very Long URL".to_string(),
            RiskFactor::UncommonTld => "Uncommon/Invalid TLD".to_string(),
        }
    }
}

/// Every applicable factor, in priority order.
pub fn map_risk_factors(features: &FeatureVector) -> Vec<String> {
    RiskFactor::PRIORITY
        .iter()
        .filter(|factor| factor.applies(features))
        .map(|factor| factor.describe(features))
        .collect()
}
