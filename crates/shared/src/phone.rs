//! Phone number canonicalization.
//!
//! The canonical form `+<country code><subscriber digits>` is the join key
//! between a signed-in identity and the free-text mobile numbers hosts type
//! into their guest lists.
//!
//! This is a heuristic, not a telephony parser. Numbers are assumed to come
//! from a single market: a bare national number gets the configured default
//! country code, anything that already starts with a recognised prefix and
//! is longer than a national number is kept as-is, and everything else is
//! passed through best-effort. Foreign numbers whose national part is not
//! exactly [`DEFAULT_NATIONAL_NUMBER_LENGTH`] digits and that do not start
//! with a recognised prefix come out without a country code; that limitation
//! is kept on purpose so existing guest rows keep matching.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Country code assumed for bare national numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "91";

/// Length of a national (subscriber) number in the default market.
pub const DEFAULT_NATIONAL_NUMBER_LENGTH: usize = 10;

/// A phone number in canonical `+<digits>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the number looks like a dialable E.164 number
    /// (`+` followed by 11 to 15 digits).
    ///
    /// Canonicalization never fails, so callers that care about garbage
    /// input check this explicitly.
    pub fn is_well_formed(&self) -> bool {
        let Some(digits) = self.0.strip_prefix('+') else {
            return false;
        };
        (11..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
    }

    /// Whether canonicalization left no digits at all.
    pub fn is_empty(&self) -> bool {
        self.0.len() <= 1
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes phone numbers for a single-market user base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalizer {
    default_country_code: String,
    recognized_prefixes: Vec<String>,
    national_number_length: usize,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self {
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
            recognized_prefixes: vec![DEFAULT_COUNTRY_CODE.to_string()],
            national_number_length: DEFAULT_NATIONAL_NUMBER_LENGTH,
        }
    }
}

impl PhoneNormalizer {
    /// Creates a normalizer with an explicit default country code and prefix table.
    ///
    /// An empty prefix table falls back to the default country code alone.
    pub fn new(default_country_code: impl Into<String>, recognized_prefixes: Vec<String>) -> Self {
        let default_country_code = default_country_code.into();
        let recognized_prefixes = if recognized_prefixes.is_empty() {
            vec![default_country_code.clone()]
        } else {
            recognized_prefixes
        };

        Self {
            default_country_code,
            recognized_prefixes,
            national_number_length: DEFAULT_NATIONAL_NUMBER_LENGTH,
        }
    }

    /// Overrides the national number length (10 by default).
    pub fn with_national_number_length(mut self, length: usize) -> Self {
        self.national_number_length = length;
        self
    }

    pub fn default_country_code(&self) -> &str {
        &self.default_country_code
    }

    /// Canonicalizes `raw`. Total over all input strings.
    pub fn normalize(&self, raw: &str) -> CanonicalPhone {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let has_country_code = digits.len() > self.national_number_length
            && self
                .recognized_prefixes
                .iter()
                .any(|prefix| digits.starts_with(prefix.as_str()));

        if has_country_code {
            CanonicalPhone(format!("+{}", digits))
        } else if digits.len() == self.national_number_length {
            CanonicalPhone(format!("+{}{}", self.default_country_code, digits))
        } else {
            CanonicalPhone(format!("+{}", digits))
        }
    }
}

/// Canonicalizes `raw` with the default market settings.
pub fn normalize_phone(raw: &str) -> String {
    PhoneNormalizer::default().normalize(raw).into_inner()
}

/// Returns the ASCII digits in `raw`.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
