//! Recognition and canonicalisation of Iranian phone numbers.
//!
//! A raw value is first cleaned down to ASCII digits (plus a leading `+`), then
//! matched against an ordered list of shapes. Numbers that already start with
//! `0` are stored as cleaned; everything else is rewritten by its prefix
//! (`+98`, `0098`, `98`, then a missing leading zero).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,
    #[error("unrecognized phone format: {0}")]
    UnrecognizedFormat(String),
}

/// Recognised phone shapes, in matching order. Several shapes overlap, so the
/// order is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneShape {
    /// `+98` and ten digits.
    InternationalPlus,
    /// `0098` and ten digits.
    InternationalDoubleZero,
    /// `98` and ten digits.
    CountryCode,
    /// `09` and nine digits.
    Mobile,
    /// `9` and nine digits.
    MobileMissingZero,
    /// Any ten digits.
    TenDigit,
    /// `0` and ten digits.
    LandlineWithArea,
    /// `0` and two to nine digits.
    ShortLandline,
}

impl PhoneShape {
    pub const ALL: [PhoneShape; 8] = [
        PhoneShape::InternationalPlus,
        PhoneShape::InternationalDoubleZero,
        PhoneShape::CountryCode,
        PhoneShape::Mobile,
        PhoneShape::MobileMissingZero,
        PhoneShape::TenDigit,
        PhoneShape::LandlineWithArea,
        PhoneShape::ShortLandline,
    ];

    fn pattern(self) -> &'static str {
        match self {
            PhoneShape::InternationalPlus => r"^\+98[0-9]{10}$",
            PhoneShape::InternationalDoubleZero => r"^0098[0-9]{10}$",
            PhoneShape::CountryCode => r"^98[0-9]{10}$",
            PhoneShape::Mobile => r"^09[0-9]{9}$",
            PhoneShape::MobileMissingZero => r"^9[0-9]{9}$",
            PhoneShape::TenDigit => r"^[0-9]{10}$",
            PhoneShape::LandlineWithArea => r"^0[0-9]{10}$",
            PhoneShape::ShortLandline => r"^0[0-9]{2,9}$",
        }
    }

    fn canonicalize(self, cleaned: &str) -> String {
        match self {
            PhoneShape::Mobile | PhoneShape::LandlineWithArea | PhoneShape::ShortLandline => {
                cleaned.to_string()
            }
            _ => rewrite_by_prefix(cleaned),
        }
    }
}

static SHAPES: Lazy<Vec<(PhoneShape, Regex)>> = Lazy::new(|| {
    PhoneShape::ALL
        .into_iter()
        .map(|shape| {
            let regex = Regex::new(shape.pattern()).expect("valid phone pattern");
            (shape, regex)
        })
        .collect()
});

/// Validates `raw` and returns its canonical form.
pub fn validate_phone(raw: &str) -> Result<String, PhoneError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }

    let cleaned = clean_phone(trimmed);
    let shape = classify_phone(&cleaned)
        .ok_or_else(|| PhoneError::UnrecognizedFormat(trimmed.to_string()))?;
    Ok(shape.canonicalize(&cleaned))
}

/// Reduces `raw` to ASCII digits, keeping a `+` only when it leads the value.
/// Persian and Arabic-Indic digits are folded to their ASCII equivalents.
pub fn clean_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter_map(ascii_digit));
    out
}

pub fn classify_phone(cleaned: &str) -> Option<PhoneShape> {
    SHAPES
        .iter()
        .find(|(_, regex)| regex.is_match(cleaned))
        .map(|(shape, _)| *shape)
}

/// True for canonical mobile numbers (`09` and nine digits).
pub fn is_mobile(canonical: &str) -> bool {
    classify_phone(canonical) == Some(PhoneShape::Mobile)
}

// Prefixes are checked in a fixed order, so a ten-digit `98...` number is
// treated as carrying the country code rather than as a bare mobile number.
fn rewrite_by_prefix(cleaned: &str) -> String {
    for (prefix, intl_prefix_len) in [("+98", 1), ("0098", 2), ("98", 0)] {
        if cleaned.starts_with(prefix) {
            return strip_country_code(cleaned, prefix, intl_prefix_len);
        }
    }
    if cleaned.len() == 10 && !cleaned.starts_with('0') {
        format!("0{cleaned}")
    } else {
        cleaned.to_string()
    }
}

// Mobile numbers lose the country code in favour of a single leading zero.
// Other numbers only lose the international prefix (`+` or `00`) and keep `98`.
fn strip_country_code(cleaned: &str, prefix: &str, intl_prefix_len: usize) -> String {
    let rest = &cleaned[prefix.len()..];
    if rest.starts_with('9') {
        format!("0{rest}")
    } else {
        cleaned[intl_prefix_len..].to_string()
    }
}

fn ascii_digit(ch: char) -> Option<char> {
    match ch {
        '0'..='9' => Some(ch),
        '\u{06F0}'..='\u{06F9}' => char::from_digit(ch as u32 - 0x06F0, 10),
        '\u{0660}'..='\u{0669}' => char::from_digit(ch as u32 - 0x0660, 10),
        _ => None,
    }
}
