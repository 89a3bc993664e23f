//! Voice parameter ranges, request overrides, and resolved settings.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid range for stability, similarity boost, and style.
pub const UNIT_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Valid range for the speaking rate multiplier.
pub const SPEAKING_RATE_RANGE: RangeInclusive<f32> = 0.7..=1.3;

/// Parses a string-encoded numeric override and clamps it into `range`.
///
/// Only the leading numeric part is read, so `"0.9x"` counts as `0.9` and
/// `"Infinity"` clamps to the upper bound. Missing, blank, and non-numeric
/// input yields `None` so the persona default applies. Out-of-range numbers
/// are corrected to the nearest bound, never rejected.
pub fn parse_override(raw: Option<&str>, range: &RangeInclusive<f32>) -> Option<f32> {
    let parsed = parse_leading_number(raw?.trim())?;
    if parsed.is_nan() {
        return None;
    }
    Some(parsed.clamp(*range.start(), *range.end()))
}

/// Reads the longest decimal number at the start of `text`.
fn parse_leading_number(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let infinity = if bytes.first() == Some(&b'-') {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        return Some(infinity);
    }

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut mantissa_digits = digits_from(end);
    end += mantissa_digits;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa_digits += fraction;
        end += 1 + fraction;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

/// Per-request voice overrides, already clamped into range.
///
/// There is deliberately no similarity-boost override.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VoiceOverrides {
    pub style: Option<f32>,
    pub stability: Option<f32>,
    pub speaking_rate: Option<f32>,
}

impl VoiceOverrides {
    /// Builds overrides from raw form values.
    pub fn parse(
        style: Option<&str>,
        stability: Option<&str>,
        speaking_rate: Option<&str>,
    ) -> Self {
        Self {
            style: parse_override(style, &UNIT_RANGE),
            stability: parse_override(stability, &UNIT_RANGE),
            speaking_rate: parse_override(speaking_rate, &SPEAKING_RATE_RANGE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.stability.is_none() && self.speaking_rate.is_none()
    }
}

/// Final synthesis parameters for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    /// `None` leaves the provider's own default rate.
    pub speaking_rate: Option<f32>,
}

impl ResolvedVoiceSettings {
    /// Returns `true` when every field lies within its documented range.
    pub fn in_range(&self) -> bool {
        UNIT_RANGE.contains(&self.stability)
            && UNIT_RANGE.contains(&self.similarity_boost)
            && UNIT_RANGE.contains(&self.style)
            && self
                .speaking_rate
                .map_or(true, |rate| SPEAKING_RATE_RANGE.contains(&rate))
    }
}
