//! Salary text normalization.
//!
//! Listing pages render pay as free text ("от 50 000 ₽/месяц",
//! "по договорённости", "60 000 — 90 000 руб. в месяц"). [`normalize`] turns
//! it into a [`SalaryShape`], trying the known layouts in a fixed order.

use once_cell::sync::Lazy;
use regex::Regex;

/// Currency token (optionally dot-terminated), connector, period token.
const UNITS: &str = r"(\p{L}+)\.?\s*(?:(?:[/,—–-]|в|за|per)\s*)?(\p{L}+)";

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(\d+)\s*[—–-]\s*(\d+)\s*{}$", UNITS)).expect("valid range regex")
});

static BOUNDED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(\p{{L}}+(?:\s+\p{{L}}+)?)\s*(\d+)\s*{}$", UNITS))
        .expect("valid bounded regex")
});

static SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)^(\d+)\s*{}$", UNITS)).expect("valid single-value regex")
});

const FROM_MARKERS: &[&str] = &["от", "from"];
const TO_MARKERS: &[&str] = &["до", "to", "up to"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalaryShape {
    /// Pay stated only in words, e.g. "по договорённости".
    Described { description: String },
    RangeWithUnits {
        min: i64,
        max: i64,
        currency: String,
        period: String,
    },
    BoundedFrom {
        min: i64,
        currency: String,
        period: String,
    },
    BoundedTo {
        max: i64,
        currency: String,
        period: String,
    },
    /// An exact figure; stored as min = max.
    SingleValue {
        amount: i64,
        currency: String,
        period: String,
    },
    Unparsed,
}

impl SalaryShape {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, SalaryShape::Unparsed)
    }
}

/// Classifies `raw` into the first matching salary layout.
pub fn normalize(raw: &str) -> SalaryShape {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SalaryShape::Unparsed;
    }

    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return SalaryShape::Described {
            description: trimmed.to_string(),
        };
    }

    let cleaned = clean(trimmed);

    parse_range(&cleaned)
        .or_else(|| parse_bounded(&cleaned))
        .or_else(|| parse_single(&cleaned))
        .unwrap_or(SalaryShape::Unparsed)
}

fn parse_range(text: &str) -> Option<SalaryShape> {
    let caps = RANGE_RE.captures(text)?;
    let a: i64 = caps[1].parse().ok()?;
    let b: i64 = caps[2].parse().ok()?;
    Some(SalaryShape::RangeWithUnits {
        min: a.min(b),
        max: a.max(b),
        currency: caps[3].to_string(),
        period: caps[4].to_string(),
    })
}

fn parse_bounded(text: &str) -> Option<SalaryShape> {
    let caps = BOUNDED_RE.captures(text)?;
    let marker = caps[1].to_lowercase();
    let amount: i64 = caps[2].parse().ok()?;
    let currency = caps[3].to_string();
    let period = caps[4].to_string();

    if FROM_MARKERS.contains(&marker.as_str()) {
        Some(SalaryShape::BoundedFrom { min: amount, currency, period })
    } else if TO_MARKERS.contains(&marker.as_str()) {
        Some(SalaryShape::BoundedTo { max: amount, currency, period })
    } else {
        // A bounded layout with an unknown marker is not a single value either.
        Some(SalaryShape::Unparsed)
    }
}

fn parse_single(text: &str) -> Option<SalaryShape> {
    let caps = SINGLE_RE.captures(text)?;
    let amount: i64 = caps[1].parse().ok()?;
    Some(SalaryShape::SingleValue {
        amount,
        currency: caps[2].to_string(),
        period: caps[3].to_string(),
    })
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
        || matches!(c, '.' | '/' | ',' | '—' | '–' | '-')
}

/// Drops formatting noise and glues digit groups ("50 000" -> "50000").
fn clean(raw: &str) -> String {
    let mut mapped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '₽' => mapped.push_str(" руб "),
            '$' => mapped.push_str(" USD "),
            '€' => mapped.push_str(" EUR "),
            c if is_allowed(c) => mapped.push(c),
            _ => mapped.push(' '),
        }
    }

    let chars: Vec<char> = mapped.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != ' ' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
        let between_digits = start > 0
            && chars[start - 1].is_ascii_digit()
            && i < chars.len()
            && chars[i].is_ascii_digit();
        if !between_digits && start > 0 && i < chars.len() {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_joins_thin_space_groups() {
        assert_eq!(clean("50\u{2009}000 — 80\u{a0}000 ₽/месяц"), "50000 — 80000 руб /месяц");
    }

    #[test]
    fn clean_drops_noise_at_edges() {
        assert_eq!(clean("*60 000 руб.*"), "60000 руб.");
    }
}
