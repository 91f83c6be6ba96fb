//! Canonical delivery-date tags on the order's tag set.
//!
//! Shopify carries tags as one comma-delimited string and does not enforce
//! uniqueness, so the tag set is treated as a multiset that normalization
//! reduces to a set with respect to the target date: after one pass the
//! order holds exactly one tag rendering that date, in the configured
//! format. Non-date tags and date tags for other dates pass through
//! untouched.

use std::sync::OnceLock;

use regex::Regex;

use crate::directive::DeliveryDate;

/// Which canonical rendering date tags use. Process-wide preference,
/// configured once and threaded in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDateFormat {
    /// `26-08-2025`
    DayMonthYear,
    /// `2025-08-26`
    YearMonthDay,
}

impl TagDateFormat {
    /// Parse the configuration value (`dd-mm-yyyy` or `yyyy-mm-dd`).
    pub fn from_config(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dd-mm-yyyy" => Some(Self::DayMonthYear),
            "yyyy-mm-dd" => Some(Self::YearMonthDay),
            _ => None,
        }
    }

    /// Render a date in this format.
    pub fn render(&self, date: &DeliveryDate) -> String {
        match self {
            Self::DayMonthYear => {
                format!("{:02}-{:02}-{:04}", date.day, date.month, date.year)
            }
            Self::YearMonthDay => {
                format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
            }
        }
    }
}

fn re_day_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap())
}

fn re_year_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap())
}

/// Parse a tag that has either canonical date shape.
///
/// The same field bounds as extraction apply (month 1-12, day 1-31), so a
/// digit pattern like `99-99-2025` is not date-like. The two shapes cannot
/// collide: the leading group is two digits in one and four in the other.
pub fn parse_date_tag(tag: &str) -> Option<DeliveryDate> {
    let (year, month, day) = if let Some(caps) = re_day_first().captures(tag) {
        (caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else if let Some(caps) = re_year_first().captures(tag) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else {
        return None;
    };
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(DeliveryDate { year, month, day })
}

/// Split Shopify's comma-delimited tag string into individual tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into Shopify's wire form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Produce a tag set carrying exactly one rendering of `target`.
///
/// Survivors keep their original relative order. A tag is dropped when it
/// renders the same date as `target` in either canonical format — except
/// the first occurrence of the exact preferred rendering, which survives
/// in place. When no survivor equals the preferred rendering, it is
/// appended at the end. Normalizing an already-normalized set with the
/// same target returns it unchanged.
pub fn normalize_tags(
    existing: &[String],
    target: &DeliveryDate,
    format: TagDateFormat,
) -> Vec<String> {
    let canonical = format.render(target);
    let mut out = Vec::with_capacity(existing.len() + 1);
    let mut have_canonical = false;

    for tag in existing {
        match parse_date_tag(tag) {
            Some(date) if date == *target => {
                if *tag == canonical && !have_canonical {
                    have_canonical = true;
                    out.push(tag.clone());
                }
                // Equivalent renderings (and duplicate canonicals) collapse.
            }
            _ => out.push(tag.clone()),
        }
    }

    if !have_canonical {
        out.push(canonical);
    }
    out
}
