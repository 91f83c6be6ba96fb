//! Delivery-date directive parsing for order notes.
//!
//! Checkout apps write a machine-readable handoff into the order note:
//! `(Delivery Date: 26/08/2025)`. The date may be day-month-year or
//! year-month-day, with `/` or `-` separators, and the label tolerates
//! case and internal whitespace. This module extracts the first directive
//! as a structured date and strips every directive from the note, leaving
//! the human-authored text around it intact.

use std::sync::OnceLock;

use regex::Regex;

/// A delivery date as written in a note directive.
///
/// Field bounds only (month 1-12, day 1-31), no calendar validation:
/// `(Delivery Date: 31/02/2025)` extracts as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

// Compile-once regex patterns via OnceLock.
//
// The directive shape is matched as a whole block so stripping and
// extraction agree on what counts as a directive. Year-month-day requires
// a four-digit leading year; anything else reads as day-month-year.
fn re_directive() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\(\s*delivery\s*date\s*:\s*(?:\d{4}\s*[/-]\s*\d{1,2}\s*[/-]\s*\d{1,2}|\d{1,2}\s*[/-]\s*\d{1,2}\s*[/-]\s*\d{2,4})\s*\)",
        )
        .unwrap()
    })
}

fn re_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn re_trailing_blanks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+\n").unwrap())
}

fn re_break_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Extract the delivery date from the first directive block in `text`.
///
/// Later blocks are ignored; the first occurrence governs even when blocks
/// disagree. Returns `None` when no block matches or the first block's
/// numbers fall outside field bounds.
pub fn extract_delivery_date(text: &str) -> Option<DeliveryDate> {
    let block = re_directive().find(text)?;
    parse_block(block.as_str())
}

/// Remove every directive block from `text`.
///
/// Each block is replaced with a single space so words on either side stay
/// separated. Afterwards: spaces/tabs hanging before a line break are
/// dropped, runs of three or more line breaks collapse to exactly two, and
/// the whole result is trimmed. The `changed` flag compares against the
/// trimmed input, so a note that only loses outer whitespace reads as
/// unchanged.
///
/// Stripping a stripped note is a no-op.
pub fn strip_directives(text: &str) -> (String, bool) {
    let cleaned = re_directive().replace_all(text, " ");
    let cleaned = re_trailing_blanks().replace_all(&cleaned, "\n");
    let cleaned = re_break_runs().replace_all(&cleaned, "\n\n");
    let cleaned = cleaned.trim().to_string();
    let changed = cleaned != text.trim();
    (cleaned, changed)
}

/// Parse the three numbers out of one matched directive block.
fn parse_block(block: &str) -> Option<DeliveryDate> {
    let mut numbers = re_number().find_iter(block).map(|m| m.as_str());
    let first = numbers.next()?;
    let second = numbers.next()?;
    let third = numbers.next()?;

    let (year, month, day) = if first.len() == 4 {
        // Year-month-day with a full year.
        (first.parse().ok()?, second.parse().ok()?, third.parse().ok()?)
    } else {
        // Day-month-year; two-digit years expand around the 1970 pivot.
        let year = expand_year(third)?;
        (year, second.parse().ok()?, first.parse().ok()?)
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(DeliveryDate { year, month, day })
}

/// Two-digit years map to 19xx from 70 up, 20xx below; longer years are
/// taken literally.
fn expand_year(raw: &str) -> Option<i32> {
    let value: i32 = raw.parse().ok()?;
    if raw.len() <= 2 {
        Some(if value >= 70 { 1900 + value } else { 2000 + value })
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_day_month_year() {
        let date = extract_delivery_date("Please hurry (Delivery Date: 26/08/2025) thanks");
        assert_eq!(
            date,
            Some(DeliveryDate { year: 2025, month: 8, day: 26 })
        );
    }

    #[test]
    fn extracts_year_month_day() {
        let date = extract_delivery_date("(Delivery Date: 2025-08-26)");
        assert_eq!(
            date,
            Some(DeliveryDate { year: 2025, month: 8, day: 26 })
        );
    }

    #[test]
    fn label_tolerates_case_and_whitespace() {
        let date = extract_delivery_date("( DELIVERY   DATE :  5-3-2026 )");
        assert_eq!(
            date,
            Some(DeliveryDate { year: 2026, month: 3, day: 5 })
        );
    }

    #[test]
    fn two_digit_year_pivots_at_seventy() {
        let late = extract_delivery_date("(Delivery Date: 01/01/99)").unwrap();
        assert_eq!(late.year, 1999);
        let early = extract_delivery_date("(Delivery Date: 01/01/26)").unwrap();
        assert_eq!(early.year, 2026);
    }

    #[test]
    fn first_block_governs() {
        let note = "(Delivery Date: 01/02/2025) changed to (Delivery Date: 03/04/2025)";
        let date = extract_delivery_date(note).unwrap();
        assert_eq!((date.day, date.month), (1, 2));
    }

    #[test]
    fn no_directive_extracts_nothing() {
        assert_eq!(extract_delivery_date("just a note, due 2025-08-26"), None);
        assert_eq!(extract_delivery_date(""), None);
    }

    #[test]
    fn out_of_bounds_fields_extract_nothing() {
        assert_eq!(extract_delivery_date("(Delivery Date: 26/13/2025)"), None);
        assert_eq!(extract_delivery_date("(Delivery Date: 32/08/2025)"), None);
    }

    #[test]
    fn lenient_calendar_dates_extract() {
        // Day 31 in a 30-day month passes; only field bounds are checked.
        let date = extract_delivery_date("(Delivery Date: 31/02/2025)").unwrap();
        assert_eq!((date.day, date.month, date.year), (31, 2, 2025));
    }

    #[test]
    fn strip_removes_block_and_keeps_prose() {
        let (cleaned, changed) =
            strip_directives("Leave at the back door. (Delivery Date: 26/08/2025) Ring twice.");
        assert_eq!(cleaned, "Leave at the back door.   Ring twice.");
        assert!(changed);
    }

    #[test]
    fn strip_removes_every_block() {
        let note = "(Delivery Date: 01/02/2025) text (Delivery Date: 2025-04-03)";
        let (cleaned, changed) = strip_directives(note);
        assert_eq!(cleaned, "text");
        assert!(changed);
    }

    #[test]
    fn strip_collapses_break_runs_and_trailing_blanks() {
        let note = "line one   \n\n\n\nline two (Delivery Date: 1-1-2025)";
        let (cleaned, _) = strip_directives(note);
        assert_eq!(cleaned, "line one\n\nline two");
    }

    #[test]
    fn strip_is_idempotent() {
        let notes = [
            "Leave at the back door. (Delivery Date: 26/08/2025) Ring twice.",
            "(Delivery Date: 01/02/2025)\n\n\n(Delivery Date: 03/04/05)",
            "no directive here\n\n\n\njust text   \n",
            "",
        ];
        for note in notes {
            let (once, _) = strip_directives(note);
            let (twice, changed) = strip_directives(&once);
            assert_eq!(twice, once, "strip not idempotent for {note:?}");
            assert!(!changed, "second strip reported a change for {note:?}");
        }
    }

    #[test]
    fn strip_of_directive_only_note_is_empty() {
        let (cleaned, changed) = strip_directives("(Delivery Date: 26/08/2025)");
        assert_eq!(cleaned, "");
        assert!(changed);
    }

    #[test]
    fn strip_removes_shape_matching_blocks_even_when_unextractable() {
        // Month 77 extracts nothing but still strips: shape, not semantics,
        // drives stripping.
        let note = "before (Delivery Date: 12/77/2025) after";
        assert_eq!(extract_delivery_date(note), None);
        let (cleaned, changed) = strip_directives(note);
        assert_eq!(cleaned, "before   after");
        assert!(changed);
    }

    #[test]
    fn unchanged_note_reports_no_change() {
        let (cleaned, changed) = strip_directives("  plain note  ");
        assert_eq!(cleaned, "plain note");
        assert!(!changed);
    }
}
