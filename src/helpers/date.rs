//! Date helper functions
//!
//! Articles carry their publication date as free text, usually in the
//! `<day> <month name> <year>` form ("20 April 2025", "3 maart 2024").

use chrono::{Datelike, Local, NaiveDate};

/// Dutch month names, January first
const DUTCH_MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Numeric formats tried before the month-name form
const NUMERIC_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a publication date
///
/// # Examples
/// ```ignore
/// parse_date("20 April 2025")   // -> 2025-04-20
/// parse_date("zondag 3 maart 2024") // -> 2024-03-03
/// parse_date("01/02/2025")     // -> 2025-02-01
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in NUMERIC_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // Leading weekday names and the like are ignored: only the last three
    // words count.
    let words: Vec<&str> = s.split_whitespace().collect();
    let n = words.len();
    if n < 3 {
        return None;
    }
    let (day, month, year) = (words[n - 3], words[n - 2], words[n - 1]);

    let day: u32 = day.trim_end_matches(['.', ',']).parse().ok()?;
    let month = month_number(month.trim_end_matches(['.', ',']))?;
    let year: i32 = year.trim_end_matches(['.', ',']).parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve a Dutch or English month name (full or abbreviated) to 1..=12
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name.is_empty() {
        return None;
    }

    let full = DUTCH_MONTHS
        .iter()
        .position(|m| *m == name)
        .or_else(|| ENGLISH_MONTHS.iter().position(|m| *m == name));
    if let Some(idx) = full {
        return Some(idx as u32 + 1);
    }

    // "mrt" is the usual Dutch abbreviation for maart
    if name == "mrt" {
        return Some(3);
    }

    if name.chars().count() >= 3 {
        let abbreviated = DUTCH_MONTHS
            .iter()
            .position(|m| m.starts_with(&name))
            .or_else(|| ENGLISH_MONTHS.iter().position(|m| m.starts_with(&name)));
        if let Some(idx) = abbreviated {
            return Some(idx as u32 + 1);
        }
    }

    None
}

/// Format a date the way the site writes them ("19 oktober 2026")
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        DUTCH_MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Today's date in site format
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

/// ISO 8601 form used in `<time datetime>` attributes
pub fn iso_date(s: &str) -> Option<String> {
    parse_date(s).map(|d| d.format("%Y-%m-%d").to_string())
}
