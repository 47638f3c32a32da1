use std::sync::OnceLock;

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::prefs::Language;

pub const WORDS_PER_MINUTE: f64 = 200.0;

fn fenced_code() -> &'static Regex {
    static FENCED: OnceLock<Regex> = OnceLock::new();
    FENCED.get_or_init(|| Regex::new(r"(?s)```.*?```").unwrap())
}

fn word() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").unwrap())
}

pub fn count_words(body: &str) -> usize {
    let prose = fenced_code().replace_all(body, "");
    word().find_iter(&prose).count()
}

/// Reading time in whole minutes, never below one. A front matter value wins.
pub fn estimate_minutes(body: &str, fallback: Option<u32>) -> u32 {
    if let Some(minutes) = fallback.filter(|minutes| *minutes > 0) {
        return minutes;
    }
    let words = count_words(body) as f64;
    ((words / WORDS_PER_MINUTE).round() as u32).max(1)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn locale(lang: Language) -> Locale {
    match lang {
        Language::En => Locale::en_US,
        Language::He => Locale::he_IL,
    }
}

fn format_with(raw: &str, lang: Language, format: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.and_utc().format_localized(format, locale(lang)).to_string(),
        None => raw.to_string(),
    }
}

/// "March 5, 2024" on the post page. Unparsable dates are shown as written.
pub fn format_long_date(raw: &str, lang: Language) -> String {
    format_with(raw, lang, "%B %-d, %Y")
}

/// "Mar 5, 2024" on blog cards.
pub fn format_short_date(raw: &str, lang: Language) -> String {
    format_with(raw, lang, "%b %-d, %Y")
}
