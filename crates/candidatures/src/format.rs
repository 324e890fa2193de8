//! Presentation helpers: dates, currency, initials and status colors.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Statuses a candidature moves through, in review order.
pub const STATUSES: [&str; 5] = [
    "En attente",
    "Entretien RH",
    "Entretien technique",
    "Accepté",
    "Refusé",
];

const STATUS_COLORS: [(&str, &str); 5] = [
    ("en attente", "#94a3b8"),
    ("entretien rh", "#3b82f6"),
    ("entretien technique", "#f59e0b"),
    ("accepté", "#10b981"),
    ("refusé", "#ef4444"),
];

const DEFAULT_STATUS_COLOR: &str = "#6b7280";

const GROUP_SEPARATOR: char = '\u{202f}';
const CURRENCY_SUFFIX: &str = "\u{a0}DZD";
const MISSING_AMOUNT: &str = "0.00 DA";

/// Parses RFC 3339 timestamps, offset-less date-times (read as UTC) and plain dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    let utc = FixedOffset::east_opt(0)?;
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().with_timezone(&utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&utc))
}

/// Long French date such as `9 février 2026`, in the timestamp's own offset.
pub fn format_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|timestamp| long_date(timestamp.date_naive()))
}

fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_FR[date.month0() as usize],
        date.year()
    )
}

/// Two uppercase letters for an avatar: the initials of the first two words, or the
/// first two letters of a single word.
pub fn avatar_initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let initials: String = match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(2).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(1)).collect(),
    };
    initials.to_uppercase()
}

/// French-style Algerian dinar amount, e.g. `1 234,50 DZD` with narrow no-break spaces.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return MISSING_AMOUNT.to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount.is_sign_negative() && cents > 0 {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{},{:02}{CURRENCY_SUFFIX}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

/// Hex color for a status, case and surrounding whitespace ignored.
pub fn status_color(status: &str) -> &'static str {
    let normalized = status.trim().to_lowercase();
    STATUS_COLORS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_STATUS_COLOR)
}
