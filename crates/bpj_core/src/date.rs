use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `14 окт. 2026 г.`
    Short,
    /// `14 октября 2026 г.`
    Long,
}

const SHORT_MONTHS: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.",
    "июл.", "авг.", "сент.", "окт.", "нояб.", "дек.",
];

const LONG_MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Formats a stored date the way the journal displays it. Values that do not
/// parse are shown as they are.
pub fn format_date(value: Option<&str>, style: DateStyle) -> String {
    use chrono::Datelike;

    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    let Some(date) = parse_date(value) else {
        return value.to_string();
    };
    let months = match style {
        DateStyle::Short => &SHORT_MONTHS,
        DateStyle::Long => &LONG_MONTHS,
    };
    format!(
        "{:02} {} {} г.",
        date.day(),
        months[date.month0() as usize],
        date.year()
    )
}
