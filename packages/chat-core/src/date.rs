//! Bubble timestamp formatting.
//!
//! Date patterns use day.js-style tokens (`HH:mm DD/MM/YYYY`). A pattern is
//! compiled once into a chrono format string and reused for every bubble.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

use crate::ConfigError;

/// Tokens ordered longest first so greedy matching picks `MMMM` over `MM`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("d", "%w"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
];

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    strftime: String,
}

impl DatePattern {
    /// Compile a day.js-style pattern. Text inside `[...]` is kept literally.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.trim().is_empty() {
            return Err(ConfigError::InvalidDateFormat(pattern.to_string()));
        }

        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        'outer: while !rest.is_empty() {
            if let Some(escaped) = rest.strip_prefix('[') {
                match escaped.find(']') {
                    Some(end) => {
                        push_literal(&mut strftime, &escaped[..end]);
                        rest = &escaped[end + 1..];
                    }
                    None => {
                        push_literal(&mut strftime, rest);
                        rest = "";
                    }
                }
                continue;
            }

            for (token, spec) in TOKENS {
                if let Some(after) = rest.strip_prefix(token) {
                    strftime.push_str(spec);
                    rest = after;
                    continue 'outer;
                }
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                push_literal(&mut strftime, c.encode_utf8(&mut [0; 4]));
            }
            rest = chars.as_str();
        }

        if StrftimeItems::new(&strftime).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(pattern.to_string()));
        }

        Ok(Self {
            source: pattern.to_string(),
            strftime,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The chrono format string this pattern compiled to.
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    pub fn format<Tz>(&self, date: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        date.format(&self.strftime).to_string()
    }
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Format a bubble date in local time. A missing date formats the current time.
pub fn format_message_date(date: Option<DateTime<Utc>>, pattern: &DatePattern) -> String {
    let date = date.unwrap_or_else(Utc::now);
    pattern.format(&date.with_timezone(&Local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 3).unwrap()
    }

    #[test]
    fn test_default_pattern() {
        let pattern = DatePattern::parse("HH:mm DD/MM/YYYY").unwrap();
        assert_eq!(pattern.strftime(), "%H:%M %d/%m/%Y");
        assert_eq!(pattern.format(&sample()), "09:05 07/03/2024");
    }

    #[test]
    fn test_unpadded_and_names() {
        let pattern = DatePattern::parse("dddd D MMMM YY, h:m A").unwrap();
        assert_eq!(pattern.format(&sample()), "Thursday 7 March 24, 9:5 AM");

        let short = DatePattern::parse("ddd MMM").unwrap();
        assert_eq!(short.format(&sample()), "Thu Mar");
    }

    #[test]
    fn test_escapes_and_percent() {
        let pattern = DatePattern::parse("[Today at] HH[h] 100%").unwrap();
        assert_eq!(pattern.format(&sample()), "Today at 09h 100%");

        let unterminated = DatePattern::parse("HH [oops").unwrap();
        assert_eq!(unterminated.format(&sample()), "09 [oops");
    }

    #[test]
    fn test_offsets() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let date = sample().with_timezone(&offset);

        assert_eq!(DatePattern::parse("HH Z").unwrap().format(&date), "11 +02:00");
        assert_eq!(DatePattern::parse("ZZ").unwrap().format(&date), "+0200");
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(
            DatePattern::parse(""),
            Err(ConfigError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_missing_date_uses_now() {
        let pattern = DatePattern::parse("HH").unwrap();
        let before = Local::now().hour();
        let formatted = format_message_date(None, &pattern);
        let after = Local::now().hour();

        let hour: u32 = formatted.parse().unwrap();
        assert!(hour == before || hour == after);
    }
}
