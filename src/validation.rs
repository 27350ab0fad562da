//! Presence checks shared by the request DTOs.

use std::fmt;

use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

/// Names of required fields that were absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields {
    pub fields: Vec<&'static str>,
    pub invalid: Vec<String>,
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.fields.is_empty() {
            parts.push(format!("missing required fields: {}", self.fields.join(", ")));
        }
        parts.extend(self.invalid.iter().cloned());
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for MissingFields {}

/// Accumulates presence failures while extracting field values.
#[derive(Debug, Default)]
pub struct FieldCheck {
    missing: Vec<&'static str>,
    invalid: Vec<String>,
}

impl FieldCheck {
    /// Required non-blank text, trimmed.
    pub fn text(&mut self, field: &'static str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    /// Required list; an empty list is present.
    pub fn list(&mut self, field: &'static str, value: Option<Vec<String>>) -> Vec<String> {
        value.unwrap_or_else(|| {
            self.missing.push(field);
            Vec::new()
        })
    }

    /// Required date, `YYYY-MM-DD` or an RFC 3339 date-time.
    pub fn date(&mut self, field: &'static str, value: Option<String>) -> Date {
        let text = self.text(field, value);
        if text.is_empty() {
            return Date::MIN;
        }
        match parse_date(&text) {
            Some(d) => d,
            None => {
                self.invalid.push(format!("{field} is not a valid date: {text:?}"));
                Date::MIN
            }
        }
    }

    pub fn finish(self) -> Result<(), MissingFields> {
        if self.missing.is_empty() && self.invalid.is_empty() {
            Ok(())
        } else {
            Err(MissingFields {
                fields: self.missing,
                invalid: self.invalid,
            })
        }
    }
}

pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| OffsetDateTime::parse(text, &Rfc3339).ok().map(|dt| dt.date()))
}
