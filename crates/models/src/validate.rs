//! Field checks shared by every entity's input type.
//!
//! A [`Checker`] collects all problems of one payload before failing, so a
//! client sees every missing or invalid field at once. In create mode absent
//! required fields are reported; in patch mode absent means "leave as is".

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};

pub const NAME_MAX: usize = 200;
pub const TEXT_MAX: usize = 2000;
pub const EMAIL_MAX: usize = 254;
pub const PHONE_MAX: usize = 32;

#[derive(Debug)]
pub struct Checker {
    errors: FieldErrors,
    required: bool,
}

impl Checker {
    pub fn for_create() -> Self {
        Self {
            errors: FieldErrors::new(),
            required: true,
        }
    }

    pub fn for_patch() -> Self {
        Self {
            errors: FieldErrors::new(),
            required: false,
        }
    }

    pub fn invalid(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    fn absent(&mut self, field: &str) {
        if self.required {
            self.errors.missing(field);
        }
    }

    /// Required text: trimmed, non-empty, bounded.
    pub fn text(&mut self, field: &str, value: Option<String>, max_len: usize) -> Option<String> {
        let Some(raw) = value else {
            self.absent(field);
            return None;
        };
        let v = raw.trim();
        if v.is_empty() {
            self.invalid(field, "must not be empty");
            return None;
        }
        if v.chars().count() > max_len {
            self.invalid(field, format!("must be at most {max_len} characters"));
            return None;
        }
        Some(v.to_string())
    }

    /// Optional text. `Some(None)` means the caller supplied a blank value (clear it).
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<String>,
        max_len: usize,
    ) -> Option<Option<String>> {
        let raw = value?;
        let v = raw.trim();
        if v.is_empty() {
            return Some(None);
        }
        if v.chars().count() > max_len {
            self.invalid(field, format!("must be at most {max_len} characters"));
            return None;
        }
        Some(Some(v.to_string()))
    }

    pub fn email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let v = self.text(field, value, EMAIL_MAX)?;
        self.email_shape(field, v)
    }

    pub fn optional_email(&mut self, field: &str, value: Option<String>) -> Option<Option<String>> {
        match self.optional_text(field, value, EMAIL_MAX)? {
            None => Some(None),
            Some(v) => self.email_shape(field, v).map(Some),
        }
    }

    fn email_shape(&mut self, field: &str, v: String) -> Option<String> {
        match v.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !v.contains(char::is_whitespace) =>
            {
                Some(v)
            }
            _ => {
                self.invalid(field, "must be a valid email address");
                None
            }
        }
    }

    pub fn phone(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let v = self.text(field, value, PHONE_MAX)?;
        self.phone_shape(field, v)
    }

    pub fn optional_phone(&mut self, field: &str, value: Option<String>) -> Option<Option<String>> {
        match self.optional_text(field, value, PHONE_MAX)? {
            None => Some(None),
            Some(v) => self.phone_shape(field, v).map(Some),
        }
    }

    fn phone_shape(&mut self, field: &str, v: String) -> Option<String> {
        let allowed = v.chars().all(|c| c.is_ascii_digit() || " +-().".contains(c));
        let digits = v.chars().filter(|c| c.is_ascii_digit()).count();
        if allowed && digits >= 3 {
            Some(v)
        } else {
            self.invalid(field, "must be a phone number");
            None
        }
    }

    /// Integer that must be at least 1.
    pub fn positive(&mut self, field: &str, value: Option<i32>) -> Option<i32> {
        let Some(v) = value else {
            self.absent(field);
            return None;
        };
        if v < 1 {
            self.invalid(field, "must be at least 1");
            return None;
        }
        Some(v)
    }

    /// `YYYY-MM-DD`.
    pub fn date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        let v = self.text(field, value, 10)?;
        match parse_date(&v) {
            Some(d) => Some(d),
            None => {
                self.invalid(field, "must be a date formatted YYYY-MM-DD");
                None
            }
        }
    }

    /// `HH:MM`, normalised to two-digit hour and minute.
    pub fn time(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let v = self.text(field, value, 5)?;
        match parse_time(&v) {
            Some(t) => Some(t.format("%H:%M").to_string()),
            None => {
                self.invalid(field, "must be a time formatted HH:MM");
                None
            }
        }
    }

    /// Optional id reference. A blank value clears it.
    pub fn optional_uuid(&mut self, field: &str, value: Option<String>) -> Option<Option<Uuid>> {
        let raw = value?;
        let v = raw.trim();
        if v.is_empty() {
            return Some(None);
        }
        match Uuid::parse_str(v) {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                self.invalid(field, "must be a UUID");
                None
            }
        }
    }

    /// Apply `parse` to a supplied value, reporting `expected` when it fails.
    pub fn parsed<T>(
        &mut self,
        field: &str,
        value: Option<String>,
        expected: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let v = self.text(field, value, 32)?;
        match parse(&v) {
            Some(t) => Some(t),
            None => {
                self.invalid(field, format!("must be one of: {expected}"));
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ModelError> {
        self.errors.into_result()
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}
