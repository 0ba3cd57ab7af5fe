//! Form input normalization and validation helpers.
//!
//! Submitted forms are trimmed once at the boundary, then checked with
//! `validator`. Escaping is left to the view layer so stored values stay
//! exactly what the librarian typed.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Outcome of checking a submitted form: either the typed values to
/// persist, or the messages to show next to the re-rendered form.
pub type Checked<T> = Result<T, Vec<String>>;

/// Forms whose validation messages are listed in a fixed field order.
pub trait FormFields: Validate {
    const FIELDS: &'static [&'static str];

    /// Trim every text field in place.
    fn normalize(&mut self);

    /// Normalize, validate, and collect messages in field order.
    fn check(&mut self) -> Vec<String> {
        self.normalize();
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => messages(&errors, Self::FIELDS),
        }
    }
}

/// Flatten `ValidationErrors` into display messages, ordered by `fields`.
pub fn messages(errors: &ValidationErrors, fields: &[&str]) -> Vec<String> {
    let by_field = errors.field_errors();
    let mut out = Vec::new();
    for field in fields {
        if let Some(list) = by_field.get(*field) {
            for err in list.iter() {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field.replace('_', " ")));
                out.push(msg);
            }
        }
    }
    out
}

pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Parse an optional date field. Empty input is `None`; accepts
/// `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, ()> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ())
}

/// Like `parse_optional_date` but keeps the full instant.
pub fn parse_optional_instant(value: &str) -> Result<Option<DateTime<Utc>>, ()> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()))
        .map_err(|_| ())
}

pub fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn iso_date(value: &str, message: &'static str) -> Result<(), ValidationError> {
    parse_optional_date(value)
        .map(|_| ())
        .map_err(|_| rule("iso_date", message))
}

/// Parse a reference field into a record id.
pub fn parse_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value.trim()).ok()
}

/// A multi-valued form field as submitted: absent, a single value, or
/// repeated keys. Serializes back to the submitted shape, which is how
/// validation errors report the offending value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Selection {
    #[default]
    Empty,
    One(String),
    Many(Vec<String>),
}

impl Selection {
    pub fn values(&self) -> Vec<&str> {
        match self {
            Selection::Empty => Vec::new(),
            Selection::One(v) => vec![v.as_str()],
            Selection::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    pub fn normalize(&mut self) {
        match self {
            Selection::Empty => {}
            Selection::One(v) => trim_in_place(v),
            Selection::Many(vs) => vs.iter_mut().for_each(trim_in_place),
        }
    }

    /// Parse every value as a record id, dropping duplicates but keeping
    /// submission order. Fails if any value is not an id.
    pub fn ids(&self) -> Result<Vec<Uuid>, ()> {
        let mut out: Vec<Uuid> = Vec::new();
        for value in self.values() {
            let id = parse_id(value).ok_or(())?;
            if !out.contains(&id) {
                out.push(id);
            }
        }
        Ok(out)
    }
}

impl From<Vec<Uuid>> for Selection {
    fn from(ids: Vec<Uuid>) -> Self {
        let mut values: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        match values.len() {
            0 => Selection::Empty,
            1 => Selection::One(values.remove(0)),
            _ => Selection::Many(values),
        }
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = Selection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or a sequence of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Selection, E> {
                Ok(Selection::One(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Selection, E> {
                Ok(Selection::Empty)
            }

            fn visit_none<E: de::Error>(self) -> Result<Selection, E> {
                Ok(Selection::Empty)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Selection, A::Error> {
                let mut values = Vec::new();
                while let Some(v) = seq.next_element::<String>()? {
                    values.push(v);
                }
                Ok(match values.len() {
                    0 => Selection::Empty,
                    1 => Selection::One(values.remove(0)),
                    _ => Selection::Many(values),
                })
            }
        }

        deserializer.deserialize_any(SelectionVisitor)
    }
}
