//! Inventory item (physical copy of a book) model and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{format_date, Book};
use crate::validation::{self, Checked, FormFields};

/// Availability of a single copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inventory_status")]
pub enum InventoryStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl InventoryStatus {
    pub const ALL: [InventoryStatus; 4] = [
        InventoryStatus::Maintenance,
        InventoryStatus::Available,
        InventoryStatus::Loaned,
        InventoryStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Available => "Available",
            InventoryStatus::Maintenance => "Maintenance",
            InventoryStatus::Loaned => "Loaned",
            InventoryStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(InventoryStatus::Available),
            "Maintenance" => Ok(InventoryStatus::Maintenance),
            "Loaned" => Ok(InventoryStatus::Loaned),
            "Reserved" => Ok(InventoryStatus::Reserved),
            other => Err(format!("unknown inventory status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub book_id: Uuid,
    pub imprint: String,
    pub status: InventoryStatus,
    pub due_back: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItemFields {
    pub book_id: Uuid,
    pub imprint: String,
    pub status: InventoryStatus,
    pub due_back: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(id: Uuid, fields: InventoryItemFields) -> Self {
        Self {
            id,
            book_id: fields.book_id,
            imprint: fields.imprint,
            status: fields.status,
            due_back: fields.due_back,
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back.date_naive())
    }

    pub fn due_back_iso(&self) -> String {
        self.due_back.date_naive().to_string()
    }
}

/// Inventory item with its book reference resolved
#[derive(Debug, Clone)]
pub struct InventoryListing {
    pub item: InventoryItem,
    /// `None` when the reference dangles
    pub book: Option<Book>,
}

/// Inventory item create/update form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct InventoryItemForm {
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "book_reference")
    )]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[validate(custom(function = "status_value"))]
    pub status: String,
    #[validate(custom(function = "due_date"))]
    pub due_back: String,
}

fn book_reference(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && validation::parse_id(value).is_none() {
        return Err(validation::rule("reference", "Book not found"));
    }
    Ok(())
}

fn status_value(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.parse::<InventoryStatus>().is_ok() {
        return Ok(());
    }
    Err(validation::rule("status", "Invalid status"))
}

fn due_date(value: &str) -> Result<(), ValidationError> {
    validation::parse_optional_instant(value)
        .map(|_| ())
        .map_err(|_| validation::rule("iso_date", "Invalid date"))
}

impl FormFields for InventoryItemForm {
    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn normalize(&mut self) {
        validation::trim_in_place(&mut self.book);
        validation::trim_in_place(&mut self.imprint);
        validation::trim_in_place(&mut self.status);
        validation::trim_in_place(&mut self.due_back);
    }
}

impl InventoryItemForm {
    /// Validate the submission. An omitted status means `Maintenance`
    /// and an omitted due date means `now`.
    pub fn checked(&mut self, now: DateTime<Utc>) -> Checked<InventoryItemFields> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        let book_id = validation::parse_id(&self.book)
            .ok_or_else(|| vec!["Book not found".to_string()])?;
        let status = if self.status.is_empty() {
            InventoryStatus::default()
        } else {
            self.status
                .parse()
                .map_err(|_| vec!["Invalid status".to_string()])?
        };
        let due_back = validation::parse_optional_instant(&self.due_back)
            .ok()
            .flatten()
            .unwrap_or(now);
        Ok(InventoryItemFields {
            book_id,
            imprint: self.imprint.clone(),
            status,
            due_back,
        })
    }

    pub fn book_id(&self) -> Option<Uuid> {
        validation::parse_id(&self.book)
    }
}

impl From<&InventoryItem> for InventoryItemForm {
    fn from(item: &InventoryItem) -> Self {
        Self {
            book: item.book_id.to_string(),
            imprint: item.imprint.clone(),
            status: item.status.to_string(),
            due_back: item.due_back_iso(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_when_omitted() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut form = InventoryItemForm {
            book: Uuid::new_v4().to_string(),
            imprint: "Allen & Unwin, 1937".into(),
            ..InventoryItemForm::default()
        };
        let fields = form.checked(now).unwrap();
        assert_eq!(fields.status, InventoryStatus::Maintenance);
        assert_eq!(fields.due_back, now);
    }

    #[test]
    fn test_explicit_values() {
        let now = Utc::now();
        let mut form = InventoryItemForm {
            book: Uuid::new_v4().to_string(),
            imprint: "Penguin".into(),
            status: "Loaned".into(),
            due_back: "2030-02-01".into(),
        };
        let fields = form.checked(now).unwrap();
        assert_eq!(fields.status, InventoryStatus::Loaned);
        assert_eq!(fields.due_back, Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_fields() {
        let mut form = InventoryItemForm {
            book: String::new(),
            imprint: " ".into(),
            status: "Lost".into(),
            due_back: "soon".into(),
        };
        assert_eq!(
            form.checked(Utc::now()).unwrap_err(),
            vec![
                "Book must be specified",
                "Imprint must be specified",
                "Invalid status",
                "Invalid date",
            ]
        );
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in InventoryStatus::ALL {
            assert_eq!(status.as_str().parse::<InventoryStatus>(), Ok(status));
        }
    }
}
