//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::format_date;
use crate::validation::{self, Checked, FormFields};

/// Full author record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author fields as written by create and update
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorFields {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn new(id: Uuid, fields: AuthorFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            family_name: fields.family_name,
            date_of_birth: fields.date_of_birth,
            date_of_death: fields.date_of_death,
        }
    }

    /// "family_name, first_name", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn birth_formatted(&self) -> Option<String> {
        self.date_of_birth.map(format_date)
    }

    pub fn death_formatted(&self) -> Option<String> {
        self.date_of_death.map(format_date)
    }

    /// "Born: Jan 3, 1892, Died: Sep 2, 1973"
    pub fn lifespan_long(&self) -> String {
        let mut out = String::new();
        if let Some(born) = self.birth_formatted() {
            out.push_str(&format!("Born: {}", born));
        }
        if let Some(died) = self.death_formatted() {
            out.push_str(&format!(", Died: {}", died));
        }
        out
    }

    /// "(Jan 3, 1892 - Sep 2, 1973)", or `None` without any dates
    pub fn lifespan_short(&self) -> Option<String> {
        if self.date_of_birth.is_none() && self.date_of_death.is_none() {
            return None;
        }
        let mut out = String::from("(");
        if let Some(born) = self.birth_formatted() {
            out.push_str(&born);
        }
        if let Some(died) = self.death_formatted() {
            out.push_str(&format!(" - {}", died));
        }
        out.push(')');
        Some(out)
    }

    /// Whether the given names match this author ignoring letter case
    pub fn same_name(&self, first_name: &str, family_name: &str) -> bool {
        self.first_name.to_lowercase() == first_name.to_lowercase()
            && self.family_name.to_lowercase() == family_name.to_lowercase()
    }
}

/// Author create/update form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified"),
        custom(function = "first_name_limit")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified"),
        custom(function = "family_name_limit")
    )]
    pub family_name: String,
    #[validate(custom(function = "birth_date"))]
    pub date_of_birth: String,
    #[validate(custom(function = "death_date"))]
    pub date_of_death: String,
}

const NAME_LIMIT: usize = 100;

fn first_name_limit(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_LIMIT {
        return Err(validation::rule(
            "length",
            "First name must not exceed 100 characters",
        ));
    }
    Ok(())
}

fn family_name_limit(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_LIMIT {
        return Err(validation::rule(
            "length",
            "Family name must not exceed 100 characters",
        ));
    }
    Ok(())
}

fn birth_date(value: &str) -> Result<(), ValidationError> {
    validation::iso_date(value, "Invalid date of birth")
}

fn death_date(value: &str) -> Result<(), ValidationError> {
    validation::iso_date(value, "Invalid date of death")
}

impl FormFields for AuthorForm {
    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn normalize(&mut self) {
        validation::trim_in_place(&mut self.first_name);
        validation::trim_in_place(&mut self.family_name);
        validation::trim_in_place(&mut self.date_of_birth);
        validation::trim_in_place(&mut self.date_of_death);
    }
}

impl AuthorForm {
    /// Validate the submission and convert it to storable fields.
    pub fn checked(&mut self) -> Checked<AuthorFields> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(AuthorFields {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth: validation::parse_optional_date(&self.date_of_birth).ok().flatten(),
            date_of_death: validation::parse_optional_date(&self.date_of_death).ok().flatten(),
        })
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth.map(|d| d.to_string()).unwrap_or_default(),
            date_of_death: author.date_of_death.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolkien() -> Author {
        Author::new(
            Uuid::new_v4(),
            AuthorFields {
                first_name: "John".into(),
                family_name: "Tolkien".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1892, 1, 3),
                date_of_death: NaiveDate::from_ymd_opt(1973, 9, 2),
            },
        )
    }

    #[test]
    fn test_derived_fields() {
        let author = tolkien();
        assert_eq!(author.name(), "Tolkien, John");
        assert_eq!(author.lifespan_long(), "Born: Jan 3, 1892, Died: Sep 2, 1973");
        assert_eq!(
            author.lifespan_short().as_deref(),
            Some("(Jan 3, 1892 - Sep 2, 1973)")
        );
        assert!(author.url().starts_with("/catalog/author/"));
    }

    #[test]
    fn test_lifespan_without_dates() {
        let mut author = tolkien();
        author.date_of_birth = None;
        author.date_of_death = None;
        assert_eq!(author.lifespan_long(), "");
        assert_eq!(author.lifespan_short(), None);
    }

    #[test]
    fn test_same_name_ignores_case() {
        let author = tolkien();
        assert!(author.same_name("JOHN", "tolkien"));
        assert!(!author.same_name("Jon", "Tolkien"));
    }

    #[test]
    fn test_form_trims_and_parses() {
        let mut form = AuthorForm {
            first_name: "  Ursula ".into(),
            family_name: " Le Guin".into(),
            date_of_birth: "1929-10-21".into(),
            date_of_death: String::new(),
        };
        let fields = form.checked().unwrap();
        assert_eq!(fields.first_name, "Ursula");
        assert_eq!(fields.family_name, "Le Guin");
        assert_eq!(fields.date_of_birth, NaiveDate::from_ymd_opt(1929, 10, 21));
        assert_eq!(fields.date_of_death, None);
    }

    #[test]
    fn test_form_errors_in_field_order() {
        let mut form = AuthorForm {
            first_name: "   ".into(),
            family_name: String::new(),
            date_of_birth: "yesterday".into(),
            date_of_death: String::new(),
        };
        let errors = form.checked().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "First name must be specified",
                "Family name must be specified",
                "Invalid date of birth",
            ]
        );
    }

    #[test]
    fn test_form_name_limit() {
        let mut form = AuthorForm {
            first_name: "a".repeat(101),
            family_name: "b".into(),
            ..AuthorForm::default()
        };
        let errors = form.checked().unwrap_err();
        assert_eq!(errors, vec!["First name must not exceed 100 characters"]);
    }
}
