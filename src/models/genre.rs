//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, Checked, FormFields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

/// Genre create/update form. The same minimum length applies to both.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct GenreForm {
    #[validate(length(min = 3, message = "Genre name must contain at least 3 characters"))]
    pub name: String,
}

impl FormFields for GenreForm {
    const FIELDS: &'static [&'static str] = &["name"];

    fn normalize(&mut self) {
        validation::trim_in_place(&mut self.name);
    }
}

impl GenreForm {
    /// Validated genre name
    pub fn checked(&mut self) -> Checked<String> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(self.name.clone())
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_minimum_after_trim() {
        let mut form = GenreForm { name: "  SF  ".into() };
        assert_eq!(
            form.checked().unwrap_err(),
            vec!["Genre name must contain at least 3 characters"]
        );

        let mut form = GenreForm { name: " Fantasy ".into() };
        assert_eq!(form.checked().unwrap(), "Fantasy");
    }
}
