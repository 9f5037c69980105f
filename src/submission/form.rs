//! Birth and death entry forms and their validation.
//!
//! Forms carry raw user input. Validation checks every field and reports all
//! problems at once, keyed by field, so they can be shown next to the input
//! they belong to.

use crate::models::RegionCatalog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Accepted input format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest date accepted for a birth or death.
pub fn earliest_allowed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Sex recorded on a birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse `Male` / `Female`, ignoring case.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Region,
    Gender,
    DateOfBirth,
    Age,
    DateOfDeath,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Region => write!(f, "State"),
            Field::Gender => write!(f, "Gender"),
            Field::DateOfBirth => write!(f, "Date of Birth"),
            Field::Age => write!(f, "Age at Death"),
            Field::DateOfDeath => write!(f, "Date of Death"),
        }
    }
}

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every field error found on a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The error attached to `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw input of the birth form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirthForm {
    pub region: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
}

/// Raw input of the death form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeathForm {
    pub region: Option<String>,
    pub age: Option<String>,
    pub date_of_death: Option<String>,
}

/// A validated birth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthEntry {
    pub region: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
}

/// A validated death.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathEntry {
    pub region: String,
    pub age: u32,
    pub date_of_death: NaiveDate,
}

impl BirthForm {
    /// Validate against the region catalog and the current date.
    pub fn validate(
        &self,
        catalog: &RegionCatalog,
        today: NaiveDate,
    ) -> Result<BirthEntry, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let region = check_region(self.region.as_deref(), catalog, &mut errors);

        let gender = match non_blank(self.gender.as_deref()) {
            None => {
                errors.push(FieldError::new(Field::Gender, "Please select a gender."));
                None
            }
            Some(raw) => {
                let parsed = Gender::parse(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        Field::Gender,
                        "Gender must be Male or Female.",
                    ));
                }
                parsed
            }
        };

        let date_of_birth = check_date(
            self.date_of_birth.as_deref(),
            Field::DateOfBirth,
            "A date of birth is required.",
            today,
            &mut errors,
        );

        match (region, gender, date_of_birth) {
            (Some(region), Some(gender), Some(date_of_birth)) if errors.is_empty() => {
                Ok(BirthEntry {
                    region,
                    gender,
                    date_of_birth,
                })
            }
            _ => Err(errors),
        }
    }
}

impl DeathForm {
    /// Validate against the region catalog and the current date.
    pub fn validate(
        &self,
        catalog: &RegionCatalog,
        today: NaiveDate,
    ) -> Result<DeathEntry, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let region = check_region(self.region.as_deref(), catalog, &mut errors);

        let age = match non_blank(self.age.as_deref()) {
            None => {
                errors.push(FieldError::new(Field::Age, "Age is required."));
                None
            }
            Some(raw) => match raw.parse::<u32>() {
                Ok(age) => Some(age),
                Err(_) => {
                    errors.push(FieldError::new(Field::Age, "Age must be a positive number."));
                    None
                }
            },
        };

        let date_of_death = check_date(
            self.date_of_death.as_deref(),
            Field::DateOfDeath,
            "A date of death is required.",
            today,
            &mut errors,
        );

        match (region, age, date_of_death) {
            (Some(region), Some(age), Some(date_of_death)) if errors.is_empty() => {
                Ok(DeathEntry {
                    region,
                    age,
                    date_of_death,
                })
            }
            _ => Err(errors),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn check_region(
    value: Option<&str>,
    catalog: &RegionCatalog,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(raw) = non_blank(value) else {
        errors.push(FieldError::new(Field::Region, "Please select a state."));
        return None;
    };

    match catalog.resolve(raw) {
        Some(name) => Some(name.to_string()),
        None => {
            errors.push(FieldError::new(
                Field::Region,
                format!("Unknown state '{}'.", raw),
            ));
            None
        }
    }
}

fn check_date(
    value: Option<&str>,
    field: Field,
    required_message: &str,
    today: NaiveDate,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let Some(raw) = non_blank(value) else {
        errors.push(FieldError::new(field, required_message));
        return None;
    };

    let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) else {
        errors.push(FieldError::new(field, "Date must be in YYYY-MM-DD format."));
        return None;
    };

    let earliest = earliest_allowed_date();
    if date > today {
        errors.push(FieldError::new(field, "Date cannot be in the future."));
        None
    } else if date < earliest {
        errors.push(FieldError::new(
            field,
            format!("Date cannot be before {}.", earliest.format(DATE_FORMAT)),
        ));
        None
    } else {
        Some(date)
    }
}
