//! Field validation for the public sign-up form.
//!
//! Validation is pure: raw submitted values go in, and either a normalised
//! draft or a set of per-field Persian messages comes out. The duplicate
//! phone check needs storage and lives in the landing service instead.

use std::fmt;

use serde::Serialize;

use super::enums::{City, FitnessGoal, Role};
use super::phone::PhoneNumber;

/// Message shown when a required field is missing or blank.
pub const MSG_REQUIRED: &str = "این فیلد الزامی است";
/// Message shown when a choice field carries a value outside its set.
pub const MSG_INVALID_CHOICE: &str = "این مقدار در فهرست گزینه‌ها نیست";
/// Message shown for syntactically invalid email addresses.
pub const MSG_INVALID_EMAIL: &str = "ایمیل وارد شده معتبر نیست";
/// Message shown when consent is not affirmed.
pub const MSG_CONSENT_REQUIRED: &str = "برای ثبت‌نام، باید با دریافت اطلاعات موافقت کنید";
/// Message shown when the phone number is already registered.
pub const MSG_DUPLICATE_PHONE: &str = "این شماره تلفن قبلاً ثبت شده است";

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// Full name input.
    FullName,
    /// Phone number input.
    PhoneNumber,
    /// Optional email input.
    Email,
    /// City select.
    City,
    /// Fitness goal select.
    FitnessGoal,
    /// Role select.
    Role,
    /// Consent checkbox.
    Consent,
}

impl FormField {
    /// The form input name attribute for this field.
    pub fn name(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::PhoneNumber => "phone_number",
            Self::Email => "email",
            Self::City => "city",
            Self::FitnessGoal => "fitness_goal",
            Self::Role => "role",
            Self::Consent => "consent",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-field validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(FormField, String)>,
}

impl FieldErrors {
    /// Record a message for a field, keeping the first message per field.
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push((field, message.into()));
        }
    }

    /// The message recorded for a field, if any.
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }

    /// True when no field carries a message.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(field, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Single-entry constructor, used for the duplicate-phone rejection.
    pub fn single(field: FormField, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }
}

/// Raw values as submitted, before any validation.
///
/// The HTTP adapter fills this from the urlencoded body; missing inputs
/// arrive as empty strings so re-rendering can echo them back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    /// Raw `full_name` input.
    pub full_name: String,
    /// Raw `phone_number` input.
    pub phone_number: String,
    /// Raw `email` input.
    pub email: String,
    /// Raw `city` code.
    pub city: String,
    /// Raw `fitness_goal` code.
    pub fitness_goal: String,
    /// Raw `role` code.
    pub role: String,
    /// Whether the consent checkbox was affirmed.
    pub consent: bool,
}

/// A form that passed field validation; ready for the duplicate check and
/// persistence stamping.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpDraft {
    /// Trimmed full name.
    pub full_name: String,
    /// Normalised phone number.
    pub phone_number: PhoneNumber,
    /// Email when provided, `None` when the input was blank.
    pub email: Option<String>,
    /// Parsed city.
    pub city: City,
    /// Parsed fitness goal.
    pub fitness_goal: FitnessGoal,
    /// Parsed role.
    pub role: Role,
}

/// Loose syntactic email check: one `@`, non-empty local part, and a dot in
/// the domain.
fn email_is_plausible(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

/// Validate raw form values into a draft or per-field messages.
pub fn validate(form: &SignUpForm) -> Result<SignUpDraft, FieldErrors> {
    let mut errors = FieldErrors::default();

    let full_name = form.full_name.trim();
    if full_name.is_empty() {
        errors.push(FormField::FullName, MSG_REQUIRED);
    }

    let phone_number = if form.phone_number.trim().is_empty() {
        errors.push(FormField::PhoneNumber, MSG_REQUIRED);
        None
    } else {
        match PhoneNumber::parse(&form.phone_number) {
            Ok(phone) => Some(phone),
            Err(err) => {
                errors.push(FormField::PhoneNumber, err.to_string());
                None
            }
        }
    };

    let email = form.email.trim();
    let email = if email.is_empty() {
        None
    } else if email_is_plausible(email) {
        Some(email.to_owned())
    } else {
        errors.push(FormField::Email, MSG_INVALID_EMAIL);
        None
    };

    let city = parse_choice::<City>(&form.city, FormField::City, &mut errors);
    let fitness_goal =
        parse_choice::<FitnessGoal>(&form.fitness_goal, FormField::FitnessGoal, &mut errors);
    let role = parse_choice::<Role>(&form.role, FormField::Role, &mut errors);

    if !form.consent {
        errors.push(FormField::Consent, MSG_CONSENT_REQUIRED);
    }

    match (phone_number, city, fitness_goal, role) {
        (Some(phone_number), Some(city), Some(fitness_goal), Some(role))
            if errors.is_empty() =>
        {
            Ok(SignUpDraft {
                full_name: full_name.to_owned(),
                phone_number,
                email,
                city,
                fitness_goal,
                role,
            })
        }
        _ => Err(errors),
    }
}

fn parse_choice<T: std::str::FromStr>(
    raw: &str,
    field: FormField,
    errors: &mut FieldErrors,
) -> Option<T> {
    if raw.trim().is_empty() {
        errors.push(field, MSG_REQUIRED);
        return None;
    }
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, MSG_INVALID_CHOICE);
            None
        }
    }
}
