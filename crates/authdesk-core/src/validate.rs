//! Client-side field validation.
//!
//! Forms are described by static field lists. Validation walks the list in
//! order and stops at the first failing field, so a form only ever reports one
//! message at a time.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ClientError, ClientResult};

/// Form field definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    Age,
    Dob,
    Contact,
}

/// Login: email, then password.
pub const LOGIN_FIELDS: &[Field] = &[Field::Email, Field::Password];

/// Signup: every field, required ones first.
pub const SIGNUP_FIELDS: &[Field] = &[
    Field::Name,
    Field::Email,
    Field::Password,
    Field::Age,
    Field::Dob,
    Field::Contact,
];

/// Profile edit: like signup without the password.
pub const PROFILE_FIELDS: &[Field] = &[
    Field::Name,
    Field::Email,
    Field::Age,
    Field::Dob,
    Field::Contact,
];

impl Field {
    /// Wire/form key for the field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::Age => "age",
            Field::Dob => "dob",
            Field::Contact => "contact",
        }
    }

    /// Human-readable label (used as prompt / placeholder).
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email Address",
            Field::Password => "Password",
            Field::Age => "Age",
            Field::Dob => "Date of Birth",
            Field::Contact => "Contact Number",
        }
    }

    /// Optional fields pass when left empty.
    pub fn is_optional(self) -> bool {
        matches!(self, Field::Age | Field::Dob | Field::Contact)
    }

    /// The single message reported when this field fails.
    pub fn message(self) -> &'static str {
        match self {
            Field::Name => "Name must be at least 2 characters",
            Field::Email => "Please enter a valid email address",
            Field::Password => "Password must be at least 6 characters",
            Field::Age => "Age must be between 0 and 150",
            Field::Dob => "Date of birth cannot be in the future",
            Field::Contact => "Please enter a valid contact number",
        }
    }
}

/// Access to the raw text of a form's fields.
pub trait FormInput {
    /// Returns the current text for `field` (empty when unset).
    fn value(&self, field: Field) -> &str;
}

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;
/// Minimum name length.
pub const MIN_NAME_LEN: usize = 2;
/// Inclusive age bounds.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 0..=150;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

fn contact_regex() -> &'static Regex {
    static CONTACT: OnceLock<Regex> = OnceLock::new();
    CONTACT.get_or_init(|| Regex::new(r"^\+?[0-9\s-]{10,}$").expect("contact pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LEN
}

pub fn is_valid_name(value: &str) -> bool {
    value.chars().count() >= MIN_NAME_LEN
}

/// Parses an age field. `None` when not an integer.
pub fn parse_age(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

pub fn is_valid_age(value: &str) -> bool {
    parse_age(value).is_some_and(|age| AGE_RANGE.contains(&age))
}

/// Parses a calendar date, accepting a full ISO datetime and keeping its date.
///
/// `2000-01-31` and `2000-01-31T00:00:00.000Z` both yield 2000-01-31.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split_once('T').map_or(value, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// A date of birth must parse and must not be after `today`.
pub fn is_valid_dob(value: &str, today: NaiveDate) -> bool {
    parse_calendar_date(value).is_some_and(|dob| dob <= today)
}

pub fn is_valid_contact(value: &str) -> bool {
    contact_regex().is_match(value)
}

/// Checks a single field.
///
/// Optional fields that are blank always pass.
pub fn check_field(field: Field, value: &str, today: NaiveDate) -> ClientResult<()> {
    if field.is_optional() && value.trim().is_empty() {
        return Ok(());
    }

    let ok = match field {
        Field::Name => is_valid_name(value),
        Field::Email => is_valid_email(value),
        Field::Password => is_valid_password(value),
        Field::Age => is_valid_age(value),
        Field::Dob => is_valid_dob(value, today),
        Field::Contact => is_valid_contact(value),
    };

    if ok {
        Ok(())
    } else {
        Err(ClientError::validation(field.message()))
    }
}

/// Validates `fields` in order, stopping at the first failure.
pub fn validate<I: FormInput>(fields: &[Field], input: &I, today: NaiveDate) -> ClientResult<()> {
    for &field in fields {
        check_field(field, input.value(field), today)?;
    }
    Ok(())
}

/// Today's date in the local calendar.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
