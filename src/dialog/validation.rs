//! Input validation for the two numeric fields collected by the dialog.
//!
//! Both fields share one rule: after trimming, the input must be a non-empty
//! run of ASCII decimal digits. There is no length or magnitude limit and
//! leading zeros are kept as typed.

use std::fmt;

/// Which of the two collected fields is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sum,
    Number,
}

impl Field {
    /// Label used inside user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Sum => "номинал",
            Field::Number => "номер сертификата",
        }
    }

    /// Label used in error messages ("digits only for ...").
    fn genitive(&self) -> &'static str {
        match self {
            Field::Sum => "номинала",
            Field::Number => "номера сертификата",
        }
    }
}

/// Why a given input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Empty,
    NotDigits,
}

/// Rejected user input, carrying the reply shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    /// Nothing (or only whitespace) was typed.
    pub fn empty_field(field: Field) -> Self {
        Self::new(
            field,
            ValidationKind::Empty,
            format!("Пожалуйста, сначала введите данные ({}).", field.label()),
        )
    }

    /// Something other than digits was typed.
    pub fn not_digits(field: Field) -> Self {
        Self::new(
            field,
            ValidationKind::NotDigits,
            format!("Ошибка: введите только цифры для {}.", field.genitive()),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// True when `value` is non-empty and made only of ASCII digits.
pub fn is_all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a raw message for `field`, returning the trimmed digits on success.
pub fn validate_digits(value: &str, field: Field) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }

    if !is_all_digits(trimmed) {
        return Err(ValidationError::not_digits(field));
    }

    Ok(trimmed.to_string())
}
