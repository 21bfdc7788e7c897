//! Field validators shared by the request wizard and the donation form.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern"));

/// Optional leading +, then 10-15 digits with spaces or hyphens in between.
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{8,13}[0-9]$").expect("phone pattern"));

pub fn require(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation {
            message: format!("{} is required", field),
        });
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), Error> {
    if !EMAIL.is_match(value.trim()) {
        return Err(Error::Validation {
            message: "email must look like local@domain.tld".to_string(),
        });
    }
    Ok(())
}

pub fn phone(value: &str) -> Result<(), Error> {
    if !PHONE.is_match(value.trim()) {
        return Err(Error::Validation {
            message: "phone must be 10-15 digits, with optional +, spaces or hyphens".to_string(),
        });
    }
    Ok(())
}
