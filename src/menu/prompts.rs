//! Interactive prompts built on `inquire`

use inquire::validator::Validation;
use inquire::{Confirm, InquireError, Select, Text};
use std::fmt;

/// One entry in a selection list
#[derive(Clone, Debug, PartialEq)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// What the person picked from an entity list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    Existing(i32),
    /// Create a new row inline and use its id
    New,
    /// Explicitly no value (e.g. no manager)
    Nothing,
}

/// Parse salary text: non-empty, numeric, finite and not negative
pub fn parse_salary(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Please enter a salary.".to_string());
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Ok(_) => Err("Salary must be zero or more.".to_string()),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}

/// Free text that must not be blank
pub fn required_text(message: &str, field: &str) -> Result<String, InquireError> {
    let empty_message = format!("{} cannot be empty.", field);
    let validator = move |input: &str| {
        if input.trim().is_empty() {
            Ok(Validation::Invalid(empty_message.clone().into()))
        } else {
            Ok(Validation::Valid)
        }
    };

    Text::new(message).with_validator(validator).prompt()
}

pub fn salary(message: &str) -> Result<f64, InquireError> {
    let validator = |input: &str| match parse_salary(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(msg) => Ok(Validation::Invalid(msg.into())),
    };

    let answer = Text::new(message).with_validator(validator).prompt()?;
    parse_salary(&answer).map_err(|msg| InquireError::Custom(msg.into()))
}

/// Pick from a list; `None` when there is nothing to pick
pub fn select<T>(message: &str, choices: Vec<Choice<T>>) -> Result<Option<T>, InquireError> {
    if choices.is_empty() {
        return Ok(None);
    }
    let picked = Select::new(message, choices).with_page_size(12).prompt()?;
    Ok(Some(picked.value))
}

/// Yes/no question defaulting to no
pub fn confirm(message: &str) -> Result<bool, InquireError> {
    Confirm::new(message).with_default(false).prompt()
}

/// `true` when the error means the person backed out of a prompt
pub fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}
