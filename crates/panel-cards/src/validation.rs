//! Card input validation.

use crate::errors::{CardError, Result};

/// Maximum card name length in characters
pub const MAX_NAME_LEN: usize = 50;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Largest display order a card may hold
pub const MAX_ORDER: u32 = i32::MAX as u32;

/// Trim a required field, rejecting blank values
pub fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CardError::Validation(format!("Card {} must not be empty", field)));
    }
    Ok(trimmed)
}

/// Validate and trim a card name
pub fn name(value: &str) -> Result<&str> {
    let name = required(value, "name")?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CardError::Validation(format!(
            "Card name must not exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}

/// Validate and trim a card URL
pub fn url(value: &str) -> Result<&str> {
    let url = required(value, "url")?;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CardError::Validation(
            "Card url must start with http:// or https://".to_string(),
        ));
    }
    Ok(url)
}

/// Validate and trim a description, which may be empty
pub fn description(value: &str) -> Result<&str> {
    let description = value.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CardError::Validation(format!(
            "Card description must not exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(description)
}
