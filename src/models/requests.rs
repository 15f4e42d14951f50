//! Request DTOs for the listings API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::listings::{NewProperty, PropertyUpdate};

/// Longest accepted listing title, in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Request body for creating a listing (POST /properties/)
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Decimal amount as a string, e.g. `"350000"` or `"350000.5"`
    pub price: String,
    pub location: String,
}

impl CreatePropertyRequest {
    /// Validates the request and normalizes the price.
    ///
    /// Returns an error message if validation fails.
    pub fn into_new_property(self) -> Result<NewProperty, String> {
        validate_title(&self.title)?;
        if self.location.trim().is_empty() {
            return Err("Location cannot be empty".to_string());
        }
        Ok(NewProperty {
            price: normalize_price(&self.price)?,
            title: self.title,
            description: self.description,
            location: self.location,
        })
    }
}

/// Request body for updating a listing (PUT /properties/:id)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UpdatePropertyRequest {
    pub fn into_update(self) -> Result<PropertyUpdate, String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if matches!(&self.location, Some(location) if location.trim().is_empty()) {
            return Err("Location cannot be empty".to_string());
        }
        let price = self.price.as_deref().map(normalize_price).transpose()?;

        Ok(PropertyUpdate {
            title: self.title,
            description: self.description,
            price,
            location: self.location,
        })
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title exceeds maximum length of {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}

/// Parses a non-negative decimal with at most two fraction digits and
/// renders it with exactly two, e.g. `"0350000.5"` becomes `"350000.50"`.
pub fn normalize_price(raw: &str) -> Result<String, String> {
    let invalid = || format!("Invalid price '{}'", raw);
    let raw_trimmed = raw.trim();
    let (whole, fraction) = raw_trimmed.split_once('.').unwrap_or((raw_trimmed, ""));

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    Ok(format!("{}.{:0<2}", whole, fraction))
}
