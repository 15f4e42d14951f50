//! Listing records and the events emitted when they change.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Property ==
/// A property listing as stored by the repository and snapshotted by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Decimal amount with two fraction digits, e.g. `"350000.00"`
    pub price: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a listing about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: String,
    pub location: String,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
}

impl PropertyUpdate {
    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(location) = self.location {
            property.location = location;
        }
    }
}

// == Mutation Events ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            MutationKind::Created => "created",
            MutationKind::Updated => "updated",
            MutationKind::Deleted => "deleted",
        };
        f.write_str(action)
    }
}

/// Emitted after a mutation has been committed, carrying the affected listing
/// (its final state, or its last state for a deletion).
#[derive(Debug, Clone, PartialEq)]
pub struct MutationEvent {
    pub kind: MutationKind,
    pub property: Property,
}

/// A few listings to populate an empty repository at startup.
pub fn demo_listings() -> Vec<NewProperty> {
    [
        (
            "Sunny Loft",
            "Top-floor loft with skylights and an open kitchen",
            "250000.00",
            "Lisbon",
        ),
        (
            "Garden Cottage",
            "Two-bedroom cottage with a walled garden",
            "320000.00",
            "Bristol",
        ),
        (
            "Harbour Apartment",
            "Renovated flat overlooking the marina",
            "410000.00",
            "Gdansk",
        ),
    ]
    .into_iter()
    .map(|(title, description, price, location)| NewProperty {
        title: title.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        location: location.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Property {
        Property {
            id: 7,
            title: "Sunny Loft".to_string(),
            description: "Skylights".to_string(),
            price: "250000.00".to_string(),
            location: "Lisbon".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_property_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["price"], "250000.00");
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_partial_update() {
        let mut property = sample();
        PropertyUpdate {
            price: Some("199000.00".to_string()),
            ..Default::default()
        }
        .apply(&mut property);

        assert_eq!(property.price, "199000.00");
        assert_eq!(property.title, "Sunny Loft");
    }

    #[test]
    fn test_mutation_kind_display() {
        assert_eq!(MutationKind::Created.to_string(), "created");
        assert_eq!(MutationKind::Deleted.to_string(), "deleted");
    }
}
