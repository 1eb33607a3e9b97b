//! # Primitives
//!
//! Identifiers, timestamps and the fixed names the catalog rules key on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// FIXED NAMES
// =============================================================================

/// Characteristic name a user picks to mean "applies to any criteria".
pub const UNIVERSAL_CRITERION_SENTINEL: &str = "Для любых критериев";

/// Name a universal characteristic carries once it is stored.
pub const UNIVERSAL_CHARACTERISTIC_NAME: &str = "Общие";

/// Name of the characteristic synthesized for a product that has none.
pub const DEFAULT_CHARACTERISTIC_NAME: &str = "Основные показатели";

/// Criteria of the synthesized default characteristic.
pub const DEFAULT_CHARACTERISTIC_CRITERIA: &str = "Общие";

/// Name of the set every fresh set store starts with.
pub const DEFAULT_SET_NAME: &str = "Набор1";

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh, unique identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(generate_id())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a product.
    ProductId
);
string_id!(
    /// Identifier of a characteristic, unique within its product.
    CharacteristicId
);
string_id!(
    /// Identifier of an indicator, unique across its product.
    IndicatorId
);
string_id!(
    /// Identifier of a named product set.
    SetId
);

/// Produce a fresh identifier string (random UUID v4, simple form).
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

// =============================================================================
// TIME
// =============================================================================

/// Timestamp type used for `createdAt` / `updatedAt`.
pub type Timestamp = DateTime<Utc>;

/// Current wall-clock time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp in the short Russian form, `DD.MM.YYYY`.
#[must_use]
pub fn format_date(date: &Timestamp) -> String {
    date.format("%d.%m.%Y").to_string()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generated_ids_are_unique() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = IndicatorId::from("ind-1");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"ind-1\""));
    }

    #[test]
    fn format_date_uses_day_month_year() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 15, 30, 0).single();
        assert_eq!(date.map(|d| format_date(&d)).as_deref(), Some("07.03.2024"));
    }
}
