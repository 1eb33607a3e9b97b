//! # Validation
//!
//! Field checks run on indicators before a save. Every rule is evaluated and
//! all findings are returned together; nothing short-circuits.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::model::{ComparisonOperator, Indicator, Product};
use crate::primitives::IndicatorId;

/// `<integer> - <integer>`, spaces allowed around the dash.
static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\s*-\s*[0-9]+$").expect("range pattern compiles"));

/// A single field-level finding on an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("standard required")]
    StandardRequired,

    /// A range value must read `number-number`.
    #[error("range format")]
    RangeFormat,

    /// Values may only hold digits, whitespace, `-`, `.` and `,`.
    #[error("invalid characters in value")]
    InvalidCharacters,
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '.' | ',')
}

/// Check one indicator. An empty list means it is valid.
#[must_use]
pub fn validate(indicator: &Indicator) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if indicator.name.trim().is_empty() {
        errors.push(ValidationError::NameRequired);
    }

    if indicator.standard.is_empty() {
        errors.push(ValidationError::StandardRequired);
    }

    if indicator.comparison == ComparisonOperator::Range && !RANGE_PATTERN.is_match(&indicator.value)
    {
        errors.push(ValidationError::RangeFormat);
    }

    if !indicator.value.is_empty() && !indicator.value.chars().all(is_value_char) {
        errors.push(ValidationError::InvalidCharacters);
    }

    errors
}

/// Save gate: true iff every indicator validates cleanly.
#[must_use]
pub fn validate_all<'a>(indicators: impl IntoIterator<Item = &'a Indicator>) -> bool {
    indicators
        .into_iter()
        .all(|indicator| validate(indicator).is_empty())
}

/// Findings for one indicator of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorIssues {
    pub indicator_id: IndicatorId,
    pub indicator_name: String,
    pub errors: Vec<ValidationError>,
}

/// Collect findings for every invalid indicator of a product, in tree order.
#[must_use]
pub fn validate_product(product: &Product) -> Vec<IndicatorIssues> {
    product
        .indicators()
        .filter_map(|indicator| {
            let errors = validate(indicator);
            (!errors.is_empty()).then(|| IndicatorIssues {
                indicator_id: indicator.id.clone(),
                indicator_name: indicator.name.clone(),
                errors,
            })
        })
        .collect()
}

/// Whether every indicator of the product passes validation.
#[must_use]
pub fn can_save(product: &Product) -> bool {
    validate_all(product.indicators())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IndicatorDraft, ProductDraft, ProductGroup};
    use crate::model::{Characteristic, CharacteristicDraft};

    fn indicator(name: &str, standard: &str, comparison: ComparisonOperator, value: &str) -> Indicator {
        Indicator::from_draft(
            IndicatorDraft::new(name, standard, comparison, value),
            IndicatorId::generate(),
            1,
        )
    }

    #[test]
    fn empty_name_is_the_only_error() {
        let errors = validate(&indicator("", "GOST", ComparisonOperator::Equals, "12"));
        assert_eq!(errors, vec![ValidationError::NameRequired]);
    }

    #[test]
    fn whitespace_name_counts_as_empty() {
        let errors = validate(&indicator("   ", "GOST", ComparisonOperator::Equals, ""));
        assert_eq!(errors, vec![ValidationError::NameRequired]);
    }

    #[test]
    fn malformed_range_reports_range_format() {
        let errors = validate(&indicator("X", "GOST", ComparisonOperator::Range, "abc"));
        assert!(errors.contains(&ValidationError::RangeFormat));
        // "abc" also fails the character check.
        assert!(errors.contains(&ValidationError::InvalidCharacters));
    }

    #[test]
    fn well_formed_ranges_pass() {
        for value in ["90-100", "90 - 100", "5 -10", "0-0"] {
            let errors = validate(&indicator("X", "GOST", ComparisonOperator::Range, value));
            assert!(errors.is_empty(), "{value}: {errors:?}");
        }
    }

    #[test]
    fn range_needs_two_integers() {
        for value in ["", "90", "9.5-10", "-10", "10-", "1-2-3"] {
            let errors = validate(&indicator("X", "GOST", ComparisonOperator::Range, value));
            assert!(errors.contains(&ValidationError::RangeFormat), "{value}");
        }
    }

    #[test]
    fn value_charset_applies_to_every_comparison() {
        let errors = validate(&indicator("X", "GOST", ComparisonOperator::Greater, "12%"));
        assert_eq!(errors, vec![ValidationError::InvalidCharacters]);

        let errors = validate(&indicator("X", "GOST", ComparisonOperator::LessOrEquals, "1,5 .2"));
        assert!(errors.is_empty());
    }

    #[test]
    fn all_findings_are_collected() {
        let errors = validate(&indicator(" ", "", ComparisonOperator::Range, "x"));
        assert_eq!(
            errors,
            vec![
                ValidationError::NameRequired,
                ValidationError::StandardRequired,
                ValidationError::RangeFormat,
                ValidationError::InvalidCharacters,
            ]
        );
    }

    #[test]
    fn validate_all_is_a_conjunction() {
        let good = indicator("X", "GOST", ComparisonOperator::Equals, "1");
        let bad = indicator("", "GOST", ComparisonOperator::Equals, "1");
        assert!(validate_all([&good, &good]));
        assert!(!validate_all([&good, &bad]));
        assert!(validate_all(std::iter::empty::<&Indicator>()));
    }

    #[test]
    fn product_issues_are_keyed_by_indicator() {
        let mut product = crate::model::Product::from_draft(ProductDraft::new(
            "Бетон",
            "ГОСТ 7473-2010",
            ProductGroup::ConstructionMaterials,
        ));
        let mut characteristic = Characteristic::from_draft(CharacteristicDraft::new("A32", "x"), 1);
        let bad = indicator("Проход", "", ComparisonOperator::Equals, "1");
        characteristic.indicators = vec![indicator("ok", "GOST", ComparisonOperator::Equals, "1"), bad.clone()];
        product.characteristics.push(characteristic);

        let issues = validate_product(&product);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].indicator_id, bad.id);
        assert_eq!(issues[0].errors, vec![ValidationError::StandardRequired]);
        assert!(!can_save(&product));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(ValidationError::RangeFormat.to_string(), "range format");
        assert_eq!(
            ValidationError::InvalidCharacters.to_string(),
            "invalid characters in value"
        );
    }
}
