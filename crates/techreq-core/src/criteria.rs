//! # Universal Criterion
//!
//! A characteristic named
//! [`UNIVERSAL_CRITERION_SENTINEL`](crate::primitives::UNIVERSAL_CRITERION_SENTINEL)
//! holds requirements that apply regardless of any other criteria. When one
//! is added it is stored as [`UNIVERSAL_CHARACTERISTIC_NAME`], placed first,
//! and every sibling is disabled. Disabling is display state only: sibling indicators are kept
//! as they are.

use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::model::Characteristic;
use crate::primitives::UNIVERSAL_CHARACTERISTIC_NAME;

/// Combine `incoming` with `existing` under the universal-criterion rule.
///
/// An incoming characteristic under either universal name takes the
/// universal path. A product holds at most one universal characteristic;
/// once it has one, every addition is refused. On error `existing` is
/// unchanged; the caller still owns it.
pub fn apply_new_characteristic(
    existing: &[Characteristic],
    incoming: Characteristic,
) -> Result<Vec<Characteristic>> {
    if existing.iter().any(Characteristic::is_universal) {
        return Err(CatalogError::DuplicateUniversalCriterion);
    }

    if incoming.is_universal() {
        debug!(
            superseded = existing.len(),
            "universal characteristic added, disabling siblings"
        );
        let universal = Characteristic {
            name: UNIVERSAL_CHARACTERISTIC_NAME.to_owned(),
            disabled: false,
            ..incoming
        };
        let mut result = Vec::with_capacity(existing.len().saturating_add(1));
        result.push(universal);
        result.extend(existing.iter().cloned().map(|characteristic| Characteristic {
            disabled: true,
            ..characteristic
        }));
        return Ok(result);
    }

    let mut result = existing.to_vec();
    result.push(incoming);
    Ok(result)
}

/// Drop the characteristic at `index`. Removing the universal characteristic
/// re-enables every remaining sibling.
pub fn remove_characteristic(
    existing: &[Characteristic],
    index: usize,
) -> Result<(Characteristic, Vec<Characteristic>)> {
    if index >= existing.len() {
        return Err(CatalogError::InvalidIndex {
            index,
            len: existing.len(),
        });
    }

    let mut result = existing.to_vec();
    let removed = result.remove(index);
    if removed.is_universal() {
        debug!(restored = result.len(), "universal characteristic removed");
        for characteristic in &mut result {
            characteristic.disabled = false;
        }
    }
    Ok((removed, result))
}

// =============================================================================
// TESTS
// =============================================================================
