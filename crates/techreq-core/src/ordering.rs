//! # Ordering
//!
//! Dense one-based ranks over sibling sequences.
//!
//! Indicators inside a characteristic and characteristics inside a product
//! both carry an `order` field. After a reorder or a deletion the ranks of a
//! sequence are exactly `1..=N` in sequence order. Both paths go through
//! [`renumber`].

use crate::error::{CatalogError, Result};

/// An element that carries its own rank among siblings.
pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Rewrite every rank to its one-based position.
pub fn renumber<T: Ordered>(items: &mut [T]) {
    for (item, rank) in items.iter_mut().zip(1u32..) {
        item.set_order(rank);
    }
}

/// Move the element at `from` so it ends up at `to`, then renumber.
///
/// The input is left untouched; a new sequence is returned so callers that
/// diff old against new state see a fresh value.
pub fn reorder<T: Ordered + Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>> {
    let len = items.len();
    if from >= len {
        return Err(CatalogError::InvalidIndex { index: from, len });
    }
    if to >= len {
        return Err(CatalogError::InvalidIndex { index: to, len });
    }

    let mut result = items.to_vec();
    let moved = result.remove(from);
    result.insert(to, moved);
    renumber(&mut result);
    Ok(result)
}

/// Whether ranks are exactly `1..=N` in sequence order.
#[must_use]
pub fn is_dense<T: Ordered>(items: &[T]) -> bool {
    items
        .iter()
        .zip(1u32..)
        .all(|(item, rank)| item.order() == rank)
}

// =============================================================================
// TESTS
// =============================================================================
