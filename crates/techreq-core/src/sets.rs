//! # Set Store
//!
//! Named sets of products plus the "current set" pointer.
//!
//! `current_set_index` is a valid index whenever the list is non-empty and
//! is reset to 0 when the last set is deleted.

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::model::{ProductSet, SetDraft};
use crate::primitives::{DEFAULT_SET_NAME, ProductId, SetId, now};

/// The list of product sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStore {
    sets: Vec<ProductSet>,
    current_set_index: usize,
}

impl Default for SetStore {
    /// A store holding the single default set.
    fn default() -> Self {
        Self {
            sets: vec![ProductSet::from_draft(SetDraft::new(DEFAULT_SET_NAME))],
            current_set_index: 0,
        }
    }
}

impl SetStore {
    /// Create a store with the default set, which is current.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted sets. An out-of-range index is clamped.
    #[must_use]
    pub fn from_sets(sets: Vec<ProductSet>, current_set_index: usize) -> Self {
        let mut store = Self {
            sets,
            current_set_index,
        };
        store.clamp_current();
        store
    }

    #[must_use]
    pub fn sets(&self) -> &[ProductSet] {
        &self.sets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    #[must_use]
    pub fn current_set_index(&self) -> usize {
        self.current_set_index
    }

    #[must_use]
    pub fn current_set(&self) -> Option<&ProductSet> {
        self.sets.get(self.current_set_index)
    }

    #[must_use]
    pub fn get(&self, id: &SetId) -> Option<&ProductSet> {
        self.sets.iter().find(|s| &s.id == id)
    }

    /// Append a new set and make it current.
    pub fn add_set(&mut self, draft: SetDraft) -> &ProductSet {
        let set = ProductSet::from_draft(draft);
        debug!(set = %set.id, name = %set.name, total = self.sets.len().saturating_add(1), "set added");
        self.sets.push(set);
        self.current_set_index = self.sets.len().saturating_sub(1);
        &self.sets[self.current_set_index]
    }

    /// Remove a set by id. Absent ids are a no-op.
    pub fn delete_set(&mut self, id: &SetId) -> Option<ProductSet> {
        let Some(index) = self.sets.iter().position(|s| &s.id == id) else {
            warn!(set = %id, "set to delete not found");
            return None;
        };

        let removed = self.sets.remove(index);
        self.clamp_current();
        debug!(
            set = %removed.id,
            remaining = self.sets.len(),
            current = ?self.current_set().map(|s| s.name.as_str()),
            "set deleted"
        );
        Some(removed)
    }

    /// Rename a set and bump its `updated_at`. Returns `false` for unknown ids.
    pub fn update_set_name(&mut self, id: &SetId, name: impl Into<String>) -> bool {
        let Some(set) = self.sets.iter_mut().find(|s| &s.id == id) else {
            warn!(set = %id, "set to rename not found");
            return false;
        };
        set.name = name.into();
        set.updated_at = now();
        debug!(set = %set.id, name = %set.name, "set renamed");
        true
    }

    /// Make the set at `index` current. Out-of-range indices are ignored.
    pub fn switch_to_set(&mut self, index: usize) -> bool {
        if index >= self.sets.len() {
            return false;
        }
        self.current_set_index = index;
        debug!(index, current = ?self.current_set().map(|s| s.name.as_str()), "switched set");
        true
    }

    /// Advance to the next set, wrapping around. No-op with one set or none.
    pub fn switch_to_next_set(&mut self) {
        let len = self.sets.len();
        if len <= 1 {
            return;
        }
        self.switch_to_set(self.current_set_index.saturating_add(1) % len);
    }

    /// Step back to the previous set, wrapping around. No-op with one set or none.
    pub fn switch_to_prev_set(&mut self) {
        let len = self.sets.len();
        if len <= 1 {
            return;
        }
        let prev = self
            .current_set_index
            .checked_sub(1)
            .unwrap_or(len.saturating_sub(1));
        self.switch_to_set(prev);
    }

    /// Add a product to a set. Adding a member twice keeps one entry.
    pub fn add_product_to_set(&mut self, id: &SetId, product: ProductId) -> Result<bool> {
        let set = self.set_mut(id)?;
        if set.contains(&product) {
            return Ok(false);
        }
        set.product_ids.push(product);
        set.updated_at = now();
        Ok(true)
    }

    /// Remove a product from a set. Returns whether it was a member.
    pub fn remove_product_from_set(&mut self, id: &SetId, product: &ProductId) -> Result<bool> {
        let set = self.set_mut(id)?;
        let before = set.product_ids.len();
        set.product_ids.retain(|member| member != product);
        let removed = set.product_ids.len() != before;
        if removed {
            set.updated_at = now();
        }
        Ok(removed)
    }

    /// Drop a product from every set, e.g. after it was deleted from the catalog.
    pub fn forget_product(&mut self, product: &ProductId) -> usize {
        let mut touched = 0usize;
        for set in &mut self.sets {
            let before = set.product_ids.len();
            set.product_ids.retain(|member| member != product);
            if set.product_ids.len() != before {
                set.updated_at = now();
                touched = touched.saturating_add(1);
            }
        }
        touched
    }

    /// Emit the whole store state at debug level.
    pub fn log_state(&self) {
        for (index, set) in self.sets.iter().enumerate() {
            debug!(
                index,
                set = %set.id,
                name = %set.name,
                products = set.product_ids.len(),
                current = index == self.current_set_index,
                "set store entry"
            );
        }
        debug!(
            total = self.sets.len(),
            current_index = self.current_set_index,
            "set store state"
        );
    }

    fn set_mut(&mut self, id: &SetId) -> Result<&mut ProductSet> {
        self.sets
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| CatalogError::SetNotFound(id.clone()))
    }

    fn clamp_current(&mut self) {
        if self.sets.is_empty() {
            self.current_set_index = 0;
        } else if self.current_set_index >= self.sets.len() {
            self.current_set_index = self.sets.len().saturating_sub(1);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize) -> (SetStore, Vec<SetId>) {
        let mut store = SetStore::from_sets(Vec::new(), 0);
        let ids = (0..n)
            .map(|i| store.add_set(SetDraft::new(format!("set-{i}"))).id.clone())
            .collect();
        (store, ids)
    }

    #[test]
    fn new_store_has_default_set() {
        let store = SetStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.current_set().map(|s| s.name.as_str()), Some(DEFAULT_SET_NAME));
        assert_eq!(store.current_set_index(), 0);
    }

    #[test]
    fn added_set_becomes_current() {
        let (store, ids) = store_with(3);
        assert_eq!(store.current_set_index(), 2);
        assert_eq!(store.current_set().map(|s| &s.id), Some(&ids[2]));
    }

    #[test]
    fn next_and_prev_wrap_around() {
        let (mut store, _) = store_with(3);
        assert_eq!(store.current_set_index(), 2);
        store.switch_to_next_set();
        assert_eq!(store.current_set_index(), 0);
        store.switch_to_prev_set();
        assert_eq!(store.current_set_index(), 2);
        store.switch_to_prev_set();
        assert_eq!(store.current_set_index(), 1);
    }

    #[test]
    fn switching_with_single_set_is_noop() {
        let mut store = SetStore::new();
        store.switch_to_next_set();
        store.switch_to_prev_set();
        assert_eq!(store.current_set_index(), 0);

        let mut empty = SetStore::from_sets(Vec::new(), 0);
        empty.switch_to_next_set();
        empty.switch_to_prev_set();
        assert_eq!(empty.current_set_index(), 0);
    }

    #[test]
    fn switch_to_out_of_range_is_ignored() {
        let (mut store, _) = store_with(2);
        assert!(!store.switch_to_set(2));
        assert_eq!(store.current_set_index(), 1);
        assert!(store.switch_to_set(0));
        assert_eq!(store.current_set_index(), 0);
    }

    #[test]
    fn deleting_last_current_set_clamps_index() {
        let (mut store, ids) = store_with(3);
        assert!(store.delete_set(&ids[2]).is_some());
        assert_eq!(store.current_set_index(), 1);
    }

    #[test]
    fn deleting_earlier_set_keeps_index_in_range() {
        let (mut store, ids) = store_with(3);
        store.switch_to_set(1);
        store.delete_set(&ids[0]);
        assert_eq!(store.current_set_index(), 1);
        assert_eq!(store.current_set().map(|s| &s.id), Some(&ids[2]));
    }

    #[test]
    fn deleting_every_set_resets_index() {
        let (mut store, ids) = store_with(2);
        for id in &ids {
            store.delete_set(id);
        }
        assert!(store.is_empty());
        assert_eq!(store.current_set_index(), 0);
        assert!(store.current_set().is_none());
    }

    #[test]
    fn delete_unknown_set_is_noop() {
        let (mut store, _) = store_with(2);
        assert!(store.delete_set(&SetId::from("ghost")).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rename_bumps_updated_at() {
        let (mut store, ids) = store_with(1);
        let before = store.get(&ids[0]).map(|s| s.updated_at);
        assert!(store.update_set_name(&ids[0], "renamed"));
        let set = store.get(&ids[0]);
        assert_eq!(set.map(|s| s.name.as_str()), Some("renamed"));
        assert!(set.map(|s| s.updated_at) >= before);
        assert!(!store.update_set_name(&SetId::from("ghost"), "x"));
    }

    #[test]
    fn membership_is_idempotent() {
        let (mut store, ids) = store_with(1);
        let product = ProductId::from("p1");
        assert_eq!(store.add_product_to_set(&ids[0], product.clone()), Ok(true));
        assert_eq!(store.add_product_to_set(&ids[0], product.clone()), Ok(false));
        assert_eq!(store.get(&ids[0]).map(|s| s.product_ids.len()), Some(1));

        assert_eq!(store.remove_product_from_set(&ids[0], &product), Ok(true));
        assert_eq!(store.remove_product_from_set(&ids[0], &product), Ok(false));
        assert_eq!(
            store.add_product_to_set(&SetId::from("ghost"), product),
            Err(CatalogError::SetNotFound(SetId::from("ghost")))
        );
    }

    #[test]
    fn forget_product_touches_every_set() {
        let (mut store, ids) = store_with(3);
        let product = ProductId::from("p1");
        let _ = store.add_product_to_set(&ids[0], product.clone());
        let _ = store.add_product_to_set(&ids[2], product.clone());
        assert_eq!(store.forget_product(&product), 2);
        assert!(store.sets().iter().all(|s| !s.contains(&product)));
    }

    #[test]
    fn from_sets_clamps_stale_index() {
        let (store, _) = store_with(2);
        let rebuilt = SetStore::from_sets(store.sets().to_vec(), 9);
        assert_eq!(rebuilt.current_set_index(), 1);
    }
}
