//! # Catalog Context
//!
//! The application context that owns both stores and keeps them consistent.
//! Sets hold product ids; the context resolves them against the product store
//! and removes an id from every set when its product is deleted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::model::{Product, ProductSet};
use crate::primitives::{ProductId, SetId};
use crate::products::ProductStore;
use crate::sets::SetStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Both stores, owned together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogContext {
    pub products: ProductStore,
    pub sets: SetStore,
}

impl CatalogContext {
    /// Empty catalog with the default set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Demonstration catalog with the default set.
    #[must_use]
    pub fn with_demo_catalog() -> Self {
        Self {
            products: ProductStore::with_demo_catalog(),
            sets: SetStore::new(),
        }
    }

    /// Delete a product and drop it from every set.
    pub fn delete_product(&mut self, id: &ProductId) -> Option<Product> {
        let removed = self.products.delete_product(id)?;
        let touched = self.sets.forget_product(id);
        debug!(product = %id, sets = touched, "product removed from sets");
        Some(removed)
    }

    /// Add an existing product to a set.
    pub fn add_product_to_set(&mut self, set: &SetId, product: &ProductId) -> Result<bool> {
        if !self.products.contains(product) {
            return Err(CatalogError::ProductNotFound(product.clone()));
        }
        self.sets.add_product_to_set(set, product.clone())
    }

    /// Resolve a set's members, in set order. Dangling ids are skipped.
    pub fn set_products(&self, set: &ProductSet) -> Vec<&Product> {
        set.product_ids
            .iter()
            .filter_map(|id| self.products.get(id))
            .collect()
    }

    /// Members of the current set, or nothing when there are no sets.
    #[must_use]
    pub fn current_set_products(&self) -> Vec<&Product> {
        self.sets
            .current_set()
            .map(|set| self.set_products(set))
            .unwrap_or_default()
    }

    /// Remove set members that no longer name a product. Returns how many
    /// ids were dropped.
    pub fn reconcile(&mut self) -> usize {
        let dangling: Vec<ProductId> = self
            .sets
            .sets()
            .iter()
            .flat_map(|set| set.product_ids.iter())
            .filter(|id| !self.products.contains(id))
            .cloned()
            .collect();

        let mut dropped = 0usize;
        for id in &dangling {
            dropped = dropped.saturating_add(self.sets.forget_product(id));
        }
        if dropped > 0 {
            debug!(dropped, "dangling set members removed");
        }
        dropped
    }

    /// Capture the persistent part of the context.
    #[must_use]
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            version: SNAPSHOT_VERSION,
            products: self.products.products().to_vec(),
            sets: self.sets.sets().to_vec(),
            current_set_index: self.sets.current_set_index(),
            current_product_id: self.products.current_product_id().cloned(),
        }
    }

    /// Rebuild a context from a snapshot. Stale pointers are repaired.
    #[must_use]
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut context = Self {
            products: ProductStore::from_products(snapshot.products),
            sets: SetStore::from_sets(snapshot.sets, snapshot.current_set_index),
        };
        context.products.set_current_product(snapshot.current_product_id);
        context.reconcile();
        context
    }
}

/// Serializable form of a [`CatalogContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub version: u32,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sets: Vec<ProductSet>,
    #[serde(default)]
    pub current_set_index: usize,
    #[serde(default)]
    pub current_product_id: Option<ProductId>,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductDraft, ProductGroup, SetDraft};

    #[test]
    fn deleting_product_drops_it_from_sets() {
        let mut context = CatalogContext::with_demo_catalog();
        let set = context.sets.current_set().map(|s| s.id.clone()).expect("default set");
        let concrete = ProductId::from("1");

        assert_eq!(context.add_product_to_set(&set, &concrete), Ok(true));
        assert_eq!(context.current_set_products().len(), 1);

        assert!(context.delete_product(&concrete).is_some());
        assert!(context.current_set_products().is_empty());
        assert!(context.sets.get(&set).is_some_and(|s| s.product_ids.is_empty()));
    }

    #[test]
    fn set_members_reflect_product_edits() {
        let mut context = CatalogContext::new();
        let id = context
            .products
            .add_product(ProductDraft::new("Песок", "ГОСТ 8736", ProductGroup::Fillers))
            .id
            .clone();
        let set = context.sets.add_set(SetDraft::new("Наполнители")).id.clone();
        let _ = context.add_product_to_set(&set, &id);

        let patch = crate::model::ProductPatch {
            name: Some("Песок речной".to_owned()),
            ..Default::default()
        };
        let _ = context.products.update_product(&id, patch);

        let names: Vec<&str> = context.current_set_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Песок речной"]);
    }

    #[test]
    fn unknown_product_cannot_join_a_set() {
        let mut context = CatalogContext::new();
        let set = context.sets.current_set().map(|s| s.id.clone()).expect("default set");
        let ghost = ProductId::from("ghost");
        assert_eq!(
            context.add_product_to_set(&set, &ghost),
            Err(CatalogError::ProductNotFound(ghost))
        );
    }

    #[test]
    fn snapshot_restores_pointers() {
        let mut context = CatalogContext::with_demo_catalog();
        context.products.set_current_product(Some(ProductId::from("2")));
        context.sets.add_set(SetDraft::new("second"));

        let json = serde_json::to_string(&context.to_snapshot()).unwrap_or_default();
        let snapshot: Option<CatalogSnapshot> = serde_json::from_str(&json).ok();
        let restored = snapshot.map(CatalogContext::from_snapshot);

        assert_eq!(
            restored.as_ref().and_then(|c| c.products.current_product_id()),
            Some(&ProductId::from("2"))
        );
        assert_eq!(restored.as_ref().map(|c| c.sets.current_set_index()), Some(1));
        assert_eq!(restored.map(|c| c.products.len()), Some(2));
    }

    #[test]
    fn from_snapshot_drops_dangling_members() {
        let mut snapshot = CatalogContext::with_demo_catalog().to_snapshot();
        if let Some(set) = snapshot.sets.first_mut() {
            set.product_ids = vec![ProductId::from("1"), ProductId::from("gone")];
        }
        snapshot.current_product_id = Some(ProductId::from("gone"));

        let context = CatalogContext::from_snapshot(snapshot);
        assert_eq!(
            context.sets.current_set().map(|s| s.product_ids.clone()),
            Some(vec![ProductId::from("1")])
        );
        assert!(context.products.current_product_id().is_none());
    }
}
