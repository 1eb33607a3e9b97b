//! # Product Store
//!
//! Owns the product list and every product's characteristic/indicator tree.
//!
//! Mutations go through the pure helpers in [`crate::ordering`] and
//! [`crate::criteria`], so the rank and universal-criterion invariants hold
//! after every call. The store also keeps the browsing state the catalog view
//! needs: the current product, the search text and the group filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::criteria;
use crate::error::{CatalogError, Result};
use crate::model::{
    Characteristic, CharacteristicDraft, ComparisonOperator, Indicator, IndicatorDraft,
    ParseEnumError, Product, ProductDraft, ProductGroup, ProductPatch,
};
use crate::ordering::{renumber, reorder};
use crate::primitives::{
    CharacteristicId, DEFAULT_CHARACTERISTIC_CRITERIA, DEFAULT_CHARACTERISTIC_NAME, IndicatorId,
    ProductId, now,
};

// =============================================================================
// GROUP FILTER
// =============================================================================

/// Group restriction of the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupFilter {
    #[default]
    All,
    #[serde(untagged)]
    Group(ProductGroup),
}

impl GroupFilter {
    #[must_use]
    pub fn matches(self, group: ProductGroup) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(selected) => selected == group,
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::All => f.write_str("all"),
            GroupFilter::Group(group) => group.fmt(f),
        }
    }
}

impl FromStr for GroupFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "all" {
            return Ok(GroupFilter::All);
        }
        s.parse().map(GroupFilter::Group)
    }
}

impl From<ProductGroup> for GroupFilter {
    fn from(group: ProductGroup) -> Self {
        GroupFilter::Group(group)
    }
}

// =============================================================================
// PRODUCT STORE
// =============================================================================

/// The product catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductStore {
    products: Vec<Product>,
    current_product: Option<ProductId>,
    search_query: String,
    selected_group: GroupFilter,
}

impl ProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store over an existing product list (e.g. loaded from disk).
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Store seeded with the demonstration catalog.
    #[must_use]
    pub fn with_demo_catalog() -> Self {
        Self::from_products(demo_products())
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// The groups a product may belong to, in display order.
    #[must_use]
    pub fn product_groups(&self) -> &'static [ProductGroup] {
        &ProductGroup::ALL
    }

    /// Products passing both the group filter and the name search.
    ///
    /// The search is a case-insensitive substring match on the product name;
    /// an empty query matches everything.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        let query = self.search_query.to_lowercase();
        self.products
            .iter()
            .filter(|product| self.selected_group.matches(product.group))
            .filter(|product| query.is_empty() || product.name.to_lowercase().contains(&query))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Browsing state
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn current_product(&self) -> Option<&Product> {
        self.current_product.as_ref().and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn current_product_id(&self) -> Option<&ProductId> {
        self.current_product.as_ref()
    }

    /// Select a product, or clear the selection with `None`.
    ///
    /// Selecting an unknown id is ignored and returns `false`.
    pub fn set_current_product(&mut self, id: Option<ProductId>) -> bool {
        match id {
            Some(id) if !self.contains(&id) => {
                warn!(product = %id, "cannot select unknown product");
                false
            }
            id => {
                self.current_product = id;
                true
            }
        }
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    #[must_use]
    pub fn selected_group(&self) -> GroupFilter {
        self.selected_group
    }

    pub fn set_selected_group(&mut self, group: GroupFilter) {
        self.selected_group = group;
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Admit a draft and append it. Returns the stored product.
    pub fn add_product(&mut self, draft: ProductDraft) -> &Product {
        let product = Product::from_draft(draft);
        debug!(product = %product.id, name = %product.name, "product added");
        let index = self.products.len();
        self.products.push(product);
        &self.products[index]
    }

    /// Overwrite the product's own fields and bump `updated_at`.
    pub fn update_product(&mut self, id: &ProductId, patch: ProductPatch) -> Result<&Product> {
        let product = self.product_mut(id)?;
        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(standard) = patch.standard {
            product.standard = standard;
        }
        if let Some(group) = patch.group {
            product.group = group;
        }
        product.updated_at = now();
        debug!(product = %product.id, "product updated");
        Ok(&*product)
    }

    /// Remove a product. Absent ids are a no-op.
    ///
    /// If the removed product was selected, the first remaining product (or
    /// none) becomes current.
    pub fn delete_product(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        let removed = self.products.remove(index);
        debug!(product = %removed.id, name = %removed.name, remaining = self.products.len(), "product deleted");

        if self.current_product.as_ref() == Some(id) {
            self.current_product = self.products.first().map(|p| p.id.clone());
            match &self.current_product {
                Some(next) => debug!(product = %next, "current product reselected"),
                None => debug!("no products left, current product cleared"),
            }
        }
        Some(removed)
    }

    // -------------------------------------------------------------------------
    // Characteristics
    // -------------------------------------------------------------------------

    /// Add a characteristic under the universal-criterion rule, then rank the
    /// product's characteristics 1..N.
    pub fn add_characteristic(
        &mut self,
        product_id: &ProductId,
        draft: CharacteristicDraft,
    ) -> Result<CharacteristicId> {
        let product = self.product_mut(product_id)?;
        let incoming = Characteristic::from_draft(draft, 0);
        let id = incoming.id.clone();

        let mut characteristics = criteria::apply_new_characteristic(&product.characteristics, incoming)?;
        renumber(&mut characteristics);
        product.characteristics = characteristics;
        debug!(product = %product_id, characteristic = %id, "characteristic added");
        Ok(id)
    }

    /// Remove a characteristic and re-rank the rest.
    pub fn remove_characteristic(
        &mut self,
        product_id: &ProductId,
        characteristic_id: &CharacteristicId,
    ) -> Result<Characteristic> {
        let product = self.product_mut(product_id)?;
        let index = product
            .characteristics
            .iter()
            .position(|c| &c.id == characteristic_id)
            .ok_or_else(|| CatalogError::CharacteristicNotFound(characteristic_id.clone()))?;

        let (removed, mut rest) = criteria::remove_characteristic(&product.characteristics, index)?;
        renumber(&mut rest);
        product.characteristics = rest;
        debug!(product = %product_id, characteristic = %removed.id, "characteristic removed");
        Ok(removed)
    }

    /// Move a characteristic from one position to another.
    pub fn reorder_characteristics(
        &mut self,
        product_id: &ProductId,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let product = self.product_mut(product_id)?;
        product.characteristics = reorder(&product.characteristics, from, to)?;
        debug!(product = %product_id, from, to, "characteristics reordered");
        Ok(())
    }

    /// Move an indicator within one characteristic.
    pub fn reorder_indicators(
        &mut self,
        product_id: &ProductId,
        characteristic_id: &CharacteristicId,
        from: usize,
        to: usize,
    ) -> Result<()> {
        let product = self.product_mut(product_id)?;
        let characteristic = product
            .characteristics
            .iter_mut()
            .find(|c| &c.id == characteristic_id)
            .ok_or_else(|| CatalogError::CharacteristicNotFound(characteristic_id.clone()))?;
        characteristic.indicators = reorder(&characteristic.indicators, from, to)?;
        debug!(product = %product_id, characteristic = %characteristic_id, from, to, "indicators reordered");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Indicators
    // -------------------------------------------------------------------------

    /// Append indicators to the product's first characteristic.
    ///
    /// A product without characteristics first gets the default one. New
    /// indicators are ranked after the current length of that
    /// characteristic; existing ranks are left alone.
    pub fn add_indicators_to_product(
        &mut self,
        product_id: &ProductId,
        drafts: Vec<IndicatorDraft>,
    ) -> Result<Vec<IndicatorId>> {
        let product = self.product_mut(product_id)?;

        if product.characteristics.is_empty() {
            debug!(product = %product_id, "no characteristics, creating the default one");
            product.characteristics.push(Characteristic::new(
                DEFAULT_CHARACTERISTIC_NAME,
                DEFAULT_CHARACTERISTIC_CRITERIA,
                1,
            ));
        }
        // Non-empty from here on.
        let target = &mut product.characteristics[0];

        let start = u32::try_from(target.indicators.len()).unwrap_or(u32::MAX);
        let mut ids = Vec::with_capacity(drafts.len());
        for (draft, offset) in drafts.into_iter().zip(1u32..) {
            let id = IndicatorId::generate();
            target
                .indicators
                .push(Indicator::from_draft(draft, id.clone(), start.saturating_add(offset)));
            ids.push(id);
        }
        debug!(product = %product_id, added = ids.len(), "indicators added");
        Ok(ids)
    }

    /// Remove indicators by id from every characteristic of the product.
    ///
    /// Each characteristic that lost indicators is re-ranked 1..M. Returns
    /// how many indicators were removed.
    pub fn delete_indicators(
        &mut self,
        product_id: &ProductId,
        indicator_ids: &[IndicatorId],
    ) -> Result<usize> {
        let product = self.product_mut(product_id)?;
        let mut removed = 0usize;

        for characteristic in &mut product.characteristics {
            let before = characteristic.indicators.len();
            characteristic
                .indicators
                .retain(|indicator| !indicator_ids.contains(&indicator.id));
            let after = characteristic.indicators.len();
            if after != before {
                renumber(&mut characteristic.indicators);
                removed = removed.saturating_add(before.saturating_sub(after));
            }
        }

        debug!(product = %product_id, removed, "indicators deleted");
        Ok(removed)
    }

    /// Replace an indicator's fields in place.
    ///
    /// The first characteristic holding an indicator with `updated.id` wins.
    /// The stored rank is kept so sibling ranks stay dense. Returns `false`
    /// when no such indicator exists.
    pub fn update_indicator(&mut self, product_id: &ProductId, updated: Indicator) -> Result<bool> {
        let product = self.product_mut(product_id)?;

        for characteristic in &mut product.characteristics {
            if let Some(slot) = characteristic
                .indicators
                .iter_mut()
                .find(|indicator| indicator.id == updated.id)
            {
                let order = slot.order;
                *slot = Indicator { order, ..updated };
                debug!(product = %product_id, indicator = %slot.id, "indicator updated");
                return Ok(true);
            }
        }

        warn!(product = %product_id, indicator = %updated.id, "indicator to update not found");
        Ok(false)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }
}

// =============================================================================
// DEMO CATALOG
// =============================================================================

/// The two sample products the catalog ships with.
#[must_use]
pub fn demo_products() -> Vec<Product> {
    let timestamp = now();

    let sieve = Indicator {
        id: IndicatorId::from("1"),
        name: "Проход через сито 45,0 мм".to_owned(),
        standard: "ГОСТ 7473-2010".to_owned(),
        unit: "%".to_owned(),
        comparison: ComparisonOperator::Range,
        value: "90-100".to_owned(),
        deviation: "5".to_owned(),
        note: "нет".to_owned(),
        additional_requirements: "нет".to_owned(),
        order: 1,
    };

    let grain = Characteristic {
        id: CharacteristicId::from("1"),
        name: "A32".to_owned(),
        criteria: "Максимальная крупность зерен".to_owned(),
        order: 1,
        indicators: vec![sieve],
        disabled: false,
    };

    vec![
        Product {
            id: ProductId::from("1"),
            name: "Бетон тяжелый".to_owned(),
            standard: "ГОСТ 7473-2010".to_owned(),
            group: ProductGroup::ConstructionMaterials,
            characteristics: vec![grain],
            created_at: timestamp,
            updated_at: timestamp,
        },
        Product {
            id: ProductId::from("2"),
            name: "Асфальтобетон".to_owned(),
            standard: "ГОСТ 9128-2013".to_owned(),
            group: ProductGroup::RoadMaterials,
            characteristics: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        },
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::is_dense;
    use crate::primitives::{UNIVERSAL_CHARACTERISTIC_NAME, UNIVERSAL_CRITERION_SENTINEL};

    fn draft(name: &str) -> IndicatorDraft {
        IndicatorDraft::new(name, "GOST", ComparisonOperator::Equals, "1")
    }

    fn store_with(names: &[&str]) -> (ProductStore, Vec<ProductId>) {
        let mut store = ProductStore::new();
        let ids = names
            .iter()
            .map(|name| {
                store
                    .add_product(ProductDraft::new(*name, "GOST", ProductGroup::Fillers))
                    .id
                    .clone()
            })
            .collect();
        (store, ids)
    }

    fn first_ranks(store: &ProductStore, id: &ProductId) -> Vec<u32> {
        store
            .get(id)
            .and_then(|p| p.characteristics.first())
            .map(|c| c.indicators.iter().map(|i| i.order).collect())
            .unwrap_or_default()
    }

    #[test]
    fn add_product_assigns_identity_and_timestamps() {
        let mut store = ProductStore::new();
        let product = store.add_product(ProductDraft::new("Щебень", "ГОСТ 8267", ProductGroup::Fillers));
        assert!(!product.id.as_str().is_empty());
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_current_selects_first_remaining() {
        let (mut store, ids) = store_with(&["a", "b", "c"]);
        assert!(store.set_current_product(Some(ids[1].clone())));

        let removed = store.delete_product(&ids[1]);
        assert_eq!(removed.map(|p| p.name), Some("b".to_owned()));
        assert_eq!(store.current_product_id(), Some(&ids[0]));
    }

    #[test]
    fn delete_last_product_clears_selection() {
        let (mut store, ids) = store_with(&["only"]);
        store.set_current_product(Some(ids[0].clone()));
        store.delete_product(&ids[0]);
        assert!(store.current_product().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn delete_other_product_keeps_selection() {
        let (mut store, ids) = store_with(&["a", "b"]);
        store.set_current_product(Some(ids[1].clone()));
        store.delete_product(&ids[0]);
        assert_eq!(store.current_product_id(), Some(&ids[1]));
    }

    #[test]
    fn delete_missing_product_is_noop() {
        let (mut store, _) = store_with(&["a"]);
        assert!(store.delete_product(&ProductId::from("nope")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn selecting_unknown_product_is_ignored() {
        let (mut store, ids) = store_with(&["a"]);
        store.set_current_product(Some(ids[0].clone()));
        assert!(!store.set_current_product(Some(ProductId::from("ghost"))));
        assert_eq!(store.current_product_id(), Some(&ids[0]));
        assert!(store.set_current_product(None));
        assert!(store.current_product_id().is_none());
    }

    #[test]
    fn update_product_bumps_updated_at() {
        let (mut store, ids) = store_with(&["a"]);
        let created = store.get(&ids[0]).map(|p| p.created_at);
        let patch = ProductPatch {
            name: Some("renamed".to_owned()),
            ..ProductPatch::default()
        };
        let (name, updated_at) = store
            .update_product(&ids[0], patch)
            .map(|p| (p.name.clone(), p.updated_at))
            .expect("product exists");
        assert_eq!(name, "renamed");
        assert!(Some(updated_at) >= created);
    }

    #[test]
    fn filter_composes_group_and_search() {
        let mut store = ProductStore::with_demo_catalog();
        store.add_product(ProductDraft::new("Бетон лёгкий", "ГОСТ", ProductGroup::RoadMaterials));

        store.set_search_query("БЕТОН");
        assert_eq!(store.filtered_products().len(), 3);

        store.set_selected_group(GroupFilter::Group(ProductGroup::RoadMaterials));
        let names: Vec<&str> = store.filtered_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Асфальтобетон", "Бетон лёгкий"]);

        store.set_search_query("");
        store.set_selected_group(GroupFilter::Group(ProductGroup::ConstructionMaterials));
        assert_eq!(store.filtered_products().len(), 1);

        store.set_selected_group(GroupFilter::All);
        assert_eq!(store.filtered_products().len(), 3);
    }

    #[test]
    fn indicators_on_empty_product_get_default_characteristic() {
        let (mut store, ids) = store_with(&["a"]);
        let added = store.add_indicators_to_product(&ids[0], vec![draft("x"), draft("y")]);
        assert_eq!(added.map(|ids| ids.len()), Ok(2));

        let product = store.get(&ids[0]);
        let characteristic = product.and_then(|p| p.characteristics.first());
        assert_eq!(characteristic.map(|c| c.name.as_str()), Some(DEFAULT_CHARACTERISTIC_NAME));
        assert_eq!(characteristic.map(|c| c.criteria.as_str()), Some(DEFAULT_CHARACTERISTIC_CRITERIA));
        assert_eq!(characteristic.map(|c| c.order), Some(1));
        assert_eq!(first_ranks(&store, &ids[0]), vec![1, 2]);
    }

    #[test]
    fn empty_batch_still_creates_default_characteristic() {
        let (mut store, ids) = store_with(&["a"]);
        let added = store.add_indicators_to_product(&ids[0], Vec::new());
        assert_eq!(added, Ok(Vec::new()));

        let names: Vec<String> = store
            .get(&ids[0])
            .map(|p| p.characteristics.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec![DEFAULT_CHARACTERISTIC_NAME.to_owned()]);
    }

    #[test]
    fn indicators_go_to_first_characteristic_only() {
        let (mut store, ids) = store_with(&["a"]);
        let _ = store.add_characteristic(&ids[0], CharacteristicDraft::new("first", ""));
        let _ = store.add_characteristic(&ids[0], CharacteristicDraft::new("second", ""));
        let _ = store.add_indicators_to_product(&ids[0], vec![draft("x")]);

        let counts: Vec<usize> = store
            .get(&ids[0])
            .map(|p| p.characteristics.iter().map(|c| c.indicators.len()).collect())
            .unwrap_or_default();
        assert_eq!(counts, vec![1, 0]);
    }

    #[test]
    fn added_indicators_continue_from_current_length() {
        let (mut store, ids) = store_with(&["a"]);
        let _ = store.add_indicators_to_product(&ids[0], vec![draft("x"), draft("y")]);
        let _ = store.add_indicators_to_product(&ids[0], vec![draft("z")]);
        assert_eq!(first_ranks(&store, &ids[0]), vec![1, 2, 3]);
    }

    #[test]
    fn add_indicators_to_missing_product_fails() {
        let mut store = ProductStore::new();
        let missing = ProductId::from("missing");
        assert_eq!(
            store.add_indicators_to_product(&missing, vec![draft("x")]),
            Err(CatalogError::ProductNotFound(missing))
        );
    }

    #[test]
    fn delete_indicators_renumbers_survivors() {
        let (mut store, ids) = store_with(&["a"]);
        let added = store
            .add_indicators_to_product(&ids[0], vec![draft("a"), draft("b"), draft("c"), draft("d")])
            .unwrap_or_default();

        let removed = store.delete_indicators(&ids[0], &[added[0].clone(), added[2].clone()]);
        assert_eq!(removed, Ok(2));

        let names: Vec<String> = store
            .get(&ids[0])
            .map(|p| p.indicators().map(|i| i.name.clone()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["b", "d"]);
        assert_eq!(first_ranks(&store, &ids[0]), vec![1, 2]);
    }

    #[test]
    fn delete_indicators_leaves_untouched_characteristics_alone() {
        let mut store = ProductStore::with_demo_catalog();
        let id = ProductId::from("1");
        let _ = store.add_characteristic(&id, CharacteristicDraft::new("second", ""));
        let removed = store.delete_indicators(&id, &[IndicatorId::from("absent")]);
        assert_eq!(removed, Ok(0));
        assert_eq!(first_ranks(&store, &id), vec![1]);
    }

    #[test]
    fn update_indicator_replaces_fields_and_keeps_rank() {
        let (mut store, ids) = store_with(&["a"]);
        let added = store
            .add_indicators_to_product(&ids[0], vec![draft("a"), draft("b")])
            .unwrap_or_default();

        let mut updated = Indicator::from_draft(
            IndicatorDraft::new("b2", "ГОСТ 1", ComparisonOperator::Range, "1-2"),
            added[1].clone(),
            99,
        );
        updated.unit = "%".to_owned();
        assert_eq!(store.update_indicator(&ids[0], updated), Ok(true));

        let stored = store.get(&ids[0]).and_then(|p| p.indicator(&added[1]));
        assert_eq!(stored.map(|i| i.name.as_str()), Some("b2"));
        assert_eq!(stored.map(|i| i.unit.as_str()), Some("%"));
        assert_eq!(stored.map(|i| i.order), Some(2));
    }

    #[test]
    fn update_unknown_indicator_is_noop() {
        let mut store = ProductStore::with_demo_catalog();
        let before = store.clone();
        let ghost = Indicator::from_draft(draft("ghost"), IndicatorId::from("ghost"), 1);
        assert_eq!(store.update_indicator(&ProductId::from("1"), ghost), Ok(false));
        assert_eq!(store, before);
    }

    #[test]
    fn universal_characteristic_through_store() {
        let (mut store, ids) = store_with(&["a"]);
        let _ = store.add_characteristic(&ids[0], CharacteristicDraft::new("A", ""));
        let _ = store.add_characteristic(&ids[0], CharacteristicDraft::new("B", ""));
        let universal = store.add_characteristic(
            &ids[0],
            CharacteristicDraft::new(UNIVERSAL_CRITERION_SENTINEL, ""),
        );
        assert!(universal.is_ok());

        let product = store.get(&ids[0]).cloned();
        let characteristics = product.map(|p| p.characteristics).unwrap_or_default();
        let summary: Vec<(&str, bool, u32)> = characteristics
            .iter()
            .map(|c| (c.name.as_str(), c.disabled, c.order))
            .collect();
        assert_eq!(
            summary,
            vec![
                (UNIVERSAL_CHARACTERISTIC_NAME, false, 1),
                ("A", true, 2),
                ("B", true, 3),
            ]
        );

        let before = store.clone();
        let again = store.add_characteristic(
            &ids[0],
            CharacteristicDraft::new(UNIVERSAL_CRITERION_SENTINEL, ""),
        );
        assert_eq!(again, Err(CatalogError::DuplicateUniversalCriterion));
        assert_eq!(store, before);
    }

    #[test]
    fn removing_universal_through_store_reenables() {
        let (mut store, ids) = store_with(&["a"]);
        let _ = store.add_characteristic(&ids[0], CharacteristicDraft::new("A", ""));
        let universal = store
            .add_characteristic(&ids[0], CharacteristicDraft::new(UNIVERSAL_CRITERION_SENTINEL, ""))
            .expect("first universal is accepted");

        let removed = store.remove_characteristic(&ids[0], &universal);
        assert!(removed.is_ok_and(|c| c.is_universal()));

        let product = store.get(&ids[0]);
        assert!(product.is_some_and(|p| p.characteristics.iter().all(|c| !c.disabled)));
        assert!(product.is_some_and(|p| is_dense(&p.characteristics)));
    }

    #[test]
    fn reorder_through_store() {
        let (mut store, ids) = store_with(&["a"]);
        let added = store
            .add_indicators_to_product(&ids[0], vec![draft("a"), draft("b"), draft("c")])
            .unwrap_or_default();
        let characteristic = store
            .get(&ids[0])
            .and_then(|p| p.characteristics.first())
            .map(|c| c.id.clone())
            .expect("default characteristic exists");

        assert!(store.reorder_indicators(&ids[0], &characteristic, 2, 0).is_ok());
        let order: Vec<IndicatorId> = store
            .get(&ids[0])
            .map(|p| p.indicators().map(|i| i.id.clone()).collect())
            .unwrap_or_default();
        assert_eq!(order, vec![added[2].clone(), added[0].clone(), added[1].clone()]);
        assert_eq!(first_ranks(&store, &ids[0]), vec![1, 2, 3]);

        assert_eq!(
            store.reorder_indicators(&ids[0], &characteristic, 5, 0),
            Err(CatalogError::InvalidIndex { index: 5, len: 3 })
        );
        assert!(store.reorder_characteristics(&ids[0], 0, 0).is_ok());
    }

    #[test]
    fn demo_catalog_matches_shipped_sample() {
        let store = ProductStore::with_demo_catalog();
        assert_eq!(store.len(), 2);
        let concrete = store.get(&ProductId::from("1"));
        assert_eq!(concrete.map(Product::indicator_count), Some(1));
        assert!(concrete.is_some_and(|p| crate::validation::can_save(p)));
    }

    #[test]
    fn group_filter_parses_all_and_groups() {
        assert_eq!("all".parse::<GroupFilter>(), Ok(GroupFilter::All));
        assert_eq!(
            "fillers".parse::<GroupFilter>(),
            Ok(GroupFilter::Group(ProductGroup::Fillers))
        );
        assert!("none".parse::<GroupFilter>().is_err());
    }
}
