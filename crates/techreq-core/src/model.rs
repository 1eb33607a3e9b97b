//! # Model
//!
//! Catalog records and the typed drafts accepted at the boundary.
//!
//! Records (`Product`, `Characteristic`, `Indicator`, `ProductSet`) carry
//! identity and ordering. Drafts carry only what a caller may supply; the
//! stores assign ids, ranks and timestamps when a draft is admitted.
//!
//! Wire names follow the REST collaborator: camelCase fields, kebab-case
//! product groups, camelCase comparison operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ordering::Ordered;
use crate::primitives::{
    CharacteristicId, IndicatorId, ProductId, SetId, Timestamp, UNIVERSAL_CHARACTERISTIC_NAME,
    UNIVERSAL_CRITERION_SENTINEL, now,
};

// =============================================================================
// ENUMS
// =============================================================================

/// Returned when a group or comparison name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Material group a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductGroup {
    RoadMaterials,
    ConstructionMaterials,
    BindingMaterials,
    Fillers,
}

impl ProductGroup {
    /// Every group, in catalog display order.
    pub const ALL: [ProductGroup; 4] = [
        ProductGroup::RoadMaterials,
        ProductGroup::ConstructionMaterials,
        ProductGroup::BindingMaterials,
        ProductGroup::Fillers,
    ];

    /// Wire identifier, e.g. `road-materials`.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ProductGroup::RoadMaterials => "road-materials",
            ProductGroup::ConstructionMaterials => "construction-materials",
            ProductGroup::BindingMaterials => "binding-materials",
            ProductGroup::Fillers => "fillers",
        }
    }

    /// Human-readable group name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            ProductGroup::RoadMaterials => "Дорожные материалы",
            ProductGroup::ConstructionMaterials => "Строительные материалы",
            ProductGroup::BindingMaterials => "Вяжущие материалы",
            ProductGroup::Fillers => "Наполнители",
        }
    }
}

impl fmt::Display for ProductGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProductGroup {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.id() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "product group",
                value: s.to_owned(),
            })
    }
}

/// How an indicator's value is compared against a measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOperator {
    #[default]
    Equals,
    Range,
    Greater,
    Less,
    GreaterOrEquals,
    LessOrEquals,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 6] = [
        ComparisonOperator::Equals,
        ComparisonOperator::Range,
        ComparisonOperator::Greater,
        ComparisonOperator::Less,
        ComparisonOperator::GreaterOrEquals,
        ComparisonOperator::LessOrEquals,
    ];

    /// Wire identifier, e.g. `greaterOrEquals`.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "equals",
            ComparisonOperator::Range => "range",
            ComparisonOperator::Greater => "greater",
            ComparisonOperator::Less => "less",
            ComparisonOperator::GreaterOrEquals => "greaterOrEquals",
            ComparisonOperator::LessOrEquals => "lessOrEquals",
        }
    }

    /// Short symbol for listings.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "=",
            ComparisonOperator::Range => "..",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::Less => "<",
            ComparisonOperator::GreaterOrEquals => ">=",
            ComparisonOperator::LessOrEquals => "<=",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ComparisonOperator {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.id() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "comparison operator",
                value: s.to_owned(),
            })
    }
}

// =============================================================================
// INDICATOR
// =============================================================================

/// A single measurable requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub id: IndicatorId,
    pub name: String,
    pub standard: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub comparison: ComparisonOperator,
    /// Free-form value; its legal grammar depends on `comparison`.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub deviation: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub additional_requirements: String,
    /// Rank among siblings, one-based.
    #[serde(default)]
    pub order: u32,
}

impl Indicator {
    /// Admit a draft under the given id and rank.
    #[must_use]
    pub fn from_draft(draft: IndicatorDraft, id: IndicatorId, order: u32) -> Self {
        Self {
            id,
            name: draft.name,
            standard: draft.standard,
            unit: draft.unit,
            comparison: draft.comparison,
            value: draft.value,
            deviation: draft.deviation,
            note: draft.note,
            additional_requirements: draft.additional_requirements,
            order,
        }
    }

    /// The editable part of this indicator.
    #[must_use]
    pub fn to_draft(&self) -> IndicatorDraft {
        IndicatorDraft {
            name: self.name.clone(),
            standard: self.standard.clone(),
            unit: self.unit.clone(),
            comparison: self.comparison,
            value: self.value.clone(),
            deviation: self.deviation.clone(),
            note: self.note.clone(),
            additional_requirements: self.additional_requirements.clone(),
        }
    }
}

impl Ordered for Indicator {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Indicator fields a caller supplies; id and rank are assigned on admission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorDraft {
    pub name: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub comparison: ComparisonOperator,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub deviation: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub additional_requirements: String,
}

impl IndicatorDraft {
    /// Draft with the three fields validation cares about most.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        standard: impl Into<String>,
        comparison: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            standard: standard.into(),
            comparison,
            value: value.into(),
            ..Self::default()
        }
    }
}

// =============================================================================
// CHARACTERISTIC
// =============================================================================

/// A named group of indicators inside a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristic {
    pub id: CharacteristicId,
    pub name: String,
    #[serde(default)]
    pub criteria: String,
    /// Rank among sibling characteristics, one-based.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    /// Set when a universal characteristic supersedes this one.
    #[serde(default)]
    pub disabled: bool,
}

impl Characteristic {
    /// Create an empty, enabled characteristic with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>, criteria: impl Into<String>, order: u32) -> Self {
        Self {
            id: CharacteristicId::generate(),
            name: name.into(),
            criteria: criteria.into(),
            order,
            indicators: Vec::new(),
            disabled: false,
        }
    }

    /// Admit a draft: fresh ids for the characteristic and its indicators,
    /// indicators ranked 1..N in draft order.
    #[must_use]
    pub fn from_draft(draft: CharacteristicDraft, order: u32) -> Self {
        let mut characteristic = Self::new(draft.name, draft.criteria, order);
        characteristic.indicators = draft
            .indicators
            .into_iter()
            .zip(1u32..)
            .map(|(indicator, rank)| Indicator::from_draft(indicator, IndicatorId::generate(), rank))
            .collect();
        characteristic
    }

    /// Whether this characteristic is the universal one, under either its
    /// raw or stored name.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.name == UNIVERSAL_CRITERION_SENTINEL || self.name == UNIVERSAL_CHARACTERISTIC_NAME
    }
}

impl Ordered for Characteristic {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Characteristic fields a caller supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicDraft {
    pub name: String,
    #[serde(default)]
    pub criteria: String,
    #[serde(default)]
    pub indicators: Vec<IndicatorDraft>,
}

impl CharacteristicDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, criteria: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            criteria: criteria.into(),
            indicators: Vec::new(),
        }
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

/// A catalog product with its characteristic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub standard: String,
    pub group: ProductGroup,
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Admit a draft with a fresh id and the current time.
    #[must_use]
    pub fn from_draft(draft: ProductDraft) -> Self {
        let timestamp = now();
        Self {
            id: ProductId::generate(),
            name: draft.name,
            standard: draft.standard,
            group: draft.group,
            characteristics: draft
                .characteristics
                .into_iter()
                .zip(1u32..)
                .map(|(characteristic, rank)| Characteristic::from_draft(characteristic, rank))
                .collect(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// All indicators, characteristic by characteristic.
    pub fn indicators(&self) -> impl Iterator<Item = &Indicator> {
        self.characteristics
            .iter()
            .flat_map(|characteristic| characteristic.indicators.iter())
    }

    /// Number of indicators across all characteristics.
    #[must_use]
    pub fn indicator_count(&self) -> usize {
        self.characteristics
            .iter()
            .map(|characteristic| characteristic.indicators.len())
            .sum()
    }

    /// Find a characteristic by id.
    #[must_use]
    pub fn characteristic(&self, id: &CharacteristicId) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| &c.id == id)
    }

    /// Find an indicator by id anywhere in the tree.
    #[must_use]
    pub fn indicator(&self, id: &IndicatorId) -> Option<&Indicator> {
        self.indicators().find(|indicator| &indicator.id == id)
    }

    #[must_use]
    pub fn has_universal(&self) -> bool {
        self.characteristics.iter().any(Characteristic::is_universal)
    }
}

/// Product fields a caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub standard: String,
    pub group: ProductGroup,
    #[serde(default)]
    pub characteristics: Vec<CharacteristicDraft>,
}

impl ProductDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, standard: impl Into<String>, group: ProductGroup) -> Self {
        Self {
            name: name.into(),
            standard: standard.into(),
            group,
            characteristics: Vec::new(),
        }
    }
}

/// Partial update of a product's own fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub group: Option<ProductGroup>,
}

impl ProductPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.standard.is_none() && self.group.is_none()
    }
}

// =============================================================================
// SET
// =============================================================================

/// A named, ordered selection of products.
///
/// Products are referenced by id and resolved against the product store, so
/// edits made through the product store are visible through every set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSet {
    pub id: SetId,
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductSet {
    #[must_use]
    pub fn from_draft(draft: SetDraft) -> Self {
        let timestamp = now();
        Self {
            id: SetId::generate(),
            name: draft.name,
            product_ids: draft.product_ids,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    #[must_use]
    pub fn contains(&self, product: &ProductId) -> bool {
        self.product_ids.contains(product)
    }
}

/// Set fields a caller supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDraft {
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<ProductId>,
}

impl SetDraft {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            product_ids: Vec::new(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
