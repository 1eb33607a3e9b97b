//! # Techreq Core
//!
//! The in-memory catalog of technical requirements: products, their
//! characteristic/indicator trees, and named sets of products.
//!
//! ## Layout
//!
//! - [`ordering`]: dense one-based ranks (`renumber`, `reorder`)
//! - [`criteria`]: the universal-criterion rule
//! - [`validation`]: indicator field checks and the save gate
//! - [`products`], [`sets`]: the two stores
//! - [`context`]: both stores together, plus the persisted snapshot
//!
//! Everything here is synchronous and performs no I/O. Persistence lives in
//! `techreq-sdk` (REST) and the `techreq` binary (snapshot files).

pub mod context;
pub mod criteria;
pub mod error;
pub mod model;
pub mod ordering;
pub mod primitives;
pub mod products;
pub mod sets;
pub mod validation;

pub use context::{CatalogContext, CatalogSnapshot, SNAPSHOT_VERSION};
pub use criteria::apply_new_characteristic;
pub use error::{CatalogError, Result};
pub use model::{
    Characteristic, CharacteristicDraft, ComparisonOperator, Indicator, IndicatorDraft,
    ParseEnumError, Product, ProductDraft, ProductGroup, ProductPatch, ProductSet, SetDraft,
};
pub use ordering::{Ordered, renumber, reorder};
pub use primitives::{
    CharacteristicId, IndicatorId, ProductId, SetId, Timestamp, UNIVERSAL_CHARACTERISTIC_NAME,
    UNIVERSAL_CRITERION_SENTINEL, format_date,
};
pub use products::{GroupFilter, ProductStore};
pub use sets::SetStore;
pub use validation::{IndicatorIssues, ValidationError, validate, validate_all};
