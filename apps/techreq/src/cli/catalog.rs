//! Product, characteristic and indicator commands.

use std::fs;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use techreq_core::validation::{can_save, validate_product};
use techreq_core::{
    CatalogContext, CatalogError, CharacteristicDraft, CharacteristicId, ComparisonOperator,
    GroupFilter, Indicator, IndicatorDraft, IndicatorId, IndicatorIssues, Product, ProductDraft,
    ProductGroup, ProductId, ProductPatch, format_date, validate,
};

use super::{position_to_index, print_json};
use crate::error::{CliError, Result};
use crate::storage::{load_catalog, load_or_create_catalog, save_catalog};

// =============================================================================
// INIT
// =============================================================================

/// Create a catalog file, optionally seeded with the sample products.
pub fn cmd_init(path: &Path, demo: bool, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.to_path_buf()));
    }

    let context = if demo {
        CatalogContext::with_demo_catalog()
    } else {
        CatalogContext::new()
    };
    save_catalog(&context, path)?;

    info!(path = %path.display(), products = context.products.len(), "catalog initialized");
    println!("Initialized catalog at {}", path.display());
    Ok(())
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Add a product and make it the selected one.
pub fn cmd_product_add(
    path: &Path,
    name: &str,
    standard: &str,
    group: ProductGroup,
    json: bool,
) -> Result<ProductId> {
    let mut context = load_or_create_catalog(path)?;
    let product = context
        .products
        .add_product(ProductDraft::new(name, standard, group))
        .clone();
    context.products.set_current_product(Some(product.id.clone()));
    save_catalog(&context, path)?;

    info!(product = %product.id, "product added");
    if json {
        print_json(&product)?;
    } else {
        println!("Added product {} ({})", product.name, product.id);
    }
    Ok(product.id)
}

/// List products passing the search text and group filter.
///
/// Returns how many products were listed.
pub fn cmd_product_list(
    path: &Path,
    search: Option<&str>,
    group: GroupFilter,
    json: bool,
) -> Result<usize> {
    let mut context = load_or_create_catalog(path)?;
    context.products.set_search_query(search.unwrap_or_default());
    context.products.set_selected_group(group);

    let products = context.products.filtered_products();
    if json {
        print_json(&products)?;
        return Ok(products.len());
    }

    let current = context.products.current_product_id();
    for product in &products {
        let marker = if current == Some(&product.id) { "*" } else { " " };
        println!(
            "{} {}  {}  {}  [{}]  {} indicator(s)",
            marker,
            product.id,
            product.name,
            product.standard,
            product.group.display_name(),
            product.indicator_count()
        );
    }
    if products.is_empty() {
        println!("No products match");
    }
    Ok(products.len())
}

/// Print one product's tree. Without an id the selected product is shown.
pub fn cmd_product_show(path: &Path, id: Option<&str>, json: bool) -> Result<Product> {
    let context = load_catalog(path)?;
    let id = resolve_product(&context, id)?;
    let product = context
        .products
        .get(&id)
        .cloned()
        .ok_or(CatalogError::ProductNotFound(id))?;

    if json {
        print_json(&product)?;
        return Ok(product);
    }

    println!("{} ({})", product.name, product.id);
    println!("  Standard: {}", product.standard);
    println!("  Group:    {}", product.group.display_name());
    println!("  Updated:  {}", format_date(&product.updated_at));
    for characteristic in &product.characteristics {
        let state = if characteristic.disabled { " (disabled)" } else { "" };
        println!(
            "  {}. {} - {}{}  [{}]",
            characteristic.order,
            characteristic.name,
            characteristic.criteria,
            state,
            characteristic.id
        );
        for indicator in &characteristic.indicators {
            println!(
                "     {}. {}  {} {} {}  ({})  [{}]",
                indicator.order,
                indicator.name,
                indicator.comparison.symbol(),
                indicator.value,
                indicator.unit,
                indicator.standard,
                indicator.id
            );
        }
    }
    Ok(product)
}

/// Delete a product; sets that held it forget it.
pub fn cmd_product_delete(path: &Path, id: &str) -> Result<()> {
    let mut context = load_catalog(path)?;
    let id = ProductId::from(id);
    let removed = context
        .delete_product(&id)
        .ok_or(CatalogError::ProductNotFound(id))?;
    save_catalog(&context, path)?;

    info!(product = %removed.id, "product deleted");
    println!("Deleted product {}", removed.name);
    Ok(())
}

pub fn cmd_product_select(path: &Path, id: &str) -> Result<()> {
    let mut context = load_catalog(path)?;
    let id = ProductId::from(id);
    if !context.products.set_current_product(Some(id.clone())) {
        return Err(CatalogError::ProductNotFound(id).into());
    }
    save_catalog(&context, path)?;

    println!("Selected product {}", id);
    Ok(())
}

/// Apply a partial update to a product's own fields.
pub fn cmd_product_update(path: &Path, id: &str, patch: ProductPatch, json: bool) -> Result<()> {
    if patch.is_empty() {
        return Err(CliError::Usage(
            "nothing to update (pass --name, --standard or --group)".to_owned(),
        ));
    }

    let mut context = load_catalog(path)?;
    let product = context
        .products
        .update_product(&ProductId::from(id), patch)?
        .clone();
    save_catalog(&context, path)?;

    if json {
        print_json(&product)?;
    } else {
        println!("Updated product {} ({})", product.name, product.id);
    }
    Ok(())
}

// =============================================================================
// CHARACTERISTICS
// =============================================================================

/// Add a characteristic. Returns its id.
pub fn cmd_characteristic_add(
    path: &Path,
    product: Option<&str>,
    name: &str,
    criteria: &str,
    json: bool,
) -> Result<CharacteristicId> {
    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    let id = context
        .products
        .add_characteristic(&product_id, CharacteristicDraft::new(name, criteria))?;
    save_catalog(&context, path)?;

    let added = context
        .products
        .get(&product_id)
        .and_then(|p| p.characteristic(&id));
    if json {
        print_json(&added)?;
    } else if let Some(characteristic) = added {
        println!(
            "Added characteristic {} at position {} ({})",
            characteristic.name, characteristic.order, characteristic.id
        );
    }
    Ok(id)
}

pub fn cmd_characteristic_move(
    path: &Path,
    product: Option<&str>,
    from: usize,
    to: usize,
) -> Result<()> {
    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    context.products.reorder_characteristics(
        &product_id,
        position_to_index(from)?,
        position_to_index(to)?,
    )?;
    save_catalog(&context, path)?;

    println!("Moved characteristic {} -> {}", from, to);
    Ok(())
}

pub fn cmd_characteristic_remove(path: &Path, product: Option<&str>, id: &str) -> Result<()> {
    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    let removed = context
        .products
        .remove_characteristic(&product_id, &CharacteristicId::from(id))?;
    save_catalog(&context, path)?;

    println!(
        "Removed characteristic {} with {} indicator(s)",
        removed.name,
        removed.indicators.len()
    );
    Ok(())
}

// =============================================================================
// INDICATORS
// =============================================================================

/// Indicator fields from the command line. Unset fields are left alone on
/// update and default to empty on add.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub standard: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    /// equals, range, greater, less, greaterOrEquals or lessOrEquals.
    #[arg(long)]
    pub comparison: Option<ComparisonOperator>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub deviation: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long = "additional")]
    pub additional_requirements: Option<String>,
}

impl IndicatorEdit {
    /// Build a new-indicator draft. A name is required.
    pub fn into_draft(self) -> Result<IndicatorDraft> {
        let name = self
            .name
            .ok_or_else(|| CliError::Usage("--name is required (or pass --file)".to_owned()))?;
        Ok(IndicatorDraft {
            name,
            standard: self.standard.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            comparison: self.comparison.unwrap_or_default(),
            value: self.value.unwrap_or_default(),
            deviation: self.deviation.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            additional_requirements: self.additional_requirements.unwrap_or_default(),
        })
    }

    /// Overwrite the fields that were given.
    pub fn apply(&self, indicator: &mut Indicator) {
        let fields = [
            (&self.name, &mut indicator.name),
            (&self.standard, &mut indicator.standard),
            (&self.unit, &mut indicator.unit),
            (&self.value, &mut indicator.value),
            (&self.deviation, &mut indicator.deviation),
            (&self.note, &mut indicator.note),
            (&self.additional_requirements, &mut indicator.additional_requirements),
        ];
        for (edit, slot) in fields {
            if let Some(value) = edit {
                slot.clone_from(value);
            }
        }
        if let Some(comparison) = self.comparison {
            indicator.comparison = comparison;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Read an array of indicator drafts from a JSON file.
pub fn read_drafts(file: &Path) -> Result<Vec<IndicatorDraft>> {
    let content = fs::read_to_string(file)?;
    Ok(serde_json::from_str(&content)?)
}

/// Append indicators to the product's first characteristic.
///
/// Indicators are stored even when they fail validation; the findings are
/// printed so they can be fixed before pushing.
pub fn cmd_indicator_add(
    path: &Path,
    product: Option<&str>,
    drafts: Vec<IndicatorDraft>,
    json: bool,
) -> Result<Vec<IndicatorId>> {
    if drafts.is_empty() {
        return Err(CliError::Usage("no indicators to add".to_owned()));
    }

    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    let ids = context
        .products
        .add_indicators_to_product(&product_id, drafts)?;
    save_catalog(&context, path)?;

    let added: Vec<&Indicator> = context
        .products
        .get(&product_id)
        .map(|p| ids.iter().filter_map(|id| p.indicator(id)).collect())
        .unwrap_or_default();
    if json {
        print_json(&added)?;
    } else {
        for indicator in &added {
            println!("Added indicator {} ({})", indicator.name, indicator.id);
            report_findings(indicator);
        }
    }
    Ok(ids)
}

/// Delete indicators by id. Returns how many were removed.
pub fn cmd_indicator_delete(path: &Path, product: Option<&str>, ids: &[String]) -> Result<usize> {
    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    let ids: Vec<IndicatorId> = ids.iter().map(|id| IndicatorId::from(id.as_str())).collect();
    let removed = context.products.delete_indicators(&product_id, &ids)?;

    if removed == 0 {
        warn!(product = %product_id, "no matching indicators");
        println!("No matching indicators");
        return Ok(0);
    }
    save_catalog(&context, path)?;

    println!("Deleted {} indicator(s)", removed);
    Ok(removed)
}

/// Edit an indicator in place. Returns the stored result.
pub fn cmd_indicator_update(
    path: &Path,
    product: Option<&str>,
    id: &str,
    edit: &IndicatorEdit,
) -> Result<Indicator> {
    if edit.is_empty() {
        return Err(CliError::Usage("nothing to update".to_owned()));
    }

    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    let indicator_id = IndicatorId::from(id);
    let mut indicator = context
        .products
        .get(&product_id)
        .and_then(|p| p.indicator(&indicator_id))
        .cloned()
        .ok_or_else(|| CliError::not_found("indicator", id))?;

    edit.apply(&mut indicator);
    context
        .products
        .update_indicator(&product_id, indicator.clone())?;
    save_catalog(&context, path)?;

    println!("Updated indicator {} ({})", indicator.name, indicator.id);
    report_findings(&indicator);
    Ok(indicator)
}

pub fn cmd_indicator_move(
    path: &Path,
    product: Option<&str>,
    characteristic: &str,
    from: usize,
    to: usize,
) -> Result<()> {
    let mut context = load_catalog(path)?;
    let product_id = resolve_product(&context, product)?;
    context.products.reorder_indicators(
        &product_id,
        &CharacteristicId::from(characteristic),
        position_to_index(from)?,
        position_to_index(to)?,
    )?;
    save_catalog(&context, path)?;

    println!("Moved indicator {} -> {}", from, to);
    Ok(())
}

/// Validation findings for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductValidation {
    pub product_id: ProductId,
    pub product_name: String,
    pub can_save: bool,
    pub issues: Vec<IndicatorIssues>,
}

/// Validate one product, or every product when none is named.
pub fn cmd_indicator_validate(
    path: &Path,
    product: Option<&str>,
    json: bool,
) -> Result<Vec<ProductValidation>> {
    let context = load_catalog(path)?;
    let products: Vec<&Product> = match product {
        Some(id) => {
            let id = ProductId::from(id);
            let product = context
                .products
                .get(&id)
                .ok_or(CatalogError::ProductNotFound(id))?;
            vec![product]
        }
        None => context.products.products().iter().collect(),
    };

    let reports: Vec<ProductValidation> = products
        .into_iter()
        .map(|product| ProductValidation {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            can_save: can_save(product),
            issues: validate_product(product),
        })
        .collect();

    if json {
        print_json(&reports)?;
        return Ok(reports);
    }

    for report in &reports {
        if report.can_save {
            println!("{}: ok", report.product_name);
            continue;
        }
        println!("{}: cannot be saved", report.product_name);
        for issue in &report.issues {
            let messages: Vec<String> = issue.errors.iter().map(ToString::to_string).collect();
            println!(
                "  {} ({}): {}",
                issue.indicator_name,
                issue.indicator_id,
                messages.join(", ")
            );
        }
    }
    Ok(reports)
}

// =============================================================================
// HELPERS
// =============================================================================

/// Pick the named product, or fall back to the selected one.
fn resolve_product(context: &CatalogContext, id: Option<&str>) -> Result<ProductId> {
    match id {
        Some(id) => Ok(ProductId::from(id)),
        None => context
            .products
            .current_product_id()
            .cloned()
            .ok_or_else(|| {
                CliError::Usage("no product selected (pass --product or run `product select`)".to_owned())
            }),
    }
}

fn report_findings(indicator: &Indicator) {
    for error in validate(indicator) {
        warn!(indicator = %indicator.id, %error, "indicator is invalid");
        println!("  warning: {}", error);
    }
}
