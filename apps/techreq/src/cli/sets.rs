//! Set commands.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use techreq_core::{CatalogContext, CatalogError, ProductId, SetDraft, SetId};

use super::{position_to_index, print_json};
use crate::error::{CliError, Result};
use crate::storage::{load_catalog, save_catalog};

/// Add a set; it becomes current. Returns its id.
pub fn cmd_set_add(path: &Path, name: &str, json: bool) -> Result<SetId> {
    let mut context = load_catalog(path)?;
    let set = context.sets.add_set(SetDraft::new(name)).clone();
    save_catalog(&context, path)?;

    info!(set = %set.id, "set added");
    if json {
        print_json(&set)?;
    } else {
        println!("Added set {} ({})", set.name, set.id);
    }
    Ok(set.id)
}

pub fn cmd_set_delete(path: &Path, id: &str) -> Result<()> {
    let mut context = load_catalog(path)?;
    let id = SetId::from(id);
    let removed = context
        .sets
        .delete_set(&id)
        .ok_or(CatalogError::SetNotFound(id))?;
    save_catalog(&context, path)?;

    println!("Deleted set {}", removed.name);
    if context.sets.is_empty() {
        println!("No sets left");
    }
    Ok(())
}

pub fn cmd_set_rename(path: &Path, id: &str, name: &str) -> Result<()> {
    let mut context = load_catalog(path)?;
    let id = SetId::from(id);
    if !context.sets.update_set_name(&id, name) {
        return Err(CatalogError::SetNotFound(id).into());
    }
    save_catalog(&context, path)?;

    println!("Renamed set to {}", name);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetRow<'a> {
    position: usize,
    id: &'a SetId,
    name: &'a str,
    products: usize,
    current: bool,
}

/// List sets with their one-based positions. Returns how many there are.
pub fn cmd_set_list(path: &Path, json: bool) -> Result<usize> {
    let context = load_catalog(path)?;
    context.sets.log_state();

    let current = context.sets.current_set_index();
    let rows: Vec<SetRow<'_>> = context
        .sets
        .sets()
        .iter()
        .enumerate()
        .map(|(index, set)| SetRow {
            position: index.saturating_add(1),
            id: &set.id,
            name: &set.name,
            products: set.product_ids.len(),
            current: index == current,
        })
        .collect();

    if json {
        print_json(&rows)?;
        return Ok(rows.len());
    }
    for row in &rows {
        let marker = if row.current { "*" } else { " " };
        println!(
            "{} {}. {}  {} product(s)  [{}]",
            marker, row.position, row.name, row.products, row.id
        );
    }
    if rows.is_empty() {
        println!("No sets");
    }
    Ok(rows.len())
}

/// List the products of the current set. Returns how many there are.
pub fn cmd_set_show(path: &Path, json: bool) -> Result<usize> {
    let context = load_catalog(path)?;
    let Some(set) = context.sets.current_set() else {
        println!("No sets");
        return Ok(0);
    };
    let products = context.set_products(set);

    if json {
        print_json(&products)?;
        return Ok(products.len());
    }
    println!("{} ({})", set.name, set.id);
    for product in &products {
        println!("  {}  {}  [{}]", product.id, product.name, product.standard);
    }
    Ok(products.len())
}

/// Advance to the next set. Returns the new current set's id.
pub fn cmd_set_next(path: &Path) -> Result<Option<SetId>> {
    switch_with(path, |context| context.sets.switch_to_next_set())
}

/// Step back to the previous set. Returns the new current set's id.
pub fn cmd_set_prev(path: &Path) -> Result<Option<SetId>> {
    switch_with(path, |context| context.sets.switch_to_prev_set())
}

/// Make the set at a one-based position current.
pub fn cmd_set_switch(path: &Path, position: usize) -> Result<()> {
    let mut context = load_catalog(path)?;
    let index = position_to_index(position)?;
    if !context.sets.switch_to_set(index) {
        return Err(CatalogError::InvalidIndex {
            index,
            len: context.sets.len(),
        }
        .into());
    }
    save_catalog(&context, path)?;

    print_current(&context);
    Ok(())
}

/// Add a product to a set (the current one by default). Returns whether it
/// was newly added.
pub fn cmd_set_add_product(path: &Path, set: Option<&str>, product: &str) -> Result<bool> {
    let mut context = load_catalog(path)?;
    let set_id = resolve_set(&context, set)?;
    let added = context.add_product_to_set(&set_id, &ProductId::from(product))?;
    if added {
        save_catalog(&context, path)?;
        println!("Added {} to the set", product);
    } else {
        println!("{} is already in the set", product);
    }
    Ok(added)
}

/// Remove a product from a set (the current one by default). Returns whether
/// it was a member.
pub fn cmd_set_remove_product(path: &Path, set: Option<&str>, product: &str) -> Result<bool> {
    let mut context = load_catalog(path)?;
    let set_id = resolve_set(&context, set)?;
    let removed = context
        .sets
        .remove_product_from_set(&set_id, &ProductId::from(product))?;
    if removed {
        save_catalog(&context, path)?;
        println!("Removed {} from the set", product);
    } else {
        println!("{} is not in the set", product);
    }
    Ok(removed)
}

// =============================================================================
// HELPERS
// =============================================================================

fn switch_with(path: &Path, switch: impl FnOnce(&mut CatalogContext)) -> Result<Option<SetId>> {
    let mut context = load_catalog(path)?;
    switch(&mut context);
    save_catalog(&context, path)?;

    print_current(&context);
    Ok(context.sets.current_set().map(|set| set.id.clone()))
}

fn print_current(context: &CatalogContext) {
    match context.sets.current_set() {
        Some(set) => println!(
            "Current set: {}. {}",
            context.sets.current_set_index().saturating_add(1),
            set.name
        ),
        None => println!("No sets"),
    }
}

fn resolve_set(context: &CatalogContext, id: Option<&str>) -> Result<SetId> {
    match id {
        Some(id) => Ok(SetId::from(id)),
        None => context
            .sets
            .current_set()
            .map(|set| set.id.clone())
            .ok_or_else(|| CliError::Usage("no sets (run `set add` first)".to_owned())),
    }
}
