//! Push and pull against the REST backend.

use serde::Serialize;
use tracing::{debug, info};

use techreq_core::validation::can_save;
use techreq_core::{CatalogContext, CatalogSnapshot, Product, ProductSet, SNAPSHOT_VERSION};
use techreq_sdk::TechReqClient;

use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::storage::{load_catalog, load_or_create_catalog, save_catalog};

/// Record counts moved by a push or pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub products: usize,
    pub sets: usize,
}

/// Upload every local product and set.
///
/// Nothing is sent while any product has invalid indicators. Records the
/// server does not know yet are created; the rest are replaced.
pub async fn cmd_push(config: &AppConfig) -> Result<SyncSummary> {
    let context = load_catalog(&config.catalog)?;

    let blocked: Vec<&str> = context
        .products
        .products()
        .iter()
        .filter(|product| !can_save(product))
        .map(|product| product.name.as_str())
        .collect();
    if !blocked.is_empty() {
        return Err(CliError::Invalid {
            count: blocked.len(),
            names: blocked.join(", "),
        });
    }

    let client = config.client()?;
    for product in context.products.products() {
        upsert_product(&client, product).await?;
    }
    for set in context.sets.sets() {
        upsert_set(&client, set).await?;
    }

    let summary = SyncSummary {
        products: context.products.len(),
        sets: context.sets.len(),
    };
    info!(
        url = client.base_url(),
        products = summary.products,
        sets = summary.sets,
        "catalog pushed"
    );
    Ok(summary)
}

/// Replace the local products and sets with the server's lists.
///
/// The selected product and current set position survive when they still
/// make sense against the new data.
pub async fn cmd_pull(config: &AppConfig) -> Result<SyncSummary> {
    let client = config.client()?;
    let products = client.list_products().await?;
    let sets = client.list_sets().await?;

    let previous = load_or_create_catalog(&config.catalog)?;
    let summary = SyncSummary {
        products: products.len(),
        sets: sets.len(),
    };
    let context = CatalogContext::from_snapshot(CatalogSnapshot {
        version: SNAPSHOT_VERSION,
        products,
        sets,
        current_set_index: previous.sets.current_set_index(),
        current_product_id: previous.products.current_product_id().cloned(),
    });
    save_catalog(&context, &config.catalog)?;

    info!(
        url = client.base_url(),
        products = summary.products,
        sets = summary.sets,
        "catalog pulled"
    );
    Ok(summary)
}

async fn upsert_product(client: &TechReqClient, product: &Product) -> Result<()> {
    match client.update_product(product).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => {
            debug!(product = %product.id, "unknown to server, creating");
            client.create_product(product).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn upsert_set(client: &TechReqClient, set: &ProductSet) -> Result<()> {
    match client.update_set(set).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => {
            debug!(set = %set.id, "unknown to server, creating");
            client.create_set(set).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
