//! # CLI Module
//!
//! Argument definitions and command dispatch.
//!
//! Every subcommand is backed by a `cmd_*` function that takes the catalog
//! path (or the resolved [`AppConfig`] for commands that talk to the server),
//! loads the snapshot, applies one catalog operation and writes it back.

mod catalog;
mod sets;
mod sync;

pub use catalog::{
    IndicatorEdit, ProductValidation, cmd_characteristic_add, cmd_characteristic_move,
    cmd_characteristic_remove, cmd_indicator_add, cmd_indicator_delete, cmd_indicator_move,
    cmd_indicator_update, cmd_indicator_validate, cmd_init, cmd_product_add, cmd_product_delete,
    cmd_product_list, cmd_product_select, cmd_product_show, cmd_product_update, read_drafts,
};
pub use sets::{
    cmd_set_add, cmd_set_add_product, cmd_set_delete, cmd_set_list, cmd_set_next, cmd_set_prev,
    cmd_set_remove_product, cmd_set_rename, cmd_set_show, cmd_set_switch,
};
pub use sync::{SyncSummary, cmd_pull, cmd_push};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use techreq_core::{GroupFilter, ProductGroup, ProductPatch};

use crate::config::{AppConfig, DEFAULT_CATALOG_PATH, DEFAULT_TIMEOUT_SECS};
use crate::error::{CliError, Result};
use crate::logging::{LogConfig, LogFormat};

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "techreq",
    version,
    about = "Edit a catalog of technical requirements for building materials"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Catalog snapshot file.
    #[arg(long, env = "TECHREQ_CATALOG", default_value = DEFAULT_CATALOG_PATH, global = true)]
    pub catalog: PathBuf,

    /// REST backend root URL.
    #[arg(long = "api-url", env = "TECHREQ_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for the REST backend.
    #[arg(long = "api-key", env = "TECHREQ_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Resolve the shared runtime configuration.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        AppConfig {
            catalog: self.catalog.clone(),
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            json: self.json,
        }
    }

    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_verbosity(self.verbose).with_format(self.log_format)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new catalog file.
    Init {
        /// Seed the catalog with sample products.
        #[arg(long)]
        demo: bool,
        /// Overwrite an existing catalog.
        #[arg(long)]
        force: bool,
    },

    /// Manage products.
    #[command(subcommand)]
    Product(ProductCommand),

    /// Manage a product's characteristics.
    #[command(subcommand)]
    Characteristic(CharacteristicCommand),

    /// Manage a product's indicators.
    #[command(subcommand)]
    Indicator(IndicatorCommand),

    /// Manage product sets.
    #[command(subcommand)]
    Set(SetCommand),

    /// Upload local products and sets to the server.
    Push,

    /// Replace the local catalog with the server's.
    Pull,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Add a product and select it.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        standard: String,
        /// road-materials, construction-materials, binding-materials or fillers.
        #[arg(long)]
        group: ProductGroup,
    },
    /// List products, optionally filtered.
    List {
        /// Case-insensitive substring of the product name.
        #[arg(long)]
        search: Option<String>,
        /// A group id or `all`.
        #[arg(long, default_value = "all")]
        group: GroupFilter,
    },
    /// Print a product's characteristics and indicators.
    Show {
        /// Defaults to the selected product.
        id: Option<String>,
    },
    /// Delete a product and drop it from every set.
    Delete { id: String },
    /// Make a product the selected one.
    Select { id: String },
    /// Change a product's name, standard or group.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        standard: Option<String>,
        #[arg(long)]
        group: Option<ProductGroup>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CharacteristicCommand {
    /// Add a characteristic. The name "Для любых критериев" adds the
    /// universal one, which disables all others.
    Add {
        name: String,
        #[arg(long, default_value = "")]
        criteria: String,
        /// Defaults to the selected product.
        #[arg(long)]
        product: Option<String>,
    },
    /// Move a characteristic between one-based positions.
    Move {
        from: usize,
        to: usize,
        #[arg(long)]
        product: Option<String>,
    },
    /// Remove a characteristic with its indicators.
    Remove {
        id: String,
        #[arg(long)]
        product: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum IndicatorCommand {
    /// Add indicators to the product's first characteristic.
    Add {
        #[command(flatten)]
        fields: IndicatorEdit,
        /// JSON file holding an array of indicators to add instead.
        #[arg(long, conflicts_with = "name")]
        file: Option<PathBuf>,
        #[arg(long)]
        product: Option<String>,
    },
    /// Delete indicators by id.
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long)]
        product: Option<String>,
    },
    /// Edit an indicator's fields. Its position is kept.
    Update {
        id: String,
        #[command(flatten)]
        fields: IndicatorEdit,
        #[arg(long)]
        product: Option<String>,
    },
    /// Move an indicator between one-based positions within a characteristic.
    Move {
        characteristic: String,
        from: usize,
        to: usize,
        #[arg(long)]
        product: Option<String>,
    },
    /// Check indicator fields and report what blocks saving.
    Validate {
        /// Defaults to every product.
        #[arg(long)]
        product: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Add a set and make it current.
    Add { name: String },
    /// Delete a set.
    Delete { id: String },
    /// Rename a set.
    Rename { id: String, name: String },
    /// List sets, marking the current one.
    List,
    /// List the products in the current set.
    Show,
    /// Switch to the next set, wrapping around.
    Next,
    /// Switch to the previous set, wrapping around.
    Prev,
    /// Switch to the set at a one-based position.
    Switch { position: usize },
    /// Add a product to a set.
    AddProduct {
        product: String,
        /// Defaults to the current set.
        #[arg(long)]
        set: Option<String>,
    },
    /// Remove a product from a set.
    RemoveProduct {
        product: String,
        #[arg(long)]
        set: Option<String>,
    },
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Run one parsed command.
pub async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let path = config.catalog.as_path();
    let json = config.json;

    match command {
        Command::Init { demo, force } => cmd_init(path, demo, force),
        Command::Product(product) => match product {
            ProductCommand::Add {
                name,
                standard,
                group,
            } => cmd_product_add(path, &name, &standard, group, json).map(drop),
            ProductCommand::List { search, group } => {
                cmd_product_list(path, search.as_deref(), group, json).map(drop)
            }
            ProductCommand::Show { id } => cmd_product_show(path, id.as_deref(), json).map(drop),
            ProductCommand::Delete { id } => cmd_product_delete(path, &id),
            ProductCommand::Select { id } => cmd_product_select(path, &id),
            ProductCommand::Update {
                id,
                name,
                standard,
                group,
            } => cmd_product_update(
                path,
                &id,
                ProductPatch {
                    name,
                    standard,
                    group,
                },
                json,
            ),
        },
        Command::Characteristic(characteristic) => match characteristic {
            CharacteristicCommand::Add {
                name,
                criteria,
                product,
            } => cmd_characteristic_add(path, product.as_deref(), &name, &criteria, json).map(drop),
            CharacteristicCommand::Move { from, to, product } => {
                cmd_characteristic_move(path, product.as_deref(), from, to)
            }
            CharacteristicCommand::Remove { id, product } => {
                cmd_characteristic_remove(path, product.as_deref(), &id)
            }
        },
        Command::Indicator(indicator) => match indicator {
            IndicatorCommand::Add {
                fields,
                file,
                product,
            } => {
                let drafts = match file {
                    Some(file) => read_drafts(&file)?,
                    None => vec![fields.into_draft()?],
                };
                cmd_indicator_add(path, product.as_deref(), drafts, json).map(drop)
            }
            IndicatorCommand::Delete { ids, product } => {
                cmd_indicator_delete(path, product.as_deref(), &ids).map(drop)
            }
            IndicatorCommand::Update {
                id,
                fields,
                product,
            } => cmd_indicator_update(path, product.as_deref(), &id, &fields).map(drop),
            IndicatorCommand::Move {
                characteristic,
                from,
                to,
                product,
            } => cmd_indicator_move(path, product.as_deref(), &characteristic, from, to),
            IndicatorCommand::Validate { product } => {
                let reports = cmd_indicator_validate(path, product.as_deref(), json)?;
                let invalid: usize = reports.iter().map(|r| r.issues.len()).sum();
                if invalid > 0 {
                    return Err(CliError::Invalid {
                        count: reports.iter().filter(|r| !r.issues.is_empty()).count(),
                        names: invalid_names(&reports),
                    });
                }
                Ok(())
            }
        },
        Command::Set(set) => match set {
            SetCommand::Add { name } => cmd_set_add(path, &name, json).map(drop),
            SetCommand::Delete { id } => cmd_set_delete(path, &id),
            SetCommand::Rename { id, name } => cmd_set_rename(path, &id, &name),
            SetCommand::List => cmd_set_list(path, json).map(drop),
            SetCommand::Show => cmd_set_show(path, json).map(drop),
            SetCommand::Next => cmd_set_next(path).map(drop),
            SetCommand::Prev => cmd_set_prev(path).map(drop),
            SetCommand::Switch { position } => cmd_set_switch(path, position),
            SetCommand::AddProduct { product, set } => {
                cmd_set_add_product(path, set.as_deref(), &product).map(drop)
            }
            SetCommand::RemoveProduct { product, set } => {
                cmd_set_remove_product(path, set.as_deref(), &product).map(drop)
            }
        },
        Command::Push => {
            let summary = cmd_push(config).await?;
            print_summary("Pushed", summary, json)
        }
        Command::Pull => {
            let summary = cmd_pull(config).await?;
            print_summary("Pulled", summary, json)
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Convert a one-based position from the command line to an index.
pub(crate) fn position_to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| CliError::Usage("positions start at 1".to_owned()))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(verb: &str, summary: SyncSummary, json: bool) -> Result<()> {
    if json {
        return print_json(&summary);
    }
    println!(
        "{} {} product(s) and {} set(s)",
        verb, summary.products, summary.sets
    );
    Ok(())
}

fn invalid_names(reports: &[ProductValidation]) -> String {
    reports
        .iter()
        .filter(|r| !r.issues.is_empty())
        .map(|r| r.product_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        assert_eq!(position_to_index(1).ok(), Some(0));
        assert!(matches!(position_to_index(0), Err(CliError::Usage(_))));
    }

    #[test]
    fn global_flags_resolve_into_config() {
        let cli = Cli::try_parse_from([
            "techreq",
            "--catalog",
            "/tmp/c.json",
            "--api-url",
            "http://localhost:9000",
            "--timeout-secs",
            "5",
            "product",
            "list",
            "--json",
        ]);
        let config = cli.as_ref().map(Cli::config).ok();
        assert_eq!(
            config,
            Some(
                AppConfig::for_catalog("/tmp/c.json")
                    .with_api_url("http://localhost:9000")
                    .with_timeout(Duration::from_secs(5))
                    .with_json(true)
            )
        );
    }

    #[test]
    fn group_filter_parses_from_flag() {
        let cli = Cli::try_parse_from(["techreq", "product", "list", "--group", "fillers"]);
        let group = cli.ok().and_then(|cli| match cli.command {
            Command::Product(ProductCommand::List { group, .. }) => Some(group),
            _ => None,
        });
        assert_eq!(group, Some(GroupFilter::Group(ProductGroup::Fillers)));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let cli = Cli::try_parse_from(["techreq", "product", "add", "X", "--group", "metals"]);
        assert!(cli.is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["techreq", "-vv", "set", "list"]);
        assert_eq!(cli.map(|c| c.verbose).ok(), Some(2));
    }
}
