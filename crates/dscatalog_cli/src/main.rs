//! Operator CLI over the catalog core.
//!
//! # Responsibility
//! - Open the configured database, optionally load demo data.
//! - Print catalog DTOs and pages as JSON for quick local inspection.

use clap::{Parser, Subcommand};
use dscatalog_core::db::{open_db, open_db_in_memory, seed_demo_catalog};
use dscatalog_core::{
    init_logging, CatalogConfig, CategoryService, PageRequest, ProductFilter, ProductService,
    Sort, SortProperty, SqliteCategoryRepository, SqliteProductRepository,
};
use log::info;
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "dscatalog", version, about = "Catalog backend operator CLI")]
struct Cli {
    /// Load demo data into an empty catalog before running the command.
    #[arg(long, global = true)]
    seed: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the configured database and print core version.
    Ping,
    /// Load demo categories and products into an empty catalog.
    Seed,
    /// List one page of products.
    Products {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        /// One of id|name|price|date.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        /// Name substring, ignoring ASCII case.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<i64>,
    },
    /// Show one product.
    Product { id: i64 },
    /// Delete one product.
    DeleteProduct { id: i64 },
    /// List one page of categories.
    Categories {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = CatalogConfig::from_env()?;

    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let mut conn = match config.db_path.as_ref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let seeded = if cli.seed || matches!(cli.command, Command::Seed) {
        let seeded = seed_demo_catalog(&mut conn)?;
        info!("event=cli_seed module=cli status=ok seeded={seeded}");
        seeded
    } else {
        false
    };

    let products = ProductService::new(
        SqliteProductRepository::try_new(&conn)?,
        SqliteCategoryRepository::try_new(&conn)?,
    );
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn)?);

    let output = match cli.command {
        Command::Ping => json!({
            "ping": dscatalog_core::ping(),
            "version": dscatalog_core::core_version(),
        }),
        Command::Seed => json!({ "seeded": seeded }),
        Command::Products {
            page,
            size,
            sort,
            desc,
            name,
            category,
        } => {
            let mut request = PageRequest::of(page, size.unwrap_or(config.page_size));
            if let Some(raw) = sort {
                let property = SortProperty::parse(&raw)
                    .ok_or_else(|| format!("unknown sort property `{raw}`"))?;
                request = request.with_sort(if desc {
                    Sort::desc(property)
                } else {
                    Sort::asc(property)
                });
            }
            let filter = ProductFilter {
                name,
                category_id: category,
            };
            serde_json::to_value(products.search_paged(&filter, &request)?)?
        }
        Command::Product { id } => serde_json::to_value(products.find_by_id(id)?)?,
        Command::DeleteProduct { id } => {
            products.delete(id)?;
            json!({ "deleted": id })
        }
        Command::Categories { page, size } => {
            let request = PageRequest::of(page, size.unwrap_or(config.page_size));
            serde_json::to_value(categories.find_all_paged(&request)?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
