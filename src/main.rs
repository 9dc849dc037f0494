mod config;
mod db;
mod editor;
mod logging;
mod models;
mod run;
mod transfer;
mod ui;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

use db::ProjectStore;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let dirs = get_dirs()?;

    let config = config::load_or_default(&dirs.config)?;
    logging::init(&dirs.data, &config.log_level)?;

    let db_path = config
        .database
        .clone()
        .unwrap_or_else(|| dirs.data.join("budgetline.db"));
    let mut db = db::Database::open(&db_path)?;
    ensure_sample_project(&mut db)?;

    match args.len() {
        1 => run::as_tui(&mut db, &config),
        _ => run::as_cli(&args, &mut db, &config),
    }
}

/// Seed one example project so a first run has something to edit.
fn ensure_sample_project(db: &mut dyn ProjectStore) -> Result<()> {
    if !db.list_projects()?.is_empty() {
        return Ok(());
    }
    let mut project = models::Project::new("Sample project".into(), Decimal::from(1_000_000));
    let mut item = models::BudgetItem::new(models::ItemId::generate());
    item.name = "Project staff".into();
    item.unit = "person".into();
    item.unit_price = Decimal::from(380_000);
    item.total_price = item.unit_price;
    item.description = "Coordinator, full year".into();
    project.budget_items.push(item);
    db.save_project(&project)?;
    info!(project = %project.id, "seeded sample project");
    Ok(())
}

struct Dirs {
    config: PathBuf,
    data: PathBuf,
}

fn get_dirs() -> Result<Dirs> {
    let proj_dirs = directories::ProjectDirs::from("com", "budgetline", "budgetline")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data = proj_dirs.data_dir().to_path_buf();
    create_dir(&data)?;
    Ok(Dirs {
        config: proj_dirs.config_dir().to_path_buf(),
        data,
    })
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))
}
