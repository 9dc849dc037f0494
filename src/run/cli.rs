use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{Database, ProjectStore};
use crate::editor::{parse_amount, BudgetManager, ItemField, SyncPolicy};
use crate::models::{BudgetCategory, ItemId, Project};
use crate::transfer::{self, BudgetCsv};
use crate::ui::commands::default_export_name;
use crate::ui::util::{format_amount, format_quantity, shellexpand, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "projects" | "ls" => cli_projects(db),
        "new-project" => cli_new_project(rest, db, config),
        "items" => cli_items(rest, db, config),
        "add" => cli_add(rest, db, config),
        "set" => cli_set(rest, db, config),
        "remove" | "rm" => cli_remove(rest, db, config),
        "total" => cli_total(rest, db, config),
        "export" => cli_export(rest, db, config),
        "import" => cli_import(rest, db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetline {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budgetline - itemized project budget editor");
    println!();
    println!("Usage: budgetline [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  projects                            List projects with totals");
    println!("  new-project <name>                  Create an empty project");
    println!("    --approved <amount>               Approved budget figure (default: 0)");
    println!("  items <project>                     Print budget items");
    println!("  add <project>                       Add a default item, print its ID");
    println!("  set <project> <item> <field> <value>");
    println!("                                      Update one field of an item");
    println!("  remove <project> <item>             Remove an item");
    println!("  total <project>                     Print category subtotals and total");
    println!("  export <project> [path]             Export items to CSV (.json for JSON)");
    println!("  import <project> <file.csv>         Append items from a CSV file");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    let fields: Vec<&str> = ItemField::all().iter().map(|f| f.key()).collect();
    println!("Fields: {}", fields.join(", "));
    println!("<project> is a project ID or name (case-insensitive).");
}

/// An editor over the project named by `key` (an ID, else a name). One CLI
/// invocation is one complete edit, so changes go straight to the database.
fn open_editor(db: &Database, key: Option<&String>, config: &Config) -> Result<BudgetManager> {
    let Some(key) = key else {
        anyhow::bail!("Missing <project>. Run `budgetline projects` to list them");
    };
    let project = match db.load_project(key)? {
        Some(project) => project,
        None => Project::find(&db.list_projects()?, key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Project '{key}' not found"))?,
    };
    Ok(BudgetManager::new(vec![project], config.role, SyncPolicy::Live))
}

fn require_item(manager: &BudgetManager, id: Option<&String>) -> Result<ItemId> {
    let Some(id) = id else {
        anyhow::bail!("Missing <item>. Run `budgetline items <project>` to list IDs");
    };
    let id = ItemId::from(id.as_str());
    if !manager.items().iter().any(|i| i.id == id) {
        anyhow::bail!("Item '{id}' not found");
    }
    Ok(id)
}

fn cli_projects(db: &Database) -> Result<()> {
    let projects = db.list_projects()?;
    if projects.is_empty() {
        println!("No projects");
        return Ok(());
    }

    println!("{:<40} {:<28} {:>6} {:>18}", "ID", "Name", "Items", "Total");
    println!("{}", "─".repeat(95));
    for p in &projects {
        println!(
            "{:<40} {:<28} {:>6} {:>18}",
            p.id,
            truncate(&p.name, 28),
            p.budget_items.len(),
            format_amount(crate::editor::aggregate_total(&p.budget_items)),
        );
    }
    Ok(())
}

fn cli_new_project(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    if !config.role.can_edit_budget() {
        anyhow::bail!("{} role may not create projects", config.role);
    }

    let approved = match args.windows(2).find(|w| w[0] == "--approved") {
        Some(w) => parse_amount(&w[1])
            .filter(|a| !a.is_sign_negative())
            .ok_or_else(|| anyhow::anyhow!("Invalid approved amount: {}", w[1]))?,
        None => rust_decimal::Decimal::ZERO,
    };
    let name = args
        .iter()
        .take_while(|a| *a != "--approved")
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if name.trim().is_empty() {
        anyhow::bail!("Usage: budgetline new-project <name> [--approved <amount>]");
    }

    let existing = db.list_projects()?;
    if existing.iter().any(|p| p.name.eq_ignore_ascii_case(name.trim())) {
        anyhow::bail!("A project named '{}' already exists", name.trim());
    }

    let project = Project::new(name.trim().to_string(), approved);
    db.save_project(&project)?;
    println!("Created project {} ({})", project.name, project.id);
    Ok(())
}

fn cli_items(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let manager = open_editor(db, args.first(), config)?;
    let items = manager.items();
    if items.is_empty() {
        println!("No budget items");
        return Ok(());
    }

    println!(
        "{:<40} {:<14} {:<24} {:>8} {:<8} {:>16} {:>16}",
        "ID", "Category", "Name", "Qty", "Unit", "Unit Price", "Total"
    );
    println!("{}", "─".repeat(132));
    for item in items {
        println!(
            "{:<40} {:<14} {:<24} {:>8} {:<8} {:>16} {:>16}",
            item.id,
            item.category,
            truncate(&item.name, 24),
            format_quantity(item.quantity),
            truncate(&item.unit, 8),
            format_amount(item.unit_price),
            format_amount(item.total_price),
        );
    }
    println!("{}", "─".repeat(132));
    println!("{:>132}", format!("Total {}", format_amount(manager.total())));
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let mut manager = open_editor(db, args.first(), config)?;
    if let Some(id) = manager.add_item(db)? {
        println!("{id}");
    }
    Ok(())
}

fn cli_set(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!("Usage: budgetline set <project> <item> <field> <value>");
    }
    let mut manager = open_editor(db, args.first(), config)?;
    manager.authorize("update")?;
    let id = require_item(&manager, args.get(1))?;
    let field = ItemField::parse(&args[2])
        .ok_or_else(|| anyhow::anyhow!("Unknown field: {}", args[2]))?;
    let value = field.parse_input(&args[3..].join(" "))?;

    manager.update_field(db, &id, value)?;

    if let Some(item) = manager.items().iter().find(|i| i.id == id) {
        println!(
            "{}: {} = {} (total {})",
            item.id,
            field.label(),
            field.current_text(item),
            format_amount(item.total_price)
        );
    }
    Ok(())
}

fn cli_remove(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let mut manager = open_editor(db, args.first(), config)?;
    manager.authorize("remove")?;
    let id = require_item(&manager, args.get(1))?;
    manager.remove_item(db, &id)?;
    println!("Removed {id}");
    Ok(())
}

fn cli_total(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let manager = open_editor(db, args.first(), config)?;
    let Some(project) = manager.selected_project() else {
        return Ok(());
    };
    let totals = manager.category_totals();

    println!("{}", project.name);
    println!("{}", "─".repeat(40));
    for &category in BudgetCategory::all() {
        println!(
            "  {:<16} {:>20}",
            category.as_str(),
            format_amount(totals.get(category))
        );
    }
    println!("{}", "─".repeat(40));
    println!("  {:<16} {:>20}", "Total", format_amount(manager.total()));
    if !project.approved_amount.is_zero() {
        println!(
            "  {:<16} {:>20}",
            "Approved",
            format_amount(project.approved_amount)
        );
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let manager = open_editor(db, args.first(), config)?;
    let Some(project) = manager.selected_project() else {
        return Ok(());
    };
    let path = args
        .get(1)
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| PathBuf::from(default_export_name(project)));

    let format = transfer::export_project(project, &path)?;
    println!(
        "Exported {} items ({format:?}) to {}",
        project.budget_items.len(),
        path.display()
    );
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: budgetline import <project> <file.csv>");
    }
    let mut manager = open_editor(db, args.first(), config)?;
    manager.authorize("import")?;

    let file_path = shellexpand(&args[1]);
    let path = Path::new(&file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let items = BudgetCsv::read(path)?;
    println!("Parsed {} items", items.len());
    let count = manager.import_items(db, items)?;
    println!(
        "Imported {count} items (total now {})",
        format_amount(manager.total())
    );
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
