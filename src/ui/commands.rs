use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, Screen};
use super::util::shellexpand;
use crate::db::Database;
use crate::models::Project;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit budgetline", cmd_quit, r);
    register_command!("quit", "Quit budgetline", cmd_quit, r);
    register_command!("q!", "Quit without saving", cmd_force_quit, r);
    register_command!("w", "Save the budget", cmd_save, r);
    register_command!("save", "Save the budget", cmd_save, r);
    register_command!("wq", "Save and quit", cmd_save_quit, r);
    register_command!("discard", "Drop unsaved changes", cmd_discard, r);
    register_command!("a", "Add a budget item", cmd_add, r);
    register_command!("add", "Add a budget item", cmd_add, r);
    register_command!("delete", "Remove the selected item", cmd_delete, r);
    register_command!(
        "set",
        "Set a field on the selected item (e.g. :set qty 12)",
        cmd_set,
        r
    );
    register_command!(
        "project",
        "Switch project by name or ID (e.g. :project Costume revival)",
        cmd_project,
        r
    );
    register_command!(
        "p",
        "Switch project by name or ID",
        cmd_project,
        r
    );
    register_command!("items", "Go to Items", cmd_items, r);
    register_command!("summary", "Go to Summary", cmd_summary, r);
    register_command!(
        "export",
        "Export budget to CSV or JSON (e.g. :export ~/plan.csv)",
        cmd_export,
        r
    );
    register_command!(
        "import",
        "Append items from a CSV file (e.g. :import ~/plan.csv)",
        cmd_import,
        r
    );
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.request_quit();
    Ok(())
}

fn cmd_force_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_save(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.commit(db);
    Ok(())
}

fn cmd_save_quit(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.commit(db);
    if !app.manager.is_dirty() {
        app.running = false;
    }
    Ok(())
}

fn cmd_discard(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.discard();
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Items;
    app.add_item(db);
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Items;
    app.request_remove();
    Ok(())
}

fn cmd_set(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let field_name = parts.next().unwrap_or("");
    let value = parts.next().unwrap_or("");

    let Some(field) = crate::editor::ItemField::parse(field_name) else {
        let names: Vec<&str> = crate::editor::ItemField::all()
            .iter()
            .map(|f| f.key())
            .collect();
        app.set_status(format!("Usage: :set <field> <value>. Fields: {}", names.join(", ")));
        return Ok(());
    };
    let Some(id) = app.selected_item().map(|i| i.id.clone()) else {
        app.set_status("No item selected");
        return Ok(());
    };
    app.apply_value(db, &id, field, value);
    Ok(())
}

fn cmd_project(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let names: Vec<&str> = app
            .manager
            .projects()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        app.set_status(format!("Projects: {}", names.join(", ")));
        return Ok(());
    }

    match Project::find(app.manager.projects(), args).map(|p| p.id.clone()) {
        Some(id) => app.request_select(id),
        None => app.set_status(format!("Project '{args}' not found")),
    }
    Ok(())
}

fn cmd_items(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Items;
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Summary;
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let Some(project) = app.project() else {
            app.set_status("No project selected");
            return Ok(());
        };
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(format!("{home}/{}", default_export_name(project)))
    } else {
        PathBuf::from(shellexpand(args))
    };
    app.export(&path);
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = PathBuf::from(shellexpand(args));
    app.screen = Screen::Items;
    app.import_csv(db, &path);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// `budget-<project name>.csv`, lowercased with non-alphanumerics folded to `-`.
pub(crate) fn default_export_name(project: &Project) -> String {
    let slug: String = project
        .name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "budget.csv".into()
    } else {
        format!("budget-{slug}.csv")
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
