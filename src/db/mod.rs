mod schema;

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::editor::UpdateSink;
use crate::models::*;

/// Where projects live between runs. The editor never sees this; its hosts do.
pub(crate) trait ProjectStore {
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn load_project(&self, id: &str) -> Result<Option<Project>>;
    /// Upsert the project and replace its whole item list.
    fn save_project(&mut self, project: &Project) -> Result<()>;
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(from = current, to = schema::CURRENT_VERSION, "migrated database");
        }

        Ok(())
    }

    fn get_items(&self, project_id: &str) -> Result<Vec<BudgetItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, name, quantity, unit, unit_price, total_price, description
             FROM budget_items WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok(BudgetItem {
                id: ItemId::from(row.get::<_, String>(0)?),
                category: category_column(row, 1)?,
                name: row.get(2)?,
                quantity: decimal_column(row, 3)?,
                unit: row.get(4)?,
                unit_price: decimal_column(row, 5)?,
                total_price: decimal_column(row, 6)?,
                description: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl ProjectStore for Database {
    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, approved_amount, created_at FROM projects ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], project_from_row)?;
        let mut projects = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        for project in &mut projects {
            project.budget_items = self.get_items(&project.id)?;
        }
        Ok(projects)
    }

    fn load_project(&self, id: &str) -> Result<Option<Project>> {
        let result = self.conn.query_row(
            "SELECT id, name, approved_amount, created_at FROM projects WHERE id = ?1",
            params![id],
            project_from_row,
        );
        match result {
            Ok(mut p) => {
                p.budget_items = self.get_items(&p.id)?;
                Ok(Some(p))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_project(&mut self, project: &Project) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO projects (id, name, approved_amount, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = ?2, approved_amount = ?3",
            params![
                project.id,
                project.name,
                project.approved_amount.to_string(),
                project.created_at,
            ],
        )?;
        tx.execute(
            "DELETE FROM budget_items WHERE project_id = ?1",
            params![project.id],
        )?;
        for (position, item) in project.budget_items.iter().enumerate() {
            tx.execute(
                "INSERT INTO budget_items (id, project_id, position, category, name, quantity, unit, unit_price, total_price, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    item.id.as_str(),
                    project.id,
                    position as i64,
                    item.category.key(),
                    item.name,
                    item.quantity.to_string(),
                    item.unit,
                    item.unit_price.to_string(),
                    item.total_price.to_string(),
                    item.description,
                ],
            )?;
        }
        tx.commit()
            .with_context(|| format!("Failed to save project {}", project.id))?;
        debug!(project = %project.id, items = project.budget_items.len(), "project saved");
        Ok(())
    }
}

impl UpdateSink for Database {
    fn update_project(&mut self, project: Project) -> Result<()> {
        self.save_project(&project)
    }
}

fn project_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        approved_amount: decimal_column(row, 2)?,
        budget_items: Vec::new(),
        created_at: row.get(3)?,
    })
}

/// Decimals are stored as TEXT; anything unparseable is a conversion error
/// rather than a silent zero that the next save would write back.
fn decimal_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

fn category_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<BudgetCategory> {
    let key: String = row.get(idx)?;
    BudgetCategory::parse(&key).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            anyhow::anyhow!("unknown budget category '{key}'").into(),
        )
    })
}
