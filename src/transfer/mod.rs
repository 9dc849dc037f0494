mod budget_csv;

pub(crate) use budget_csv::BudgetCsv;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// JSON for a `.json` extension, CSV for anything else.
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Write a project's budget to `path`, choosing the format from its extension.
pub(crate) fn export_project(project: &Project, path: &Path) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    match format {
        ExportFormat::Csv => BudgetCsv::export(path, &project.budget_items)?,
        ExportFormat::Json => {
            let json = serde_json::to_string_pretty(project)
                .context("Failed to serialize project")?;
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }
    info!(project = %project.id, path = %path.display(), ?format, "budget exported");
    Ok(format)
}
