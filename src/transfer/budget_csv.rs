use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

use crate::editor::{aggregate_total, parse_amount};
use crate::models::{BudgetCategory, BudgetItem, ItemId};

pub(crate) const HEADERS: [&str; 7] = [
    "category",
    "name",
    "quantity",
    "unit",
    "unit_price",
    "total_price",
    "description",
];

const TOTAL_LABEL: &str = "TOTAL";
const BOM: &str = "\u{feff}";

pub(crate) struct BudgetCsv;

impl BudgetCsv {
    /// Write items to a file, BOM-prefixed so spreadsheet apps pick UTF-8.
    pub(crate) fn export(path: &Path, items: &[BudgetItem]) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(BOM.as_bytes())?;
        Self::write(file, items)
    }

    /// One row per item in display order, then a `TOTAL` row.
    pub(crate) fn write<W: Write>(writer: W, items: &[BudgetItem]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(HEADERS)?;
        for item in items {
            let quantity = item.quantity.to_string();
            let unit_price = item.unit_price.to_string();
            let total_price = item.total_price.to_string();
            wtr.write_record([
                item.category.key(),
                item.name.as_str(),
                quantity.as_str(),
                item.unit.as_str(),
                unit_price.as_str(),
                total_price.as_str(),
                item.description.as_str(),
            ])?;
        }
        let total = aggregate_total(items).to_string();
        wtr.write_record([TOTAL_LABEL, "", "", "", "", total.as_str(), ""])?;
        wtr.flush().context("Failed to write CSV")?;
        Ok(())
    }

    pub(crate) fn read(path: &Path) -> Result<Vec<BudgetItem>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }
        Self::parse(&rows)
    }

    /// Parse raw rows into fresh items. The header row is optional, the
    /// `TOTAL` row and blank rows are skipped, and the stored total column is
    /// ignored in favour of `quantity * unit_price`.
    pub(crate) fn parse(rows: &[Vec<String>]) -> Result<Vec<BudgetItem>> {
        let mut items = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let at = |col: usize| cell(row, col);
            let text = |col: usize| text_cell(row, col).to_string();
            let line = i + 1;

            if (0..row.len()).all(|col| at(col).is_empty()) {
                continue;
            }
            if i == 0 && at(0).eq_ignore_ascii_case(HEADERS[0]) {
                continue;
            }
            if at(0).eq_ignore_ascii_case(TOTAL_LABEL) {
                continue;
            }

            let category = BudgetCategory::parse(at(0))
                .with_context(|| format!("Row {line}: unknown category '{}'", at(0)))?;
            let quantity = parse_non_negative(at(2), Decimal::ONE)
                .with_context(|| format!("Row {line}: invalid quantity '{}'", at(2)))?;
            let unit_price = parse_non_negative(at(4), Decimal::ZERO)
                .with_context(|| format!("Row {line}: invalid unit price '{}'", at(4)))?;

            let mut item = BudgetItem::new(ItemId::generate());
            item.category = category;
            item.name = text(1);
            item.quantity = quantity;
            item.unit = text(3);
            item.unit_price = unit_price;
            item.description = text(6);
            item.total_price = item
                .computed_total()
                .with_context(|| format!("Row {line}: total price is not exactly representable"))?;
            items.push(item);
        }

        Ok(items)
    }
}

/// Category and number cells: surrounding whitespace is not significant.
fn cell(row: &[String], col: usize) -> &str {
    text_cell(row, col).trim()
}

/// Free-text cells are kept as written.
fn text_cell(row: &[String], col: usize) -> &str {
    row.get(col)
        .map(|s| s.trim_start_matches(BOM))
        .unwrap_or("")
}

fn parse_non_negative(raw: &str, empty: Decimal) -> Result<Decimal> {
    if raw.is_empty() {
        return Ok(empty);
    }
    let value = parse_amount(raw).context("not a number")?;
    if value.is_sign_negative() && !value.is_zero() {
        anyhow::bail!("must not be negative");
    }
    Ok(value)
}
