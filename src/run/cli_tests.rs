#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{BudgetItem, Role};

fn args(list: &[&str]) -> Vec<String> {
    std::iter::once("budgetline")
        .chain(list.iter().copied())
        .map(String::from)
        .collect()
}

fn seeded_db() -> (Database, String) {
    let mut db = Database::open_in_memory().unwrap();
    let mut project = Project::new("Costume revival".into(), dec!(850000));
    let mut item = BudgetItem::new(ItemId::from("bi-1"));
    item.quantity = dec!(2);
    item.unit_price = dec!(1000);
    item.total_price = dec!(2000);
    project.budget_items.push(item);
    db.save_project(&project).unwrap();
    (db, project.id)
}

fn config_for(role: Role) -> Config {
    Config {
        role,
        ..Config::default()
    }
}

// ── Editing ───────────────────────────────────────────────────

#[test]
fn test_set_by_project_name_saves() {
    let (mut db, id) = seeded_db();
    let config = config_for(Role::Operator);
    as_cli(
        &args(&["set", "costume revival", "bi-1", "qty", "5"]),
        &mut db,
        &config,
    )
    .unwrap();

    let saved = db.load_project(&id).unwrap().unwrap();
    assert_eq!(saved.budget_items[0].quantity, dec!(5));
    assert_eq!(saved.budget_items[0].total_price, dec!(5000));
}

#[test]
fn test_unknown_project_is_an_error() {
    let (mut db, _) = seeded_db();
    let err = as_cli(&args(&["items", "nope"]), &mut db, &config_for(Role::Admin)).unwrap_err();
    assert_eq!(err.to_string(), "Project 'nope' not found");
}

// ── Roles ─────────────────────────────────────────────────────

#[test]
fn test_coach_refused_before_item_and_value_checks() {
    let (mut db, id) = seeded_db();
    let config = config_for(Role::Coach);

    let err = as_cli(
        &args(&["set", id.as_str(), "bi-404", "qty", "5"]),
        &mut db,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Coach role may not update budget items");

    let err = as_cli(
        &args(&["set", id.as_str(), "bi-1", "qty", "lots"]),
        &mut db,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Coach role may not update budget items");

    let err = as_cli(
        &args(&["remove", id.as_str(), "bi-404"]),
        &mut db,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Coach role may not remove budget items");

    let err = as_cli(
        &args(&["import", id.as_str(), "/no/such.csv"]),
        &mut db,
        &config,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Coach role may not import budget items");

    let saved = db.load_project(&id).unwrap().unwrap();
    assert_eq!(saved.budget_items[0].quantity, dec!(2));
}

#[test]
fn test_coach_can_still_read() {
    let (mut db, id) = seeded_db();
    let config = config_for(Role::Coach);
    as_cli(&args(&["items", id.as_str()]), &mut db, &config).unwrap();
    as_cli(&args(&["total", id.as_str()]), &mut db, &config).unwrap();
}
