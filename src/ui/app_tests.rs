#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::editor::ProjectList;
use crate::models::{BudgetCategory, Role};

fn make_item(id: &str, name: &str) -> BudgetItem {
    let mut item = BudgetItem::new(ItemId::from(id));
    item.name = name.into();
    item.quantity = dec!(2);
    item.unit_price = dec!(1000);
    item.total_price = dec!(2000);
    item
}

fn make_projects() -> Vec<Project> {
    let mut first = Project::new("Costume revival".into(), dec!(850000));
    first.budget_items = vec![make_item("bi-1", "Staff"), make_item("bi-2", "Venue")];
    let second = Project::new("Street festival".into(), dec!(0));
    vec![first, second]
}

fn make_app(role: Role, policy: SyncPolicy) -> (App, ProjectList) {
    let projects = make_projects();
    let sink = ProjectList::new(projects.clone());
    (App::new(BudgetManager::new(projects, role, policy)), sink)
}

// ── Cursor ────────────────────────────────────────────────────

#[test]
fn test_cursor_moves_within_items_and_fields() {
    let (mut app, _) = make_app(Role::Operator, SyncPolicy::Live);
    app.move_down();
    app.move_down();
    assert_eq!(app.cursor.index, 1);
    app.move_up();
    assert_eq!(app.selected_item().unwrap().id.as_str(), "bi-1");

    app.move_left();
    assert_eq!(app.selected_field(), ItemField::Category);
    for _ in 0..10 {
        app.move_right();
    }
    assert_eq!(app.selected_field(), ItemField::Description);
}

// ── Editing ───────────────────────────────────────────────────

#[test]
fn test_edit_quantity_recomputes_total() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.field_index = 2;
    app.begin_edit(&mut sink);
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "2");

    app.command_input = "5".into();
    app.finish_edit(&mut sink);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.items()[0].total_price, dec!(5000));
    assert_eq!(app.manager.total(), dec!(7000));
    assert_eq!(sink.projects()[0].budget_items[0].quantity, dec!(5));
}

#[test]
fn test_invalid_edit_reports_and_keeps_item() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.field_index = 4;
    app.begin_edit(&mut sink);
    app.command_input = "-3".into();
    app.finish_edit(&mut sink);

    assert!(app.status_message.starts_with("Error: invalid unit_price"));
    assert_eq!(app.items()[0].unit_price, dec!(1000));
}

#[test]
fn test_enter_on_category_cycles() {
    let (mut app, mut sink) = make_app(Role::Admin, SyncPolicy::Live);
    app.begin_edit(&mut sink);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.items()[0].category, BudgetCategory::Operating);
}

#[test]
fn test_brackets_cycle_category_both_ways() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.cycle_category(&mut sink, false);
    assert_eq!(app.items()[0].category, BudgetCategory::Miscellaneous);
    app.cycle_category(&mut sink, true);
    assert_eq!(app.items()[0].category, BudgetCategory::Personnel);
    assert_eq!(app.status_message, "Category = Personnel");

    app.field_index = 1;
    app.cycle_category(&mut sink, true);
    assert_eq!(app.items()[0].category, BudgetCategory::Personnel);
}

#[test]
fn test_cancel_edit_changes_nothing() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.field_index = 1;
    app.begin_edit(&mut sink);
    app.command_input = "Renamed".into();
    app.cancel_edit();
    assert_eq!(app.items()[0].name, "Staff");
    assert!(app.command_input.is_empty());
}

#[test]
fn test_coach_cannot_edit() {
    let (mut app, mut sink) = make_app(Role::Coach, SyncPolicy::Live);
    app.field_index = 1;
    app.begin_edit(&mut sink);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Coach role is read-only");

    app.field_index = 0;
    app.begin_edit(&mut sink);
    assert!(app.status_message.contains("may not update"));
    assert_eq!(app.items()[0].category, BudgetCategory::Personnel);

    app.request_remove();
    assert!(app.pending_action.is_none());
}

#[test]
fn test_coach_refused_before_value_is_parsed() {
    let (mut app, mut sink) = make_app(Role::Coach, SyncPolicy::Live);
    let id = ItemId::from("bi-1");
    app.apply_value(&mut sink, &id, ItemField::Quantity, "lots");
    assert!(app.status_message.contains("may not update"));
    assert_eq!(app.items()[0].quantity, dec!(2));
}

#[test]
fn test_add_item_moves_cursor_to_it() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.add_item(&mut sink);
    assert_eq!(app.items().len(), 3);
    assert_eq!(app.cursor.index, 2);
    assert_eq!(app.selected_field(), ItemField::Name);
}

// ── Confirmation ──────────────────────────────────────────────

#[test]
fn test_remove_needs_confirmation() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.move_down();
    app.request_remove();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Remove 'Venue'?");

    app.reject_pending();
    assert_eq!(app.items().len(), 2);

    app.request_remove();
    app.accept_pending(&mut sink);
    assert_eq!(app.items().len(), 1);
    assert_eq!(app.cursor.index, 0);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_switch_project_asks_when_dirty() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Draft);
    app.add_item(&mut sink);
    assert!(app.manager.is_dirty());

    app.request_switch(1);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::SwitchProject { .. })
    ));
    app.accept_pending(&mut sink);

    assert_eq!(app.project().unwrap().name, "Street festival");
    assert!(!app.manager.is_dirty());
    assert_eq!(sink.projects()[0].budget_items.len(), 2);
}

#[test]
fn test_switch_project_when_clean() {
    let (mut app, _) = make_app(Role::Coach, SyncPolicy::Draft);
    app.request_switch(-1);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.project().unwrap().name, "Street festival");
    assert_eq!(app.status_message, "Project: Street festival");
}

#[test]
fn test_quit_asks_when_dirty() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Draft);
    app.request_quit();
    assert!(!app.running);

    let (mut app, _) = make_app(Role::Operator, SyncPolicy::Draft);
    app.add_item(&mut sink);
    app.request_quit();
    assert!(app.running);
    assert_eq!(app.pending_action, Some(PendingAction::Quit));
    app.accept_pending(&mut sink);
    assert!(!app.running);
}

// ── Draft workflow ────────────────────────────────────────────

#[test]
fn test_draft_commit_and_discard() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Draft);
    app.add_item(&mut sink);
    app.discard();
    assert_eq!(app.items().len(), 2);
    assert_eq!(app.status_message, "Changes discarded");

    app.add_item(&mut sink);
    assert_eq!(sink.projects()[0].budget_items.len(), 2);
    app.commit(&mut sink);
    assert_eq!(app.status_message, "Saved");
    assert_eq!(sink.projects()[0].budget_items.len(), 3);

    app.commit(&mut sink);
    assert_eq!(app.status_message, "Saved (no changes)");
}

// ── Transfer ──────────────────────────────────────────────────

#[test]
fn test_export_then_import_into_other_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.csv");
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);

    app.export(&path);
    assert!(app.status_message.starts_with("Exported to"));

    app.request_switch(1);
    app.import_csv(&mut sink, &path);
    assert!(app.status_message.starts_with("Imported 2 items"));
    assert_eq!(app.manager.total(), dec!(4000));
    assert_eq!(sink.projects()[1].budget_items.len(), 2);
}

#[test]
fn test_import_missing_file_reports() {
    let (mut app, mut sink) = make_app(Role::Operator, SyncPolicy::Live);
    app.import_csv(&mut sink, Path::new("/nonexistent/plan.csv"));
    assert!(app.status_message.starts_with("Import failed"));
    assert_eq!(app.items().len(), 2);
}

// ── Store ─────────────────────────────────────────────────────

#[test]
fn test_refresh_clamps_cursor() {
    let mut db = Database::open_in_memory().unwrap();
    let mut projects = make_projects();
    let (mut app, _) = make_app(Role::Operator, SyncPolicy::Live);
    app.move_down();

    projects[0].budget_items.truncate(1);
    db.save_project(&projects[0]).unwrap();
    app.refresh(&db).unwrap();

    assert_eq!(app.items().len(), 1);
    assert_eq!(app.cursor.index, 0);
}
