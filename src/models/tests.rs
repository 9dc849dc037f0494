#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── BudgetCategory ────────────────────────────────────────────

#[test]
fn test_category_parse() {
    assert_eq!(BudgetCategory::parse("personnel"), Some(BudgetCategory::Personnel));
    assert_eq!(BudgetCategory::parse("PERSONNEL"), Some(BudgetCategory::Personnel));
    assert_eq!(BudgetCategory::parse("staff"), Some(BudgetCategory::Personnel));
    assert_eq!(BudgetCategory::parse(" Operating "), Some(BudgetCategory::Operating));
    assert_eq!(BudgetCategory::parse("ops"), Some(BudgetCategory::Operating));
    assert_eq!(BudgetCategory::parse("misc"), Some(BudgetCategory::Miscellaneous));
    assert_eq!(BudgetCategory::parse("travel"), None);
    assert_eq!(BudgetCategory::parse(""), None);
}

#[test]
fn test_category_display() {
    assert_eq!(format!("{}", BudgetCategory::Personnel), "Personnel");
    assert_eq!(format!("{}", BudgetCategory::Miscellaneous), "Miscellaneous");
}

#[test]
fn test_category_roundtrip() {
    for c in BudgetCategory::all() {
        assert_eq!(BudgetCategory::parse(c.as_str()), Some(*c));
        assert_eq!(BudgetCategory::parse(c.key()), Some(*c));
    }
}

#[test]
fn test_category_cycle() {
    for c in BudgetCategory::all() {
        assert_eq!(c.next().prev(), *c);
    }
    assert_eq!(BudgetCategory::Miscellaneous.next(), BudgetCategory::Personnel);
    assert_eq!(BudgetCategory::Personnel.prev(), BudgetCategory::Miscellaneous);
}

// ── BudgetItem ────────────────────────────────────────────────

#[test]
fn test_item_new_defaults() {
    let item = BudgetItem::new(ItemId::from("bi-1"));
    assert_eq!(item.id.as_str(), "bi-1");
    assert_eq!(item.category, BudgetCategory::Personnel);
    assert_eq!(item.quantity, Decimal::ONE);
    assert_eq!(item.unit_price, Decimal::ZERO);
    assert_eq!(item.total_price, Decimal::ZERO);
    assert!(item.name.is_empty());
    assert!(item.unit.is_empty());
    assert!(item.description.is_empty());
}

#[test]
fn test_item_computed_total() {
    let mut item = BudgetItem::new(ItemId::from("bi-1"));
    item.quantity = dec!(12);
    item.unit_price = dec!(2500.25);
    assert_eq!(item.computed_total(), Some(dec!(30003)));

    item.unit_price = Decimal::MAX;
    assert_eq!(item.computed_total(), None);
}

#[test]
fn test_item_computed_total_is_exact_or_none() {
    let mut item = BudgetItem::new(ItemId::from("bi-1"));
    item.quantity = dec!(0.0000000000000001);
    item.unit_price = dec!(0.0000000000000001);
    assert_eq!(item.computed_total(), None);

    item.quantity = dec!(0.00000000000002);
    item.unit_price = dec!(0.000000000000005);
    assert_eq!(item.computed_total(), Some(dec!(0.0000000000000000000000000001)));

    item.quantity = dec!(12345678901234.5678);
    item.unit_price = dec!(98765432109876.54321);
    assert_eq!(item.computed_total(), None);

    item.quantity = dec!(1.0000000000000000000000000000);
    item.unit_price = dec!(2.5000000000000000000000000000);
    assert_eq!(item.computed_total(), Some(dec!(2.5)));
}

#[test]
fn test_generated_ids_are_unique() {
    let ids: std::collections::HashSet<ItemId> = (0..500).map(|_| ItemId::generate()).collect();
    assert_eq!(ids.len(), 500);
    assert!(ids.iter().all(|id| id.as_str().starts_with("bi-")));
}

// ── Project ───────────────────────────────────────────────────

#[test]
fn test_project_new() {
    let project = Project::new("Costume revival".into(), dec!(850000));
    assert!(project.id.starts_with("p-"));
    assert_eq!(project.name, "Costume revival");
    assert_eq!(project.approved_amount, dec!(850000));
    assert!(project.budget_items.is_empty());
    assert!(!project.created_at.is_empty());
}

#[test]
fn test_project_find_by_id_or_name() {
    let projects = vec![
        Project::new("Alpha".into(), Decimal::ZERO),
        Project::new("Beta".into(), Decimal::ZERO),
    ];
    let beta_id = projects[1].id.clone();
    assert_eq!(Project::find(&projects, &beta_id).unwrap().name, "Beta");
    assert_eq!(Project::find(&projects, "alpha").unwrap().name, "Alpha");
    assert!(Project::find(&projects, "gamma").is_none());
}

#[test]
fn test_project_json_keeps_exact_decimals() {
    let mut project = Project::new("Alpha".into(), dec!(1000.10));
    let mut item = BudgetItem::new(ItemId::from("bi-1"));
    item.unit_price = dec!(0.10);
    item.total_price = dec!(0.10);
    project.budget_items.push(item);

    let json = serde_json::to_string(&project).unwrap();
    assert!(json.contains("\"unit_price\":\"0.10\""));
    assert!(json.contains("\"category\":\"personnel\""));
    let back: Project = serde_json::from_str(&json).unwrap();
    assert_eq!(back, project);
}

// ── Role ──────────────────────────────────────────────────────

#[test]
fn test_role_parse() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("Operator"), Some(Role::Operator));
    assert_eq!(Role::parse("coach"), Some(Role::Coach));
    assert_eq!(Role::parse("root"), None);
}

#[test]
fn test_role_edit_permission() {
    assert!(Role::Admin.can_edit_budget());
    assert!(Role::Operator.can_edit_budget());
    assert!(!Role::Coach.can_edit_budget());
}

#[test]
fn test_role_roundtrip() {
    for r in Role::all() {
        assert_eq!(Role::parse(r.as_str()), Some(*r));
    }
}
