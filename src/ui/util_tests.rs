#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Venue", 10), "Venue");
    assert_eq!(truncate("Venue", 5), "Venue");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Project coordinator", 8), "Project…");
}

#[test]
fn test_truncate_edges() {
    assert_eq!(truncate("", 5), "");
    assert_eq!(truncate("hello", 0), "");
    assert_eq!(truncate("hello", 1), "…");
    assert_eq!(truncate("a", 1), "a");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("인건비 지원사업", 4), "인건비…");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "$1,234.56");
    assert_eq!(format_amount(dec!(999.99)), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "$0.00");
    assert_eq!(format_amount(dec!(-0.00)), "$0.00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(380000)), "$380,000.00");
    assert_eq!(format_amount(dec!(10000000.00)), "$10,000,000.00");
}

#[test]
fn test_format_amount_pads_and_rounds() {
    assert_eq!(format_amount(dec!(1.5)), "$1.50");
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-99999.01)), "-$99,999.01");
}

// ── format_quantity ───────────────────────────────────────────

#[test]
fn test_format_quantity() {
    assert_eq!(format_quantity(dec!(1)), "1");
    assert_eq!(format_quantity(dec!(12.50)), "12.5");
    assert_eq!(format_quantity(dec!(1200.50)), "1,200.5");
    assert_eq!(format_quantity(dec!(0.25)), "0.25");
    assert_eq!(format_quantity(dec!(1000000)), "1,000,000");
}

// ── percent_of ────────────────────────────────────────────────

#[test]
fn test_percent_of() {
    assert_eq!(percent_of(dec!(25), dec!(100)), 25);
    assert_eq!(percent_of(dec!(1), dec!(3)), 33);
    assert_eq!(percent_of(dec!(2), dec!(3)), 67);
    assert_eq!(percent_of(dec!(300), dec!(100)), 300);
}

#[test]
fn test_percent_of_degenerate() {
    assert_eq!(percent_of(dec!(5), Decimal::ZERO), 0);
    assert_eq!(percent_of(Decimal::ZERO, dec!(5)), 0);
    assert_eq!(percent_of(Decimal::MAX, dec!(1)), 999);
}

// ── shellexpand ───────────────────────────────────────────────

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/budget.csv"), "/tmp/budget.csv");
    assert_eq!(shellexpand("budget.csv"), "budget.csv");
}

#[test]
fn test_shellexpand_home() {
    let expanded = shellexpand("~/budget.csv");
    assert!(!expanded.starts_with('~'));
    assert!(expanded.ends_with("/budget.csv"));
}

// ── ListCursor ────────────────────────────────────────────────

#[test]
fn test_cursor_down_scrolls_page() {
    let mut c = ListCursor::default();
    for _ in 0..4 {
        c.down(10, 3);
    }
    assert_eq!(c, ListCursor { index: 4, scroll: 2 });
}

#[test]
fn test_cursor_down_stops_at_end() {
    let mut c = ListCursor::default();
    for _ in 0..5 {
        c.down(2, 10);
    }
    assert_eq!(c.index, 1);
    assert_eq!(c.scroll, 0);
}

#[test]
fn test_cursor_up_scrolls_back() {
    let mut c = ListCursor { index: 4, scroll: 4 };
    c.up();
    assert_eq!(c, ListCursor { index: 3, scroll: 3 });
    let mut top = ListCursor::default();
    top.up();
    assert_eq!(top, ListCursor::default());
}

#[test]
fn test_cursor_top_and_bottom() {
    let mut c = ListCursor::default();
    c.bottom(20, 5);
    assert_eq!(c, ListCursor { index: 19, scroll: 15 });
    c.top();
    assert_eq!(c, ListCursor::default());

    c.bottom(0, 5);
    assert_eq!(c, ListCursor::default());
}

#[test]
fn test_cursor_clamp_after_shrink() {
    let mut c = ListCursor { index: 9, scroll: 7 };
    c.clamp(4, 3);
    assert_eq!(c, ListCursor { index: 3, scroll: 3 });
    c.clamp(0, 3);
    assert_eq!(c, ListCursor::default());
}
