use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::models::BudgetCategory;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, percent_of};

const BAR_WIDTH: usize = 30;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY));

    let Some(project) = app.project() else {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No project selected", theme::dim_style())),
        ])
        .centered()
        .block(block.title(" Summary "));
        f.render_widget(msg, area);
        return;
    };

    let totals = app.manager.category_totals();
    let total = totals.total();
    let heading = Style::default()
        .fg(theme::YELLOW)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(" By category", heading)),
    ];

    for &category in BudgetCategory::all() {
        let amount = totals.get(category);
        let share = percent_of(amount, total);
        let color = theme::category_color(category);
        let count = app
            .items()
            .iter()
            .filter(|i| i.category == category)
            .count();
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<15}", category.as_str()), theme::normal_style()),
            Span::styled(format!("{:>18} ", format_amount(amount)), Style::default().fg(color)),
            Span::styled(progress_bar(share, BAR_WIDTH), Style::default().fg(color)),
            Span::styled(format!(" {share:>3}%"), Style::default().fg(color)),
            Span::styled(format!("  ({count} items)"), theme::dim_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<15}", "Total"), theme::normal_style()),
        Span::styled(format!("{:>18}", format_amount(total)), theme::total_style()),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Approved budget", heading)));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:<15}", "Approved"), theme::normal_style()),
        Span::styled(
            format!("{:>18}", format_amount(project.approved_amount)),
            theme::normal_style(),
        ),
    ]));
    if project.approved_amount > Decimal::ZERO {
        let used = percent_of(total, project.approved_amount);
        let remaining = project.approved_amount - total;
        let style = if remaining < Decimal::ZERO {
            theme::warning_style()
        } else {
            theme::dim_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<15}", "Remaining"), theme::normal_style()),
            Span::styled(format!("{:>18} ", format_amount(remaining)), style),
            Span::styled(format!("({used}% planned)"), theme::dim_style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "  Role: {}   Sync: {}{}",
            app.manager.role(),
            app.manager.policy(),
            if app.manager.is_dirty() {
                "   (unsaved changes)"
            } else {
                ""
            }
        ),
        theme::dim_style(),
    )));

    let summary = Paragraph::new(lines).block(block.title(Span::styled(
        format!(" Summary | {} ", project.name),
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(summary, area);
}

fn progress_bar(percent: u16, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
