use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::editor::ItemField;
use crate::models::BudgetItem;
use crate::ui::app::{App, InputMode};
use crate::ui::theme;
use crate::ui::util::{format_amount, format_quantity, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(project) = app.project() else {
        render_message(
            f,
            area,
            " Budget ",
            "No project selected",
            "Use :project <name> or n/p to pick one",
        );
        return;
    };

    let title = format!(
        " {} ({} items) | Total {} ",
        project.name,
        project.budget_items.len(),
        format_amount(app.manager.total())
    );

    if project.budget_items.is_empty() {
        let hint = if app.manager.can_edit() {
            "Press a to add an item, or :import <file.csv>"
        } else {
            "Nothing has been planned yet"
        };
        render_message(f, area, &title, "No budget items", hint);
        return;
    }

    let header_cells = ItemField::all()
        .iter()
        .map(|field| field.label())
        .chain(std::iter::once("Total"))
        .map(|h| Cell::from(h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let editing = app.input_mode == InputMode::Editing;
    let rows: Vec<Row> = project
        .budget_items
        .iter()
        .enumerate()
        .skip(app.cursor.scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, item)| {
            let is_cursor = i == app.cursor.index;
            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let mut cells: Vec<Cell> = ItemField::all()
                .iter()
                .enumerate()
                .map(|(col, field)| {
                    let text = if is_cursor && editing && col == app.field_index {
                        format!("{}▏", app.command_input)
                    } else {
                        cell_text(item, *field)
                    };
                    let cell = Cell::from(text);
                    if is_cursor && col == app.field_index {
                        cell.style(theme::cell_cursor_style())
                    } else if *field == ItemField::Category && !is_cursor {
                        cell.style(Style::default().fg(theme::category_color(item.category)))
                    } else {
                        cell
                    }
                })
                .collect();
            cells.push(Cell::from(format_amount(item.total_price)).style(if is_cursor {
                style
            } else {
                theme::total_style()
            }));

            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(16),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn cell_text(item: &BudgetItem, field: ItemField) -> String {
    match field {
        ItemField::Category => item.category.to_string(),
        ItemField::Name => truncate(&item.name, 32),
        ItemField::Quantity => format_quantity(item.quantity),
        ItemField::Unit => truncate(&item.unit, 10),
        ItemField::UnitPrice => format_amount(item.unit_price),
        ItemField::Description => truncate(&item.description, 40),
    }
}

fn render_message(f: &mut Frame, area: Rect, title: &str, headline: &str, hint: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(headline.to_string(), theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(hint.to_string(), theme::dim_style())),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(msg, area);
}
