use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;
use super::util::format_amount;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(theme::TEXT_DIM)),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{s}"),
                    Style::default().fg(theme::TEXT_DIM),
                ))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Items => super::screens::items::render(f, area, app),
        Screen::Summary => super::screens::summary::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let project = app.project().map_or("no project", |p| p.name.as_str());
    let info = format!(
        " {project} | {} | {} | {} ",
        format_amount(app.manager.total()),
        app.manager.role(),
        app.manager.policy(),
    );
    let dirty = if app.manager.is_dirty() { "[+] " } else { "" };

    let right = match (app.screen, app.manager.can_edit()) {
        (Screen::Items, true) => " Enter edit | a add | D remove | s save | ? help ",
        (Screen::Items, false) => " read-only | n/p project | ? help ",
        (Screen::Summary, _) => " n/p project | Tab items | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count()
        + info.chars().count()
        + dirty.len()
        + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_label, mode_style),
        Span::styled(info, theme::status_bar_style()),
        Span::styled(dirty, theme::warning_style().bg(theme::SURFACE)),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Editing => {
            let prompt = format!("{}> ", app.selected_field().label());
            let offset = (prompt.chars().count() + app.command_input.chars().count()) as u16;
            (
                Line::from(vec![
                    Span::styled(prompt, Style::default().fg(theme::GREEN)),
                    Span::styled(&app.command_input, theme::command_bar_style()),
                ]),
                Some(offset),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = Style::default()
        .fg(theme::YELLOW)
        .add_modifier(Modifier::BOLD);
    let mut help_text = vec![
        Line::from(Span::styled(
            " budgetline Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", section)),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move between items    h/l        Move between columns",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  g/G              Top/Bottom            1-2, Tab   Switch screens",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  n/p              Next/Prev project     Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Editing", section)),
        Line::from(Span::styled(
            "  Enter            Edit cell (category cycles)   Esc   Cancel",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  ] / [            Next/Prev category on a category cell",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  a                Add item              D          Remove item",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  s                Save                  :          Command mode",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Commands", section)),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    let mut names: Vec<&&str> = commands::COMMANDS.keys().collect();
    names.sort_by_key(|name| std::cmp::Reverse(name.len()));
    for &&name in &names {
        if let Some(cmd) = commands::COMMANDS.get(name) {
            if seen.insert(cmd.description) {
                cmd_lines.push((name, cmd.description));
            }
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<10} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 80.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
