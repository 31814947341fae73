use crate::app::{App, ModalState, PaneFocus};
use crate::domain::{FileCategory, HexColor};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(outer[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(body[0]);

    draw_selector(frame, app, main[0]);
    draw_tree(frame, app, main[1]);
    draw_logs(frame, app, body[1]);
    draw_status_bar(frame, app, outer[1]);
    draw_modal(frame, app);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_selector(frame: &mut Frame, app: &mut App, area: Rect) {
    app.sync_list_scroll(area.height.saturating_sub(2) as usize);

    let items: Vec<ListItem> = app
        .selector_lines()
        .iter()
        .map(|line| {
            let (mark, mark_style) = if line.checked {
                ("[x]", Style::default().fg(Color::LightGreen))
            } else {
                ("[ ]", Style::default().fg(Color::Gray))
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}{}", line.prefix, line.glyph),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(mark, mark_style),
                Span::raw(" "),
                Span::raw(line.name.clone()),
            ]))
        })
        .collect();

    let title = format!(
        " Directories {}/{} ",
        app.session.inclusion.len(),
        app.directory_count()
    );
    let list = List::new(items)
        .block(pane_block(&title, app.focus == PaneFocus::Selector))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_offset(app.list_scroll());
    if app.current_len() > 0 {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_tree(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        app.root_label.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for line in &app.tree().lines {
        let name_style = match line.color {
            Some(color) => Style::default().fg(to_color(color)),
            None => Style::default().add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{}", line.prefix, line.glyph),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(line.name.clone(), name_style),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            pane_block(" Tree ", app.focus == PaneFocus::Tree)
                .style(Style::default().bg(Color::Rgb(0x24, 0x29, 0x2E))),
        )
        .scroll((app.tree_scroll.min(u16::MAX as usize) as u16, 0));

    frame.render_widget(paragraph, area);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let rows = area.height.saturating_sub(2) as usize;
    let (start, end) = log_window(app.logs.len(), app.log_tail_offset, rows);

    let lines: Vec<Line> = app.logs[start..end]
        .iter()
        .map(|line| {
            if line.starts_with("error[") {
                Line::from(Span::styled(line.as_str(), Style::default().fg(Color::Red)))
            } else {
                Line::from(line.as_str())
            }
        })
        .collect();

    let title = if app.log_tail_offset > 0 {
        format!(" Log (+{} newer) ", app.log_tail_offset)
    } else {
        " Log ".to_string()
    };
    let paragraph = Paragraph::new(lines)
        .block(pane_block(&title, app.focus == PaneFocus::Log))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Range of log lines visible when the view sits `tail_offset` lines above
/// the newest entry.
fn log_window(len: usize, tail_offset: usize, rows: usize) -> (usize, usize) {
    let end = len.saturating_sub(tail_offset);
    (end.saturating_sub(rows), end)
}

const STATUS_HINTS: &str =
    "tab focus | space toggle | a/u all/none | x exclude | p colors | y copy | e export | ? help";

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let busy = if app.busy { "BUSY" } else { "IDLE" };
    let text = Line::from(vec![
        Span::styled(
            format!(" {} ", busy),
            if app.busy {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            },
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "dirs {}/{}  excluded {}",
                app.session.inclusion.len(),
                app.directory_count(),
                app.session.exclusion.len()
            ),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(STATUS_HINTS, Style::default().fg(Color::Gray)),
    ]);

    let paragraph = Paragraph::new(text).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn draw_modal(frame: &mut Frame, app: &App) {
    match &app.modal {
        ModalState::None => {}
        ModalState::Help => {
            let area = centered_rect(60, 70, frame.area());
            frame.render_widget(Clear, area);

            let lines: Vec<Line> = HELP_LINES
                .iter()
                .map(|(keys, what)| {
                    Line::from(vec![
                        Span::styled(format!("{keys:<12}"), Style::default().fg(Color::Cyan)),
                        Span::raw(*what),
                    ])
                })
                .collect();

            let p = Paragraph::new(lines)
                .block(
                    Block::default()
                        .title(" Keys ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(p, area);
        }
        ModalState::Input { kind, value } => {
            let area = centered_rect(70, 25, frame.area());
            frame.render_widget(Clear, area);

            let lines = vec![
                Line::from(kind.prompt()),
                Line::from(""),
                Line::from(format!("> {}", value)).style(Style::default().fg(Color::Yellow)),
                Line::from(""),
                Line::from("Enter: apply  Esc: cancel"),
            ];

            let p = Paragraph::new(lines)
                .block(
                    Block::default()
                        .title(" Input ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::LightBlue)),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(p, area);
        }
        ModalState::Exclusions { selected } => {
            let area = centered_rect(50, 60, frame.area());
            frame.render_widget(Clear, area);

            let items: Vec<ListItem> = if app.session.exclusion.is_empty() {
                vec![ListItem::new(Span::styled(
                    "(no exclusions)",
                    Style::default().fg(Color::DarkGray),
                ))]
            } else {
                app.session
                    .exclusion
                    .iter()
                    .map(|entry| ListItem::new(entry.to_string()))
                    .collect()
            };

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(" Exclusions (a add, d remove, Esc close) ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::LightYellow)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            let mut state = ListState::default();
            if !app.session.exclusion.is_empty() {
                state.select(Some(*selected));
            }
            frame.render_stateful_widget(list, area, &mut state);
        }
        ModalState::Palette { selected } => {
            let area = centered_rect(60, 60, frame.area());
            frame.render_widget(Clear, area);

            let palette = &app.session.palette;
            let items: Vec<ListItem> = FileCategory::ALL
                .iter()
                .map(|category| {
                    let color = palette.color(*category);
                    let marker = if palette.is_overridden(*category) {
                        "*"
                    } else {
                        " "
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled("██ ", Style::default().fg(to_color(color))),
                        Span::raw(format!(
                            "{:<9} {}{} {}",
                            category.label(),
                            color,
                            marker,
                            category.description()
                        )),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .title(" Colors (Enter edit, r reset, Esc close) ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("▶ ");

            let mut state = ListState::default();
            state.select(Some(*selected));
            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

const HELP_LINES: &[(&str, &str)] = &[
    ("q / Ctrl+C", "quit"),
    ("Tab", "cycle focus: directories, tree, log"),
    ("j / k", "move or scroll the focused pane"),
    ("PgUp / PgDn", "scroll the tree"),
    ("Space", "check or uncheck the directory"),
    ("a / u", "check or uncheck every directory"),
    ("x", "exclude a name or extension"),
    ("X", "list and remove exclusions"),
    ("p", "edit category colors"),
    ("r", "rescan the root directory"),
    ("y", "copy the tree to the clipboard"),
    ("e", "export the tree to a file"),
    ("?", "this help"),
];

fn to_color(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
