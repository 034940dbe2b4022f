use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, InputMode, Pane, StatusLevel};
use crate::config;
use crate::domain::render::{DocLine, LineKind, NO_DATA_MESSAGE};
use crate::domain::Chain;
use crate::modules::{Field, ResultState, ResultsPanel};

const TITLE: &str = "EVM Transaction Sampler";

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_form(f, areas.form, app);
    draw_results(f, areas.results, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            TITLE,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Backend", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.backend_url)),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let chain = app
        .chain_alias
        .clone()
        .unwrap_or_else(|| app.input.chain.display_name().to_string());
    let right_line = Line::from(vec![
        Span::styled("Chain ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{chain}  ")),
        Span::styled("Query ", Style::default().fg(Color::DarkGray)),
        Span::raw(truncate_str(&app.share_query(), 64)),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn field_style(app: &App, field: Field) -> Style {
    if app.pane == Pane::Input && app.input.focus == field && app.input_mode == InputMode::Normal {
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.pane == Pane::Input {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut chain_spans = vec![Span::styled("Chain    ", field_style(app, Field::Chain))];
    for chain in Chain::ALL {
        let span = if chain == app.input.chain {
            Span::styled(
                format!("[ {} ]", chain.display_name()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        } else if chain.is_selectable() {
            Span::raw(format!("  {}  ", chain.display_name()))
        } else {
            Span::styled(
                format!("  {} (disabled)  ", chain.display_name()),
                Style::default().fg(Color::DarkGray),
            )
        };
        chain_spans.push(span);
    }
    chain_spans.push(Span::styled(
        format!("  {}", Chain::help_text()),
        Style::default().fg(Color::DarkGray),
    ));

    let cursor = if app.pane == Pane::Input
        && app.input.focus == Field::Address
        && app.input_mode == InputMode::Normal
    {
        "▏"
    } else {
        ""
    };
    let address_line = Line::from(vec![
        Span::styled("Address  ", field_style(app, Field::Address)),
        Span::raw(app.input.address.clone()),
        Span::styled(cursor, Style::default().fg(Color::LightCyan)),
    ]);

    let submit_line = if app.submit_enabled() {
        Line::from(vec![
            Span::raw("         "),
            Span::styled("[ Submit ]", field_style(app, Field::Submit)),
        ])
    } else {
        Line::from(vec![
            Span::raw("         "),
            Span::styled("[ Submitting… ]", Style::default().fg(Color::DarkGray)),
        ])
    };

    let feedback = match app.input.validation_error.as_deref() {
        Some(message) => Line::from(Span::styled(
            format!("         {message}"),
            Style::default().fg(Color::LightRed),
        )),
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(Text::from(vec![
        Line::from(chain_spans),
        address_line,
        submit_line,
        feedback,
    ]))
    .block(
        Block::default()
            .title("Query")
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(paragraph, area);
}

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.pane == Pane::Results {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let panel = &app.results;
    let title = match panel.state() {
        ResultState::Sections(sections) => format!("Samples ({})", sections.len()),
        _ => "Samples".to_string(),
    };

    let lines = results_lines(panel, app.pane == Pane::Results);
    let inner_height = area.height.saturating_sub(2) as usize;
    let top = panel.selected_line_offset();
    let offset = top.saturating_sub(inner_height / 3);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false })
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, area);
}

/// Panel contents for the current result state
pub fn results_lines(panel: &ResultsPanel, focused: bool) -> Vec<Line<'static>> {
    match panel.state() {
        ResultState::Idle => vec![Line::from(Span::styled(
            "Enter an address and press Submit to sample its transactions.",
            Style::default().fg(Color::DarkGray),
        ))],
        ResultState::Loading => vec![Line::from(Span::styled(
            "Fetching samples…",
            Style::default().fg(Color::LightCyan),
        ))],
        ResultState::Empty => vec![Line::from(Span::styled(
            format!("ℹ {NO_DATA_MESSAGE}"),
            Style::default().fg(Color::LightBlue),
        ))],
        ResultState::Warning(message) => vec![Line::from(vec![
            Span::styled(
                "⚠ Warning: ",
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.clone(), Style::default().fg(Color::LightYellow)),
        ])],
        ResultState::Failed(message) => vec![
            Line::from(vec![
                Span::styled(
                    "✖ Failed to fetch data: ",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(message.clone(), Style::default().fg(Color::LightRed)),
            ]),
            Line::from(Span::styled(
                "Press Submit to try again.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        ResultState::Sections(sections) => {
            let mut lines = Vec::new();
            for (idx, state) in sections.iter().enumerate() {
                let marker = if state.expanded { "▾" } else { "▸" };
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if idx == panel.selected() {
                    style = if focused {
                        style.fg(Color::Black).bg(Color::LightCyan)
                    } else {
                        style.fg(Color::LightCyan)
                    };
                }
                lines.push(Line::from(Span::styled(
                    format!("{marker} {}", state.section.title),
                    style,
                )));
                if state.expanded {
                    lines.extend(state.section.body.lines.iter().map(doc_line));
                }
            }
            lines
        }
    }
}

fn doc_line(line: &DocLine) -> Line<'static> {
    let indent = Span::raw("  ".repeat(line.depth + 1));
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match &line.kind {
        LineKind::Heading(label) => Line::from(vec![
            indent,
            Span::styled(label.clone(), bold.fg(Color::LightCyan)),
        ]),
        LineKind::Field { label, value } => Line::from(vec![
            indent,
            Span::styled(format!("{label}: "), bold),
            Span::raw(value.clone()),
        ]),
        LineKind::Item(value) => Line::from(vec![indent, Span::raw(format!("• {value}"))]),
        LineKind::Separator => Line::from(vec![
            indent,
            Span::styled("───", Style::default().fg(Color::DarkGray)),
        ]),
        LineKind::Diagnostic(message) => Line::from(vec![
            indent,
            Span::styled(message.clone(), Style::default().fg(Color::LightYellow)),
        ]),
    }
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let request = if app.submit_enabled() {
        Span::raw("idle  ")
    } else {
        Span::styled("in flight  ", Style::default().fg(Color::LightYellow))
    };
    let mut spans = vec![
        Span::styled("Focus ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", app.focus_label())),
        Span::styled("Request ", Style::default().fg(Color::DarkGray)),
        request,
    ];
    if let Some(result) = app.session.last_result.as_ref() {
        spans.push(Span::styled("Records ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!(
            "{} @ {}  ",
            result.records.len(),
            result.received_at.format("%H:%M:%S")
        )));
    }
    if let Some(copied) = app.session.clipboard.as_deref() {
        spans.push(Span::styled("Copied ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(short_hash(copied)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("submit", "Validate and fetch samples"),
        ("address", "Set the address field"),
        ("chain", "Select chain (eth)"),
        ("export", "Export last result (.json/.csv)"),
        ("clear", "Clear results"),
        ("help", "Show help"),
        ("quit", "Quit"),
    ];

    for (cmd, desc) in commands {
        if cmd.starts_with(&input) {
            return Some(desc);
        }
    }
    None
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input);
            let hint_text = hint.unwrap_or("submit | address <0x..> | chain <eth> | export [path]");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.clone()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
    let mut spans = vec![key("Tab"), Span::raw(" Focus  ")];
    match app.pane {
        Pane::Input => {
            spans.extend([key("Enter"), Span::raw(" Submit  ")]);
            if app.input.focus == Field::Chain {
                spans.extend([key("←/→"), Span::raw(" Chain  ")]);
            }
            if app.input.focus == Field::Address {
                spans.extend([key("Ctrl-u"), Span::raw(" Clear  ")]);
            }
        }
        Pane::Results => {
            spans.extend([
                key("j/k"),
                Span::raw(" Move  "),
                key("Enter"),
                Span::raw(" Expand  "),
                key("e/c"),
                Span::raw(" All  "),
                key("y"),
                Span::raw(" Copy hash  "),
                key("x"),
                Span::raw(" Export  "),
            ]);
        }
    }
    if !app.is_typing() {
        spans.extend([
            key(":"),
            Span::raw(" Command  "),
            key("?"),
            Span::raw(" Help  "),
            key("q"),
            Span::raw(" Quit"),
        ]);
    }
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(72, 70, area);
    f.render_widget(Clear, popup_area);

    let heading = Style::default()
        .fg(Color::LightCyan)
        .add_modifier(Modifier::BOLD);
    let config_path = config::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(unknown)".to_string());

    let mut lines = vec![
        Line::from(Span::styled("Keys", heading)),
        Line::from("  Tab / S-Tab   Cycle focus: Chain, Address, Submit, Results"),
        Line::from("  Enter         Submit (form) / expand section (results)"),
        Line::from("  ← / →         Change chain"),
        Line::from("  Ctrl-u        Clear address"),
        Line::from("  j / k         Move between sections"),
        Line::from("  e / c         Expand / collapse all"),
        Line::from("  y             Copy selected tx hash"),
        Line::from("  x             Export last result"),
        Line::from("  :             Command line"),
        Line::from("  ?             Toggle help"),
        Line::from("  q / Ctrl-c    Quit"),
        Line::from(""),
        Line::from(Span::styled("Commands", heading)),
        Line::from("  :submit  :address <0x..>  :chain <eth>  :export [path]  :clear"),
        Line::from(""),
        Line::from(Span::styled("Session", heading)),
        Line::from(format!("  Backend: {}", app.backend_url)),
        Line::from(format!("  Config:  {}", config_path)),
        Line::from(format!(
            "  Log:     {}",
            app.log_file.as_deref().unwrap_or("(disabled)")
        )),
        Line::from(format!("  Query:   {}", app.share_query())),
        Line::from(""),
    ];

    lines.push(Line::from(Span::styled("Chain aliases", heading)));
    if app.session.chain_aliases.is_empty() {
        lines.push(Line::from("  (none configured)"));
    } else {
        for (alias, name) in app.session.chain_aliases.iter().take(8) {
            lines.push(Line::from(format!("  {alias} → {name}")));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn short_hash(value: &str) -> String {
    if value.chars().count() <= 14 {
        return value.to_string();
    }
    let start: String = value.chars().take(8).collect();
    let end: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    format!("{}..{}", start, end)
}

fn truncate_str(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    value.chars().take(max).collect::<String>() + "…"
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
