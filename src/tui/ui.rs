use crate::catalog::AppRecord;
use crate::search;
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Rows taken by one app card, borders included
pub const CARD_HEIGHT: u16 = 5;

const SEARCH_PREFIX: &str = " > ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Results counter
            Constraint::Min(3),    // Cards
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title(frame, chunks[0]);
    draw_search_bar(frame, app, chunks[1]);
    draw_counter(frame, app, chunks[2]);
    draw_body(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    if app.search.focused {
        // border (1) + prefix
        let cursor_x = chunks[1].x + 1 + SEARCH_PREFIX.len() as u16 + app.search.cursor_column();
        let cursor_x = cursor_x.min(chunks[1].right().saturating_sub(2));
        frame.set_cursor_position(Position::new(cursor_x, chunks[1].y + 1));
    }
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(" </> ", Style::default().fg(colors::ACCENT).add_modifier(Modifier::BOLD)),
            Span::styled("Appx API List", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            " Comprehensive database of app APIs - Search, discover, and integrate",
            colors::muted(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(colors::HEADER_BG)),
        area,
    );
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(colors::ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let line = if app.search.query.is_empty() && app.search.focused {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(
                "Search by app name... (e.g., 'agriculture', 'academy', 'classes')",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(format!("{}{}", SEARCH_PREFIX, app.search.query))
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_counter(frame: &mut Frame, app: &App, area: Rect) {
    let mut counter = format!(" {}", app.session.counter_text());
    if app.session.is_searching() {
        counter.push_str(" (searching...)");
    }

    let mut spans = vec![Span::styled(counter, colors::muted())];
    if app.session.has_query() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            " x Clear search (Esc) ",
            Style::default().fg(Color::White).bg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(frame: &mut Frame, app: &mut App, area: Rect) {
    if let Some(reason) = app.session.error() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("/!\\  Error loading data", colors::error())),
            Line::from(""),
            Line::from(Span::styled("Please try refreshing (F5)", colors::muted())),
            Line::from(Span::styled(reason.to_string(), Style::default().fg(Color::DarkGray))),
        ];
        draw_centered(frame, lines, area);
        return;
    }

    if app.session.is_loading() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("Loading API directory...", colors::muted())),
        ];
        draw_centered(frame, lines, area);
        return;
    }

    let view = app.session.view();
    if view.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No results found",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Try adjusting your search terms or browse all available APIs",
                colors::muted(),
            )),
            Line::from(Span::styled(
                "Press Esc to show all APIs",
                Style::default().fg(colors::ACCENT),
            )),
        ];
        draw_centered(frame, lines, area);
        return;
    }

    let visible = (area.height / CARD_HEIGHT).max(1) as usize;
    app.table.visible_rows = visible;

    let start = app.table.scroll_offset.min(view.len().saturating_sub(1));
    let end = (start + visible).min(view.len());
    let query = app.session.query();

    for (slot, index) in (start..end).enumerate() {
        let card_area = Rect::new(
            area.x,
            area.y + slot as u16 * CARD_HEIGHT,
            area.width,
            CARD_HEIGHT.min(area.bottom().saturating_sub(area.y + slot as u16 * CARD_HEIGHT)),
        );
        let record = view[index];
        let selected = app.table.selected == Some(index);
        let copied = app.is_copied(&record.id);
        draw_card(frame, record, query, selected, copied, card_area);
    }
}

/// Name spans with the matched parts emphasized
pub fn highlighted_name<'a>(name: &'a str, query: &str, selected: bool) -> Line<'a> {
    let spans: Vec<Span> = search::highlight(name, query)
        .into_iter()
        .map(|segment| {
            if segment.is_match {
                Span::styled(segment.text, colors::match_style())
            } else {
                Span::styled(segment.text, colors::name_style(selected))
            }
        })
        .collect();
    Line::from(spans)
}

fn draw_card(
    frame: &mut Frame,
    record: &AppRecord,
    query: &str,
    selected: bool,
    copied: bool,
    area: Rect,
) {
    let mut title = vec![Span::raw(" ")];
    title.extend(highlighted_name(&record.name, query, selected).spans);
    title.push(Span::raw(" "));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::card_border(selected))
        .title(Line::from(title));

    let copy_label = if copied { " ✓ Copied! " } else { " [c] Copy API " };
    let lines = vec![
        Line::from(Span::styled("API Endpoint", Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(record.api.as_str(), colors::endpoint_style())),
        Line::from(vec![
            Span::styled(copy_label, colors::copy_button(copied)),
            Span::raw("  "),
            Span::styled(" [o] Open ", colors::open_button()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_centered(frame: &mut Frame, lines: Vec<Line>, area: Rect) {
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help = if app.search.focused {
        " Type to search | Tab/Down: results | Esc: clear | F5: reload | Ctrl+C: quit "
    } else {
        " Up/Down: move | c/Enter: copy | o: open | /: search | F5: reload | Esc: quit "
    };

    let line = Line::from(vec![
        Span::styled(help, Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" "),
        Span::styled(app.status_message.as_str(), colors::muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
