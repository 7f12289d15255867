//! Page chrome around the board: header with the search input, the board
//! heading and the help/status footer.

use super::input::FieldValue;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub const PAGE_TITLE: &str = "Job Applications Kanban | Track Your Applications";
pub const PAGE_DESCRIPTION: &str = "Manage job applications in a Kanban board: Applied, Interviewing, Offer, Rejected. Drag-and-drop and search.";

const APP_NAME: &str = "Job Tracker";
const SEARCH_PLACEHOLDER: &str = "Search company or role";
const HEADING: &str = "Job Applications Kanban";
const SUBTITLE: &str = "Drag cards between stages to track your progress.";
pub const FILTER_NOTICE: &str = "Filtering is active. Drag-and-drop is temporarily disabled.";

pub struct ShellAreas {
    pub header: Rect,
    pub heading: Rect,
    pub content: Rect,
    pub footer: Rect,
}

pub fn split(area: Rect) -> ShellAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);
    ShellAreas {
        header: rows[0],
        heading: rows[1],
        content: rows[2],
        footer: rows[3],
    }
}

pub fn render_header(f: &mut Frame<'_>, area: Rect, search: &FieldValue, focused: bool) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let brand = Line::from(vec![
        Span::styled("■ ", Style::default().fg(Color::Cyan)),
        Span::styled(
            APP_NAME,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    let brand = Paragraph::new(brand).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(brand, cols[0]);

    let text = if focused {
        Span::styled(search.with_caret(), Style::default().fg(Color::Cyan))
    } else if search.is_empty() {
        Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(search.value().to_string(), Style::default().fg(Color::White))
    };
    let input = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(" / Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            })),
    );
    f.render_widget(input, cols[1]);
}

pub fn render_heading(f: &mut Frame<'_>, area: Rect, filtering: bool) {
    let mut lines = vec![
        Line::from(Span::styled(
            HEADING,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray))),
    ];
    if filtering {
        lines.push(Line::from(Span::styled(
            FILTER_NOTICE,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

pub fn render_footer(f: &mut Frame<'_>, area: Rect, help: Line<'static>, status: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1)])
        .split(area);
    let help_bar = Paragraph::new(help).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(help_bar, rows[0]);
    let status = Paragraph::new(status.to_string())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    f.render_widget(status, rows[1]);
}

pub fn help_spans(entries: &[(&'static str, &'static str, Color)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (key, label, color) in entries {
        spans.push(Span::styled(*key, Style::default().fg(*color)));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    Line::from(spans)
}
