use crate::model::{Card, Emphasis, Status};
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

/// Terminal rows taken by one card in a column.
pub const CARD_HEIGHT: usize = 4;

/// Everything needed to draw one status column for the current frame.
pub struct ColumnView<'a> {
    pub status: Status,
    pub cards: &'a [Card],
    pub selected: Option<usize>,
    pub dragging: Option<&'a str>,
    pub drop_target: DropTarget,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// No drag in progress.
    Idle,
    /// A drag is in progress and this column accepts it.
    Accepting { hovered: bool },
    /// A drag is in progress but drops are disabled.
    Disabled,
}

/// Draws the column and returns the scroll offset it settled on.
pub fn render_column(f: &mut Frame<'_>, area: Rect, column: &ColumnView<'_>) -> usize {
    let card_width = area.width.saturating_sub(2);
    let items = if column.cards.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No applications",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))]
    } else {
        column
            .cards
            .iter()
            .enumerate()
            .map(|(idx, card)| {
                let dragged = column.dragging == Some(card.id.as_str());
                card_item(card, card_width, column.selected == Some(idx), dragged)
            })
            .collect()
    };

    let viewport = visible_cards(area);
    let mut state = ListState::default();
    let offset = match column.selected {
        Some(sel) => adjust_offset(sel, column.offset, viewport, 1, column.cards.len()),
        None => column
            .offset
            .min(column.cards.len().saturating_sub(viewport)),
    };
    *state.offset_mut() = offset;

    let list = List::new(items).block(column_block(column));
    f.render_stateful_widget(list, area, &mut state);
    offset
}

fn column_block(column: &ColumnView<'_>) -> Block<'static> {
    let accent = status_accent(column.status);
    let mut title = vec![Span::styled(
        format!(" {} ", column.status.label()),
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )];
    title.push(Span::styled(
        format!("{} ", column.cards.len()),
        Style::default().fg(Color::Gray),
    ));
    let border = match column.drop_target {
        DropTarget::Idle if column.selected.is_some() => Style::default()
            .fg(accent)
            .add_modifier(Modifier::BOLD),
        DropTarget::Idle => Style::default().fg(Color::DarkGray),
        DropTarget::Accepting { hovered: true } => Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
        DropTarget::Accepting { hovered: false } => Style::default().fg(Color::Green),
        DropTarget::Disabled => {
            title.push(Span::styled(
                "drop disabled ",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            Style::default().fg(Color::DarkGray)
        }
    };
    Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border)
        .style(Style::default().bg(Color::Rgb(16, 18, 24)))
}

pub fn card_item(card: &Card, width: u16, selected: bool, dragged: bool) -> ListItem<'static> {
    let inner = width.saturating_sub(2).max(10) as usize;
    let badge = format!(" {} ", card.status.label());
    let marker = if dragged { "⇅ " } else { "" };
    let company_room = inner.saturating_sub(badge.chars().count() + marker.chars().count() + 1);
    let company = truncate_text(&card.company, company_room);
    let pad = inner.saturating_sub(
        marker.chars().count() + company.chars().count() + badge.chars().count(),
    );

    let lines = vec![
        Line::from(vec![
            Span::raw(marker),
            Span::styled(
                company,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(pad)),
            Span::styled(badge, badge_style(card.status.emphasis())),
        ]),
        Line::from(Span::styled(
            truncate_text(&card.role, inner),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            truncate_text(&format!("Applied: {}", card.date_applied), inner),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "─".repeat(inner),
            Style::default().fg(Color::Rgb(40, 44, 52)),
        )),
    ];

    let style = if dragged {
        Style::default()
            .bg(Color::Rgb(70, 60, 20))
            .add_modifier(Modifier::BOLD)
    } else if selected {
        Style::default().bg(Color::Rgb(40, 60, 90))
    } else {
        Style::default().bg(Color::Rgb(22, 24, 30))
    };
    ListItem::new(lines).style(style)
}

pub fn badge_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Muted => Style::default().fg(Color::Black).bg(Color::Gray),
        Emphasis::Prominent => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Emphasis::Alarming => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

fn status_accent(status: Status) -> Color {
    match status {
        Status::Applied => Color::Gray,
        Status::Interviewing => Color::LightCyan,
        Status::Offer => Color::LightGreen,
        Status::Rejected => Color::LightRed,
    }
}

/// Row index under terminal row `y`, counting from the column's scroll
/// offset. `None` when `y` is on the border or outside the column.
pub fn card_row_at(area: Rect, offset: usize, y: u16) -> Option<usize> {
    let top = area.y.saturating_add(1);
    let bottom = area.y.saturating_add(area.height).saturating_sub(1);
    if y < top || y >= bottom {
        return None;
    }
    Some(offset + (y - top) as usize / CARD_HEIGHT)
}

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn visible_cards(area: Rect) -> usize {
    (area.height.saturating_sub(2) as usize / CARD_HEIGHT).max(1)
}

/// Scroll offset that keeps card `selected` on screen with `margin` cards
/// of context, moving as little as possible from `offset`.
pub fn adjust_offset(
    selected: usize,
    offset: usize,
    visible: usize,
    margin: usize,
    len: usize,
) -> usize {
    if visible == 0 || len == 0 {
        return 0;
    }
    let last_offset = len.saturating_sub(visible);
    let margin = margin.min(visible - 1);
    let offset = offset.min(last_offset);
    let top = offset + margin;
    let bottom = (offset + visible - 1).saturating_sub(margin);
    let offset = if selected < top {
        selected.saturating_sub(margin)
    } else if selected > bottom {
        (selected + margin + 1).saturating_sub(visible)
    } else {
        offset
    };
    offset.min(last_offset)
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
