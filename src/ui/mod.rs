mod columns;
mod input;
pub mod shell;

use crate::controller::{BoardController, DropResult, MoveOutcome};
use crate::model::{Board, CardId, Location, Status};
use anyhow::Result;
use columns::{ColumnView, DropTarget};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use input::FieldValue;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;
use ratatui::text::Line;
use ratatui::{Frame, Terminal};
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info};

pub fn run(controller: BoardController) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(controller);
    info!(cards = app.controller.board().len(), "board opened");
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    controller: BoardController,
    selected_column: usize,
    selected_card: usize,
    scroll_offsets: [usize; 4],
    search: FieldValue,
    focus: Focus,
    drag: Option<DragState>,
    status: String,
    column_areas: Vec<(Status, Rect)>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    Board,
    Search,
}

/// A card that has been picked up but not yet dropped.
#[derive(Clone, Debug)]
struct DragState {
    card_id: CardId,
    source: Location,
    /// Where the card would land; `None` while no column accepts it.
    over: Option<Location>,
}

impl DragState {
    fn to_drop(&self) -> DropResult {
        DropResult {
            card_id: self.card_id.clone(),
            source: self.source,
            destination: self.over,
        }
    }

    /// Where keyboard steering starts from. A drag that left every column
    /// picks up again at its source; nothing is steerable while filtering.
    fn steer_origin(&self, filtering: bool) -> Option<Location> {
        if filtering {
            return None;
        }
        Some(self.over.unwrap_or(self.source))
    }
}

impl App {
    fn new(controller: BoardController) -> Self {
        let search = FieldValue::new(controller.search());
        let status = if controller.is_filtering() {
            format!("Showing cards matching \"{}\"", controller.search().trim())
        } else {
            "Space picks up a card, / searches".to_string()
        };
        App {
            controller,
            selected_column: 0,
            selected_card: 0,
            scroll_offsets: [0; 4],
            search,
            focus: Focus::Board,
            drag: None,
            status,
            column_areas: Vec::new(),
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                match event::read()? {
                    Event::Key(key) => {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.drag.is_some() {
            self.handle_drag_key(key);
            return Ok(false);
        }
        match self.focus {
            Focus::Search => {
                self.handle_search_key(key);
                Ok(false)
            }
            Focus::Board => self.handle_board_key(key),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(true)
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                self.status = "Type to filter by company or role, Enter to finish".into();
            }
            KeyCode::Char('c') => {
                if self.search.is_empty() {
                    self.status = "No filter to clear".into();
                } else {
                    self.search.clear();
                    self.apply_search();
                    self.status = "Filter cleared".into();
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.prev_column(),
            KeyCode::Right | KeyCode::Char('l') => self.next_column(),
            KeyCode::Up | KeyCode::Char('k') => self.prev_card(),
            KeyCode::Down | KeyCode::Char('j') => self.next_card(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                let source = self.selected_location();
                self.start_drag(source);
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Board;
                self.status = if self.controller.is_filtering() {
                    format!("{} card(s) match", self.controller.view().len())
                } else {
                    "Showing all cards".into()
                };
                return;
            }
            KeyCode::Char('u') if control => self.search.clear(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Char(c) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.search.insert_char(c)
            }
            _ => return,
        }
        self.apply_search();
    }

    fn handle_drag_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.steer_column(-1),
            KeyCode::Right | KeyCode::Char('l') => self.steer_column(1),
            KeyCode::Up | KeyCode::Char('k') => self.steer_index(-1),
            KeyCode::Down | KeyCode::Char('j') => self.steer_index(1),
            KeyCode::Char(' ') | KeyCode::Enter => self.finish_drag(),
            KeyCode::Esc => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.over = None;
                }
                self.finish_drag();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.drag.is_some() {
                    return;
                }
                if let Some(location) = self.card_under(mouse.column, mouse.row) {
                    self.selected_column = location.status.index();
                    self.selected_card = location.index;
                    self.start_drag(Some(location));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.drag.is_some() {
                    let over = self.target_under(mouse.column, mouse.row);
                    if let Some(drag) = self.drag.as_mut() {
                        drag.over = over;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag.is_some() {
                    let over = self.target_under(mouse.column, mouse.row);
                    if let Some(drag) = self.drag.as_mut() {
                        drag.over = over;
                    }
                    self.finish_drag();
                }
            }
            _ => {}
        }
    }

    fn start_drag(&mut self, source: Option<Location>) {
        let Some(source) = source else {
            self.status = "No card selected".into();
            return;
        };
        let Some(card) = self.controller.view().card_at(source) else {
            self.status = "No card selected".into();
            return;
        };
        let card_id = card.id.clone();
        let filtering = self.controller.is_filtering();
        self.status = if filtering {
            shell::FILTER_NOTICE.to_string()
        } else {
            format!(
                "Moving {}: arrows choose a spot, Space drops, Esc cancels",
                card.company
            )
        };
        debug!(card = %card_id, from = %source.status, "drag started");
        self.drag = Some(DragState {
            card_id,
            source,
            over: (!filtering).then_some(source),
        });
    }

    fn finish_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let dropped = drag.to_drop();
        match self.controller.on_drag_end(&dropped) {
            Ok(MoveOutcome::Moved { from, to }) => {
                self.status = if from == to {
                    format!("Reordered {}", from)
                } else {
                    format!("Moved to {}", to)
                };
                self.select_card(&dropped.card_id);
            }
            Ok(MoveOutcome::Cancelled) => {
                self.status = if self.controller.is_filtering() {
                    shell::FILTER_NOTICE.to_string()
                } else {
                    "Move cancelled".into()
                };
            }
            Ok(MoveOutcome::FilterActive) => {
                self.status = shell::FILTER_NOTICE.to_string();
            }
            Err(err) => {
                self.status = format!("Move failed: {}", err);
            }
        }
    }

    fn steer_column(&mut self, delta: isize) {
        let filtering = self.controller.is_filtering();
        let board = self.controller.board();
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(over) = drag.steer_origin(filtering) else {
            return;
        };
        let target = (over.status.index() as isize + delta).clamp(0, 3) as usize;
        let Some(status) = Status::from_index(target) else {
            return;
        };
        let max = max_drop_index(board, drag.source, status);
        drag.over = Some(Location::new(status, over.index.min(max)));
    }

    fn steer_index(&mut self, delta: isize) {
        let filtering = self.controller.is_filtering();
        let board = self.controller.board();
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(over) = drag.steer_origin(filtering) else {
            return;
        };
        let max = max_drop_index(board, drag.source, over.status) as isize;
        let index = (over.index as isize + delta).clamp(0, max) as usize;
        drag.over = Some(Location::new(over.status, index));
    }

    fn apply_search(&mut self) {
        self.controller.set_search(self.search.value());
        self.clamp_selection();
    }

    fn selected_location(&self) -> Option<Location> {
        let status = Status::from_index(self.selected_column)?;
        (self.selected_card < self.controller.view().count(status))
            .then(|| Location::new(status, self.selected_card))
    }

    fn select_card(&mut self, card_id: &str) {
        if let Some(location) = self.controller.view().find(card_id) {
            self.selected_column = location.status.index();
            self.selected_card = location.index;
        }
    }

    fn clamp_selection(&mut self) {
        let len = Status::from_index(self.selected_column)
            .map(|s| self.controller.view().count(s))
            .unwrap_or(0);
        self.selected_card = self.selected_card.min(len.saturating_sub(1));
    }

    fn prev_column(&mut self) {
        if self.selected_column > 0 {
            self.selected_column -= 1;
            self.clamp_selection();
        }
    }

    fn next_column(&mut self) {
        if self.selected_column + 1 < Status::ALL.len() {
            self.selected_column += 1;
            self.clamp_selection();
        }
    }

    fn prev_card(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    fn next_card(&mut self) {
        self.selected_card += 1;
        self.clamp_selection();
    }

    fn card_under(&self, x: u16, y: u16) -> Option<Location> {
        let (status, area) = self.column_at(x, y)?;
        let row = columns::card_row_at(area, self.scroll_offsets[status.index()], y)?;
        (row < self.controller.view().count(status)).then(|| Location::new(status, row))
    }

    /// Drop location under the pointer. Always `None` while filtering.
    fn target_under(&self, x: u16, y: u16) -> Option<Location> {
        if self.controller.is_filtering() {
            return None;
        }
        let drag = self.drag.as_ref()?;
        let (status, area) = self.column_at(x, y)?;
        let offset = self.scroll_offsets[status.index()];
        let max = max_drop_index(self.controller.board(), drag.source, status);
        let row = columns::card_row_at(area, offset, y).unwrap_or(max);
        Some(Location::new(status, row.min(max)))
    }

    fn column_at(&self, x: u16, y: u16) -> Option<(Status, Rect)> {
        self.column_areas
            .iter()
            .copied()
            .find(|(_, area)| columns::contains(*area, x, y))
    }

    fn draw(&mut self, f: &mut Frame<'_>) {
        let areas = shell::split(f.size());
        shell::render_header(f, areas.header, &self.search, self.focus == Focus::Search);
        shell::render_heading(f, areas.heading, self.controller.is_filtering());
        self.draw_board(f, areas.content);
        shell::render_footer(f, areas.footer, self.help_line(), &self.status);
    }

    fn draw_board(&mut self, f: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        let preview = self
            .drag
            .as_ref()
            .and_then(|drag| self.controller.preview(&drag.to_drop()));
        let shown: &Board = preview.as_ref().unwrap_or_else(|| self.controller.view());
        let dragging = self.drag.as_ref().map(|d| d.card_id.as_str());
        let dragged_at = dragging.and_then(|id| shown.find(id));

        let mut areas = Vec::with_capacity(Status::ALL.len());
        let mut offsets = self.scroll_offsets;
        for (status, cards) in shown.buckets() {
            let idx = status.index();
            let selected = match (self.drag.as_ref(), dragged_at) {
                (Some(_), Some(at)) => (at.status == status).then_some(at.index),
                (Some(_), None) => None,
                (None, _) => (idx == self.selected_column && self.focus == Focus::Board)
                    .then_some(self.selected_card),
            };
            let drop_target = match self.drag.as_ref() {
                None => DropTarget::Idle,
                Some(drag) => match drag.over {
                    Some(over) => DropTarget::Accepting {
                        hovered: over.status == status,
                    },
                    None if self.controller.is_filtering() => DropTarget::Disabled,
                    None => DropTarget::Accepting { hovered: false },
                },
            };
            let view = ColumnView {
                status,
                cards,
                selected,
                dragging,
                drop_target,
                offset: offsets[idx],
            };
            offsets[idx] = columns::render_column(f, chunks[idx], &view);
            areas.push((status, chunks[idx]));
        }
        self.scroll_offsets = offsets;
        self.column_areas = areas;
    }

    fn help_line(&self) -> Line<'static> {
        if self.drag.is_some() {
            return shell::help_spans(&[
                ("←→ / h l", "column", Color::LightCyan),
                ("↑↓ / j k", "position", Color::LightCyan),
                ("Space/Enter", "drop", Color::LightGreen),
                ("Esc", "cancel", Color::LightRed),
            ]);
        }
        match self.focus {
            Focus::Search => shell::help_spans(&[
                ("type", "filter", Color::LightCyan),
                ("Ctrl+U", "clear", Color::LightYellow),
                ("Enter/Esc", "back to board", Color::LightGreen),
            ]),
            Focus::Board => shell::help_spans(&[
                ("←↑↓→ / h j k l", "select", Color::LightCyan),
                ("Space/Enter", "pick up", Color::LightGreen),
                ("mouse", "drag", Color::LightGreen),
                ("/", "search", Color::LightMagenta),
                ("c", "clear filter", Color::LightYellow),
                ("q", "quit", Color::LightRed),
            ]),
        }
    }
}

/// Largest valid final position for the dragged card in `status`.
fn max_drop_index(board: &Board, source: Location, status: Status) -> usize {
    let len = board.count(status);
    if status == source.status {
        len.saturating_sub(1)
    } else {
        len
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle(shell::PAGE_TITLE)
    )?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::builtin_board;
    use crossterm::event::KeyEventState;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(BoardController::new(builtin_board()))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn ids(app: &App, status: Status) -> Vec<String> {
        app.controller
            .board()
            .bucket(status)
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }

    #[test]
    fn renders_columns_with_counts() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("Job Tracker"));
        assert!(screen.contains("Search company or role"));
        assert!(screen.contains("Job Applications Kanban"));
        assert!(screen.contains(" Applied 2 "));
        assert!(screen.contains(" Interviewing 1 "));
        assert!(screen.contains(" Offer 1 "));
        assert!(screen.contains(" Rejected 1 "));
        assert!(screen.contains("Acme Corp"));
        assert!(screen.contains("Applied: 2025-06-20"));
        assert!(!screen.contains(shell::FILTER_NOTICE));
    }

    #[test]
    fn typing_in_search_filters_each_keystroke() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.focus, Focus::Search);
        type_text(&mut app, "ac");
        assert_eq!(app.controller.search(), "ac");
        type_text(&mut app, "ME");
        assert_eq!(app.controller.view().len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Board);

        let screen = render(&mut app);
        assert!(screen.contains(shell::FILTER_NOTICE));
        assert!(screen.contains(" Applied 1 "));
        assert!(screen.contains(" Offer 0 "));
        assert!(!screen.contains("Globex"));
    }

    #[test]
    fn clear_filter_restores_board() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "hooli");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.controller.view().len(), 1);
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.controller.is_filtering());
        assert_eq!(app.controller.view().len(), 5);
    }

    #[test]
    fn keyboard_drag_moves_across_columns() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.drag.is_some());
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        let drag = app.drag.as_ref().unwrap();
        assert_eq!(drag.over, Some(Location::new(Status::Offer, 1)));
        press(&mut app, KeyCode::Enter);

        assert!(app.drag.is_none());
        assert!(ids(&app, Status::Interviewing).is_empty());
        assert_eq!(ids(&app, Status::Offer), vec!["4", "3"]);
        assert_eq!(app.controller.board().bucket(Status::Offer)[1].status, Status::Offer);
        assert_eq!((app.selected_column, app.selected_card), (2, 1));
        assert_eq!(app.status, "Moved to Offer");
    }

    #[test]
    fn keyboard_drag_reorders_within_column() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(ids(&app, Status::Applied), vec!["2", "1"]);
        assert_eq!(app.status, "Reordered Applied");
    }

    #[test]
    fn escape_cancels_drag() {
        let mut app = app();
        let before = app.controller.board().clone();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Esc);
        assert!(app.drag.is_none());
        assert_eq!(app.controller.board(), &before);
        assert_eq!(app.status, "Move cancelled");
    }

    #[test]
    fn drag_while_filtering_is_a_noop() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "engineer");
        press(&mut app, KeyCode::Enter);
        let before = app.controller.board().clone();

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.drag.as_ref().unwrap().over, None);
        let screen = render(&mut app);
        assert!(screen.contains("drop disabled"));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.controller.board(), &before);
        assert_eq!(app.status, shell::FILTER_NOTICE);
    }

    #[test]
    fn mouse_drag_moves_card() {
        let mut app = app();
        render(&mut app);
        let (_, applied) = app.column_areas[0];
        let (_, offer) = app.column_areas[2];

        mouse(
            &mut app,
            MouseEventKind::Down(MouseButton::Left),
            applied.x + 2,
            applied.y + 1,
        );
        assert_eq!(app.drag.as_ref().unwrap().card_id, "1");
        let below_first = offer.y + 1 + columns::CARD_HEIGHT as u16;
        mouse(
            &mut app,
            MouseEventKind::Drag(MouseButton::Left),
            offer.x + 2,
            below_first,
        );
        render(&mut app);
        mouse(
            &mut app,
            MouseEventKind::Up(MouseButton::Left),
            offer.x + 2,
            below_first,
        );

        assert_eq!(ids(&app, Status::Applied), vec!["2"]);
        assert_eq!(ids(&app, Status::Offer), vec!["4", "1"]);
    }

    #[test]
    fn keys_resume_a_drag_that_left_the_board() {
        let mut app = app();
        render(&mut app);
        let (_, applied) = app.column_areas[0];
        mouse(
            &mut app,
            MouseEventKind::Down(MouseButton::Left),
            applied.x + 2,
            applied.y + 1,
        );
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 0, 0);
        assert_eq!(app.drag.as_ref().unwrap().over, None);

        press(&mut app, KeyCode::Right);
        assert_eq!(
            app.drag.as_ref().unwrap().over,
            Some(Location::new(Status::Interviewing, 0))
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(ids(&app, Status::Applied), vec!["2"]);
        assert_eq!(ids(&app, Status::Interviewing), vec!["1", "3"]);
    }

    #[test]
    fn mouse_release_outside_columns_cancels() {
        let mut app = app();
        render(&mut app);
        let before = app.controller.board().clone();
        let (_, applied) = app.column_areas[0];
        mouse(
            &mut app,
            MouseEventKind::Down(MouseButton::Left),
            applied.x + 2,
            applied.y + 1,
        );
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 0, 0);
        assert!(app.drag.is_none());
        assert_eq!(app.controller.board(), &before);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(!app
            .handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap());
        assert!(app
            .handle_key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            })
            .unwrap());
        assert!(app
            .handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE))
            .unwrap());
    }
}
