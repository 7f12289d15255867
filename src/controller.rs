use crate::model::{Board, BoardError, CardId, Location, Status};
use tracing::{debug, warn};

/// Payload of a finished drag gesture. `destination` is `None` when the
/// card was released outside any accepting column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub card_id: CardId,
    pub source: Location,
    pub destination: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: Status, to: Status },
    Cancelled,
    FilterActive,
}

/// Sole owner of the board. Keeps the filtered view in step with the board
/// and the search term.
#[derive(Debug, Clone)]
pub struct BoardController {
    board: Board,
    search: String,
    view: Board,
}

impl BoardController {
    pub fn new(board: Board) -> Self {
        let view = board.clone();
        BoardController {
            board,
            search: String::new(),
            view,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// What the renderer shows: the board restricted by the search term.
    pub fn view(&self) -> &Board {
        &self.view
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_filtering(&self) -> bool {
        !self.search.trim().is_empty()
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search {
            return;
        }
        self.search = term;
        self.refresh_view();
        debug!(term = %self.search, shown = self.view.len(), "search updated");
    }

    /// Applies a finished drag. Cancelled gestures and drops made while a
    /// filter is active leave the board untouched; view indices only equal
    /// board indices when nothing is filtered out.
    pub fn on_drag_end(&mut self, drop: &DropResult) -> Result<MoveOutcome, BoardError> {
        let Some(destination) = drop.destination else {
            return Ok(MoveOutcome::Cancelled);
        };
        if self.is_filtering() {
            debug!(card = %drop.card_id, "drop ignored while filtering");
            return Ok(MoveOutcome::FilterActive);
        }
        if let Err(err) = self
            .board
            .move_card(&drop.card_id, drop.source, destination)
        {
            warn!(card = %drop.card_id, error = %err, "rejected stale drop");
            return Err(err);
        }
        self.refresh_view();
        debug!(
            card = %drop.card_id,
            from = %drop.source.status,
            to = %destination.status,
            index = destination.index,
            "card moved"
        );
        Ok(MoveOutcome::Moved {
            from: drop.source.status,
            to: destination.status,
        })
    }

    /// The board as it would look if `drop` landed now. `None` when the drop
    /// would be a no-op or is stale.
    pub fn preview(&self, drop: &DropResult) -> Option<Board> {
        let destination = drop.destination?;
        if self.is_filtering() {
            return None;
        }
        let mut board = self.board.clone();
        board
            .move_card(&drop.card_id, drop.source, destination)
            .ok()?;
        Some(board)
    }

    fn refresh_view(&mut self) {
        self.view = self.board.filtered(&self.search);
    }
}
