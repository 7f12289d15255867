use crate::model::{Board, BoardError, Card, Status};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("reading seed file {path:?}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing seed file {path:?}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid seed file {path:?}")]
    Invalid { path: PathBuf, source: BoardError },
}

/// The board every session starts from when no seed file is configured.
pub fn builtin_board() -> Board {
    let mut board = Board::new();
    for card in [
        Card::new("1", "Acme Corp", "Frontend Engineer", "2025-07-01", Status::Applied),
        Card::new("2", "Globex", "Full Stack Developer", "2025-07-03", Status::Applied),
        Card::new("3", "Initech", "React Engineer", "2025-06-20", Status::Interviewing),
        Card::new("4", "Umbrella", "UI Developer", "2025-06-10", Status::Offer),
        Card::new("5", "Hooli", "Junior Engineer", "2025-06-01", Status::Rejected),
    ] {
        board.push(card);
    }
    board
}

/// Reads a seed file, or falls back to the built-in board when `path` is
/// `None`. The file is never written back.
pub fn load_board(path: Option<&Path>) -> Result<Board, SeedError> {
    let Some(path) = path else {
        info!("using built-in seed board");
        return Ok(builtin_board());
    };
    let data = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let board = parse_board(&data).map_err(|err| match err {
        ParseFailure::Yaml(source) => SeedError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::Board(source) => SeedError::Invalid {
            path: path.to_path_buf(),
            source,
        },
    })?;
    info!(path = %path.display(), cards = board.len(), "loaded seed board");
    Ok(board)
}

pub fn to_yaml(board: &Board) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(board)
}

/// Exports one column only, keyed by its status like a full export.
pub fn column_to_yaml(board: &Board, status: Status) -> Result<String, serde_yaml::Error> {
    let column: BTreeMap<Status, &[Card]> = BTreeMap::from([(status, board.bucket(status))]);
    serde_yaml::to_string(&column)
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    Board(BoardError),
}

fn parse_board(data: &str) -> Result<Board, ParseFailure> {
    if data.trim().is_empty() {
        return Ok(Board::new());
    }
    let raw: BTreeMap<Status, Vec<Card>> =
        serde_yaml::from_str(data).map_err(ParseFailure::Yaml)?;
    Board::from_buckets(raw).map_err(ParseFailure::Board)
}
