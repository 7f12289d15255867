use crate::config::AppConfig;
use crate::controller::BoardController;
use crate::model::{Board, Card, Status};
use crate::seed::{column_to_yaml, load_board, to_yaml};
use crate::ui;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use tracing::warn;

pub fn tui(config: &AppConfig, search: Option<String>) -> Result<()> {
    let board = load_seed(config)?;
    let mut controller = BoardController::new(board);
    if let Some(term) = search {
        controller.set_search(term);
    }
    ui::run(controller)
}

pub fn list(
    config: &AppConfig,
    search: Option<String>,
    status: Option<Status>,
    yaml: bool,
) -> Result<()> {
    let board = load_seed(config)?;
    let view = board.filtered(search.as_deref().unwrap_or_default());
    if yaml {
        print!("{}", render_yaml(&view, status)?);
    } else {
        print!("{}", render_listing(&view, status));
    }
    Ok(())
}

fn load_seed(config: &AppConfig) -> Result<Board> {
    let board = load_board(config.seed_path.as_deref()).context("loading seed board")?;
    if board.is_empty() {
        warn!("seed board has no cards");
    }
    Ok(board)
}

fn render_yaml(board: &Board, only: Option<Status>) -> Result<String> {
    let text = match only {
        Some(status) => column_to_yaml(board, status),
        None => to_yaml(board),
    };
    text.context("serializing board")
}

fn render_listing(board: &Board, only: Option<Status>) -> String {
    let mut out = String::new();
    for (status, cards) in board.buckets() {
        if only.is_some_and(|wanted| wanted != status) {
            continue;
        }
        let _ = writeln!(out, "{} ({})", status, cards.len());
        if cards.is_empty() {
            out.push_str("  (empty)\n");
        }
        for card in cards {
            write_card(&mut out, card);
        }
        out.push('\n');
    }
    out
}

fn write_card(out: &mut String, card: &Card) {
    let _ = writeln!(out, "  - {}: {}", card.id, card.company);
    let _ = writeln!(out, "    {}", card.role);
    let _ = writeln!(out, "    applied: {}", card.date_applied);
}
