use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub type CardId = String;

/// Hiring stage of an application. Declaration order is column order.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

/// How loudly a status badge is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Muted,
    Prominent,
    Alarming,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub company: String,
    pub role: String,
    pub date_applied: String,
    pub status: Status,
}

/// Position of a card inside one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub status: Status,
    pub index: usize,
}

/// Status → ordered cards. Every status always has a bucket and every card
/// sits in the bucket named by its own `status`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Board {
    buckets: BTreeMap<Status, Vec<Card>>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("duplicate card id: {0}")]
    DuplicateCard(CardId),
    #[error("card {id} has status {status} but is filed under {bucket}")]
    StatusMismatch {
        id: CardId,
        bucket: Status,
        status: Status,
    },
    #[error("no card at {status}[{index}]")]
    IndexOutOfRange { status: Status, index: usize },
    #[error("expected card {expected} but found {found}")]
    CardMismatch { expected: CardId, found: CardId },
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Applied,
        Status::Interviewing,
        Status::Offer,
        Status::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::Interviewing => "Interviewing",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
        }
    }

    pub fn emphasis(self) -> Emphasis {
        match self {
            Status::Applied => Emphasis::Muted,
            Status::Interviewing | Status::Offer => Emphasis::Prominent,
            Status::Rejected => Emphasis::Alarming,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Status::Applied => 0,
            Status::Interviewing => 1,
            Status::Offer => 2,
            Status::Rejected => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Status> {
        Status::ALL.get(idx).copied()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BoardError::UnknownStatus(wanted.to_string()))
    }
}

/// Seed files name statuses the same loose way the command line does.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl Card {
    pub fn new(
        id: impl Into<CardId>,
        company: impl Into<String>,
        role: impl Into<String>,
        date_applied: impl Into<String>,
        status: Status,
    ) -> Self {
        Card {
            id: id.into(),
            company: company.into(),
            role: role.into(),
            date_applied: date_applied.into(),
            status,
        }
    }

    /// `needle` must already be trimmed and lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.company, &self.role]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Location {
    pub fn new(status: Status, index: usize) -> Self {
        Location { status, index }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board {
            buckets: Status::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
        }
    }

    /// Builds a board from raw buckets, checking that every card is filed
    /// under its own status and that ids are unique.
    pub fn from_buckets(raw: BTreeMap<Status, Vec<Card>>) -> Result<Self, BoardError> {
        let mut board = Board::new();
        let mut seen = HashSet::new();
        for (bucket, cards) in raw {
            for card in cards {
                if card.status != bucket {
                    return Err(BoardError::StatusMismatch {
                        id: card.id,
                        bucket,
                        status: card.status,
                    });
                }
                if !seen.insert(card.id.clone()) {
                    return Err(BoardError::DuplicateCard(card.id));
                }
                board.push(card);
            }
        }
        Ok(board)
    }

    /// Appends a card to the bucket of its own status.
    pub fn push(&mut self, card: Card) {
        self.bucket_mut(card.status).push(card);
    }

    pub fn bucket(&self, status: Status) -> &[Card] {
        self.buckets
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn bucket_mut(&mut self, status: Status) -> &mut Vec<Card> {
        self.buckets.entry(status).or_default()
    }

    /// Buckets in column order.
    pub fn buckets(&self) -> impl Iterator<Item = (Status, &[Card])> + '_ {
        Status::ALL.into_iter().map(move |s| (s, self.bucket(s)))
    }

    pub fn count(&self, status: Status) -> usize {
        self.bucket(status).len()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, card_id: &str) -> Option<Location> {
        self.buckets().find_map(|(status, cards)| {
            cards
                .iter()
                .position(|c| c.id == card_id)
                .map(|index| Location::new(status, index))
        })
    }

    pub fn card_at(&self, location: Location) -> Option<&Card> {
        self.bucket(location.status).get(location.index)
    }

    /// Cards whose company or role contains `term`, case-insensitively.
    /// Bucket order is preserved; a blank term returns the board unchanged.
    pub fn filtered(&self, term: &str) -> Board {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        Board {
            buckets: self
                .buckets
                .iter()
                .map(|(status, cards)| {
                    let kept = cards
                        .iter()
                        .filter(|card| card.matches(&needle))
                        .cloned()
                        .collect();
                    (*status, kept)
                })
                .collect(),
        }
    }

    /// Removes the card at `from` and inserts it at `to`, adopting the
    /// destination status. `to.index` is the card's final position; an index
    /// past the end appends.
    pub fn move_card(
        &mut self,
        card_id: &str,
        from: Location,
        to: Location,
    ) -> Result<(), BoardError> {
        let found = self
            .card_at(from)
            .ok_or(BoardError::IndexOutOfRange {
                status: from.status,
                index: from.index,
            })?;
        if found.id != card_id {
            return Err(BoardError::CardMismatch {
                expected: card_id.to_string(),
                found: found.id.clone(),
            });
        }
        let mut card = self.bucket_mut(from.status).remove(from.index);
        card.status = to.status;
        let dest = self.bucket_mut(to.status);
        let index = to.index.min(dest.len());
        dest.insert(index, card);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::builtin_board;
    use pretty_assertions::assert_eq;

    fn ids(board: &Board, status: Status) -> Vec<&str> {
        board.bucket(status).iter().map(|c| c.id.as_str()).collect()
    }

    fn assert_bucket_keys(board: &Board) {
        for (status, cards) in board.buckets() {
            for card in cards {
                assert_eq!(card.status, status, "card {} misfiled", card.id);
            }
        }
    }

    fn three_applied() -> Board {
        let mut raw = BTreeMap::new();
        raw.insert(
            Status::Applied,
            vec![
                Card::new("a", "Acme", "Dev", "2025-01-01", Status::Applied),
                Card::new("b", "Blue", "Ops", "2025-01-02", Status::Applied),
                Card::new("c", "Cyan", "QA", "2025-01-03", Status::Applied),
            ],
        );
        Board::from_buckets(raw).unwrap()
    }

    #[test]
    fn new_board_has_every_bucket() {
        let board = Board::new();
        assert_eq!(board.buckets().count(), 4);
        assert!(board.is_empty());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("offer".parse::<Status>(), Ok(Status::Offer));
        assert_eq!(" INTERVIEWING ".parse::<Status>(), Ok(Status::Interviewing));
        assert_eq!(
            "ghosted".parse::<Status>(),
            Err(BoardError::UnknownStatus("ghosted".into()))
        );
    }

    #[test]
    fn emphasis_follows_status() {
        assert_eq!(Status::Applied.emphasis(), Emphasis::Muted);
        assert_eq!(Status::Interviewing.emphasis(), Emphasis::Prominent);
        assert_eq!(Status::Offer.emphasis(), Emphasis::Prominent);
        assert_eq!(Status::Rejected.emphasis(), Emphasis::Alarming);
    }

    #[test]
    fn from_buckets_rejects_misfiled_card() {
        let mut raw = BTreeMap::new();
        raw.insert(
            Status::Offer,
            vec![Card::new("x", "Acme", "Dev", "-", Status::Applied)],
        );
        assert_eq!(
            Board::from_buckets(raw),
            Err(BoardError::StatusMismatch {
                id: "x".into(),
                bucket: Status::Offer,
                status: Status::Applied,
            })
        );
    }

    #[test]
    fn from_buckets_rejects_duplicate_ids() {
        let mut raw = BTreeMap::new();
        raw.insert(
            Status::Applied,
            vec![Card::new("x", "Acme", "Dev", "-", Status::Applied)],
        );
        raw.insert(
            Status::Offer,
            vec![Card::new("x", "Globex", "Dev", "-", Status::Offer)],
        );
        assert_eq!(
            Board::from_buckets(raw),
            Err(BoardError::DuplicateCard("x".into()))
        );
    }

    #[test]
    fn empty_filter_returns_same_board() {
        let board = builtin_board();
        assert_eq!(board.filtered(""), board);
        assert_eq!(board.filtered("   "), board);
    }

    #[test]
    fn filter_is_idempotent() {
        let board = builtin_board();
        for term in ["", "eng", "  ACME ", "developer", "hooli", "zzz"] {
            let once = board.filtered(term);
            assert_eq!(once.filtered(term), once, "term {term:?}");
        }
    }

    #[test]
    fn filter_matches_company_or_role_in_any_case() {
        let board = builtin_board();
        let view = board.filtered("  ACME ");
        assert_eq!(view.len(), 1);
        assert_eq!(ids(&view, Status::Applied), vec!["1"]);

        let view = board.filtered("engineer");
        assert_eq!(ids(&view, Status::Applied), vec!["1"]);
        assert_eq!(ids(&view, Status::Interviewing), vec!["3"]);
        assert_eq!(ids(&view, Status::Rejected), vec!["5"]);
        assert!(view.bucket(Status::Offer).is_empty());
    }

    #[test]
    fn same_column_move_reorders() {
        let mut board = three_applied();
        board
            .move_card(
                "a",
                Location::new(Status::Applied, 0),
                Location::new(Status::Applied, 2),
            )
            .unwrap();
        assert_eq!(ids(&board, Status::Applied), vec!["b", "c", "a"]);
        assert_eq!(board.count(Status::Applied), 3);
        assert_bucket_keys(&board);
    }

    #[test]
    fn cross_column_move_updates_status() {
        let mut board = builtin_board();
        let total = board.len();
        board
            .move_card(
                "3",
                Location::new(Status::Interviewing, 0),
                Location::new(Status::Offer, 1),
            )
            .unwrap();
        assert!(board.bucket(Status::Interviewing).is_empty());
        assert_eq!(ids(&board, Status::Offer), vec!["4", "3"]);
        assert_eq!(board.bucket(Status::Offer)[1].status, Status::Offer);
        assert_eq!(board.len(), total);
        assert_bucket_keys(&board);
    }

    #[test]
    fn every_move_keeps_cards_filed_and_counted() {
        let seed = builtin_board();
        let sources: Vec<(String, Location)> = seed
            .buckets()
            .flat_map(|(status, cards)| {
                cards
                    .iter()
                    .enumerate()
                    .map(move |(index, card)| (card.id.clone(), Location::new(status, index)))
            })
            .collect();
        for (id, from) in &sources {
            for to_status in Status::ALL {
                let remaining = seed.count(to_status) - usize::from(to_status == from.status);
                for index in 0..=remaining + 1 {
                    let mut board = seed.clone();
                    board
                        .move_card(id, *from, Location::new(to_status, index))
                        .unwrap();
                    assert_eq!(board.len(), seed.len());
                    assert_bucket_keys(&board);
                    assert_eq!(
                        board.find(id),
                        Some(Location::new(to_status, index.min(remaining))),
                        "{id} to {to_status}[{index}]"
                    );
                    let others = |b: &Board, s: Status| -> Vec<String> {
                        b.bucket(s)
                            .iter()
                            .filter(|c| &c.id != id)
                            .map(|c| c.id.clone())
                            .collect()
                    };
                    for status in Status::ALL {
                        assert_eq!(others(&board, status), others(&seed, status));
                    }
                }
            }
        }
    }

    #[test]
    fn destination_past_end_appends() {
        let mut board = builtin_board();
        board
            .move_card(
                "1",
                Location::new(Status::Applied, 0),
                Location::new(Status::Rejected, 99),
            )
            .unwrap();
        assert_eq!(ids(&board, Status::Rejected), vec!["5", "1"]);
    }

    #[test]
    fn stale_source_is_rejected_without_change() {
        let mut board = builtin_board();
        let before = board.clone();
        let err = board
            .move_card(
                "3",
                Location::new(Status::Interviewing, 4),
                Location::new(Status::Offer, 0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            BoardError::IndexOutOfRange {
                status: Status::Interviewing,
                index: 4
            }
        );
        let err = board
            .move_card(
                "2",
                Location::new(Status::Applied, 0),
                Location::new(Status::Offer, 0),
            )
            .unwrap_err();
        assert!(matches!(err, BoardError::CardMismatch { .. }));
        assert_eq!(board, before);
    }

    #[test]
    fn find_locates_cards() {
        let board = builtin_board();
        assert_eq!(board.find("2"), Some(Location::new(Status::Applied, 1)));
        assert_eq!(board.find("nope"), None);
    }
}
