//! Ledger game records and the pending-shot view resolver.
//!
//! The ledger reports whose turn it is and where the most recent shot
//! landed. Until the other player answers with the required reveal, that
//! shot has no hit-or-miss annotation anywhere, so the client marks it as
//! pending on exactly one board: the shooter sees it on their target board,
//! the player who owes the reveal sees it on their secret board. The
//! resolver combines the record with the viewer's identity to make that
//! call.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Coordinate;

pub use self::errors::ViewError;

mod errors;

/// Turn and outcome marker carried in a game record.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameState {
    /// Created, waiting for players to join.
    New,
    /// Player 1 fires next.
    P1Next,
    /// Player 2 fires next.
    P2Next,
    /// Player 1 has won.
    P1Won,
    /// Player 2 has won.
    P2Won,
    /// A marker this client does not recognize.
    Unknown(String),
}

impl From<String> for GameState {
    fn from(marker: String) -> Self {
        match marker.as_str() {
            "NEW" => GameState::New,
            "P1-NEXT" => GameState::P1Next,
            "P2-NEXT" => GameState::P2Next,
            "P1-WON" => GameState::P1Won,
            "P2-WON" => GameState::P2Won,
            _ => GameState::Unknown(marker),
        }
    }
}

impl From<GameState> for String {
    fn from(state: GameState) -> Self {
        match state {
            GameState::New => "NEW".to_owned(),
            GameState::P1Next => "P1-NEXT".to_owned(),
            GameState::P2Next => "P2-NEXT".to_owned(),
            GameState::P1Won => "P1-WON".to_owned(),
            GameState::P2Won => "P2-WON".to_owned(),
            GameState::Unknown(marker) => marker,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let marker = match self {
            GameState::New => "NEW",
            GameState::P1Next => "P1-NEXT",
            GameState::P2Next => "P2-NEXT",
            GameState::P1Won => "P1-WON",
            GameState::P2Won => "P2-WON",
            GameState::Unknown(marker) => marker.as_str(),
        };
        f.pad(marker)
    }
}

/// A target board as currently annotated by the ledger.
///
/// Cells are strings: reveal annotations (`"M"` miss, `"H"` hit) or values
/// still opaque to the consumer (unfired commitment digests, placeholders).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetGrid(Vec<Vec<String>>);

impl TargetGrid {
    /// Board dimension.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Iterate the annotation rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.0.iter().map(|row| row.as_slice())
    }

    /// The raw cell value, or `None` if out of bounds.
    pub fn get(&self, coord: Coordinate) -> Option<&str> {
        self.0
            .get(coord.row)
            .and_then(|row| row.get(coord.col))
            .map(|cell| cell.as_str())
    }

    /// The display abstraction for one cell: anything that is not a reveal
    /// annotation is still unknown.
    pub fn revealed(&self, coord: Coordinate) -> RevealedCell {
        match self.get(coord) {
            Some("M") => RevealedCell::Miss,
            Some("H") => RevealedCell::Hit,
            _ => RevealedCell::Unknown,
        }
    }
}

/// What a target-board cell looks like to the consumer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RevealedCell {
    /// Not fired upon yet, or fired upon but not yet revealed.
    Unknown,
    /// Revealed as open water.
    Miss,
    /// Revealed as a ship cell.
    Hit,
}

/// One game as reported by the ledger. Consumed read-only; field names match
/// the ledger's wire encoding.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub name: String,
    #[serde(rename = "Player1", default)]
    pub player1: Option<String>,
    #[serde(rename = "Player2", default)]
    pub player2: Option<String>,
    #[serde(rename = "State")]
    pub state: GameState,
    #[serde(rename = "Ships")]
    pub ships: Vec<String>,
    #[serde(rename = "TargetBoard1", default)]
    pub target_board1: Option<TargetGrid>,
    #[serde(rename = "TargetBoard2", default)]
    pub target_board2: Option<TargetGrid>,
    #[serde(rename = "LastFireRow", default)]
    pub last_fire_row: Option<String>,
    #[serde(rename = "LastFireColumn", default)]
    pub last_fire_column: Option<String>,
}

impl GameRecord {
    /// Coordinate of the most recent shot, or `None` before any shot.
    ///
    /// A half-present or unparseable coordinate pair means this client and
    /// the ledger disagree about the game and is reported as
    /// [`ViewError::AmbiguousGameState`].
    pub fn last_fire(&self) -> Result<Option<Coordinate>, ViewError> {
        match (&self.last_fire_row, &self.last_fire_column) {
            (None, None) => Ok(None),
            (Some(row), Some(column)) => Coordinate::from_wire(row, column)
                .map(Some)
                .ok_or_else(|| self.ambiguous()),
            _ => Err(self.ambiguous()),
        }
    }

    fn ambiguous(&self) -> ViewError {
        ViewError::AmbiguousGameState {
            game: self.name.clone(),
            state: self.state.to_string(),
            row: self.last_fire_row.clone(),
            column: self.last_fire_column.clone(),
        }
    }
}

/// Which of the two target boards belongs to the viewer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    Player1,
    Player2,
}

/// The marker for a shot whose reveal has not been posted yet.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PendingShot {
    /// Cell of the most recent shot.
    pub coord: Coordinate,
    /// True when the marker belongs on the viewer's target board: the viewer
    /// fired last and awaits the opponent's reveal. False puts it on the
    /// viewer's secret board: the opponent fired and the viewer owes the
    /// reveal on their next move.
    pub on_target_board: bool,
}

/// Display decision for one viewer of one game.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GameView {
    /// The board slot the viewer fires at.
    pub side: Side,
    /// The pending-shot marker, if one applies.
    pub pending: Option<PendingShot>,
}

impl GameView {
    /// The viewer's target board from the record, if the ledger carries one.
    pub fn target_board<'r>(&self, record: &'r GameRecord) -> Option<&'r TargetGrid> {
        match self.side {
            Side::Player1 => record.target_board1.as_ref(),
            Side::Player2 => record.target_board2.as_ref(),
        }
    }
}

/// Resolve the viewer's identity against the record and decide where the
/// pending-shot marker belongs.
///
/// A marker exists exactly when the state names a next player and a shot has
/// occurred. It lands on the viewer's target board when the opponent still
/// owes the reveal for the viewer's shot, and on the viewer's secret board
/// when the viewer owes the reveal for the opponent's shot.
pub fn resolve(record: &GameRecord, viewer: &str) -> Result<GameView, ViewError> {
    let side = if record.player1.as_deref() == Some(viewer) {
        Side::Player1
    } else if record.player2.as_deref() == Some(viewer) {
        Side::Player2
    } else {
        return Err(ViewError::NotAParticipant {
            viewer: viewer.to_owned(),
            game: record.name.clone(),
        });
    };

    let last_fire = record.last_fire()?;
    let pending = match (&record.state, last_fire) {
        (GameState::P1Next, Some(coord)) => Some(PendingShot {
            coord,
            on_target_board: side == Side::Player2,
        }),
        (GameState::P2Next, Some(coord)) => Some(PendingShot {
            coord,
            on_target_board: side == Side::Player1,
        }),
        (GameState::Unknown(_), Some(_)) => return Err(record.ambiguous()),
        _ => None,
    };

    Ok(GameView { side, pending })
}
