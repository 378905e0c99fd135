//! Errors produced by board generation and deserialization.

use thiserror::Error;

/// Error returned when rejection sampling could not place a ship within the
/// retry budget. Distinguishes a pathological spec from a hang.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("could not place ship {ship:?} after {attempts} attempts")]
pub struct LayoutGenerationFailed {
    /// Symbol of the ship that could not be placed.
    pub ship: char,
    /// Number of placements tried before giving up.
    pub attempts: usize,
}

/// Error returned when persisted board data cannot be reconstructed.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MalformedBoardData {
    /// The data does not describe a square grid.
    #[error("serialized board holds {len} cells, which is not a perfect square")]
    NotSquare { len: usize },

    /// The data contains a symbol outside the recognized alphabet.
    #[error("unrecognized cell symbol {symbol:?} at offset {offset}")]
    UnrecognizedSymbol { symbol: char, offset: usize },
}
