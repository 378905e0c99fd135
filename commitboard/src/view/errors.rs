//! Errors from resolving a ledger record against a viewer identity.

use thiserror::Error;

/// Why a view could not be resolved. Both cases are local consistency
/// failures, surfaced to the caller rather than retried.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ViewError {
    /// The viewer's public identity matches neither player slot.
    #[error("player {viewer:?} has not joined game {game:?}")]
    NotAParticipant { viewer: String, game: String },

    /// The record combines a state marker and shot coordinate that should
    /// never coexist, which indicates a ledger/client desync.
    #[error("game {game:?} reports state {state:?} with last fire {row:?}/{column:?}")]
    AmbiguousGameState {
        game: String,
        state: String,
        row: Option<String>,
        column: Option<String>,
    },
}
