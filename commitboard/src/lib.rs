//! Commit-reveal board protocol for battleship games recorded on a replicated
//! ledger.
//!
//! The ledger acts as a trusted scorekeeper that must never learn either
//! player's layout ahead of time. Each player commits to their board at join
//! time by publishing a per-cell salted hash grid, then discloses exactly one
//! `(cell, nonce)` pair per shot so the opponent can check it against the
//! prior commitment.
//!
//! This crate covers the pieces that require cryptographic and
//! state-consistency reasoning: ship spec parsing, layout generation, the
//! nonce and commitment grids, reveal pairs, and the resolver that decides
//! which board shows a shot still awaiting its reveal. Transport to the
//! ledger, signing, and terminal rendering live with the consuming client.

pub mod board;
pub mod ships;
pub mod view;
