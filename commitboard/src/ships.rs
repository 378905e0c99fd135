//! Parsing and validation of ship specifications.
//!
//! A game's ships travel as a list of letter-coded tokens such as
//! `["AAAAA", "BBBB", "CCC", "DD", "DD", "SSS", "SSS"]`: every character of a
//! token is the ship's symbol and the token length is the number of cells the
//! ship occupies.

use thiserror::Error;

/// A single ship: its board symbol and the number of cells it occupies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ship {
    id: char,
    length: usize,
}

impl Ship {
    /// The symbol that marks this ship's cells on the board.
    pub fn id(&self) -> char {
        self.id
    }

    /// Number of contiguous cells this ship occupies.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// An ordered, validated set of ships for one game. Immutable once parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShipSpec {
    ships: Vec<Ship>,
}

impl ShipSpec {
    /// Parse ship tokens for a `size`×`size` board.
    ///
    /// Each token must be non-empty and repeat a single ASCII alphanumeric
    /// symbol. The combined cell count of all ships must fit on the board.
    pub fn parse<S: AsRef<str>>(tokens: &[S], size: usize) -> Result<Self, InvalidShipSpec> {
        let mut ships = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let mut chars = token.chars();
            let id = match chars.next() {
                Some(id) => id,
                None => return Err(InvalidShipSpec::EmptyToken { index }),
            };
            if !id.is_ascii_alphanumeric() {
                return Err(InvalidShipSpec::InvalidSymbol {
                    token: token.to_owned(),
                    symbol: id,
                });
            }
            if chars.any(|c| c != id) {
                return Err(InvalidShipSpec::MixedSymbols {
                    token: token.to_owned(),
                });
            }
            ships.push(Ship {
                id,
                length: token.chars().count(),
            });
        }

        let cells: usize = ships.iter().map(|ship| ship.length).sum();
        let capacity = size * size;
        if cells > capacity {
            return Err(InvalidShipSpec::ExceedsCapacity {
                cells,
                size,
                capacity,
            });
        }

        Ok(Self { ships })
    }

    /// Iterate the ships in their declared order.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    /// Number of ships in the spec.
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Returns true if the spec contains no ships.
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Total number of board cells occupied by all ships.
    pub fn total_cells(&self) -> usize {
        self.ships.iter().map(|ship| ship.length).sum()
    }
}

/// Error returned when a list of ship tokens fails validation.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum InvalidShipSpec {
    /// A token in the list was the empty string.
    #[error("ship token at position {index} is empty")]
    EmptyToken { index: usize },

    /// A token mixed more than one symbol.
    #[error("ship token {token:?} mixes more than one symbol")]
    MixedSymbols { token: String },

    /// A token used a symbol outside the recognized alphabet.
    #[error("ship token {token:?} uses unsupported symbol {symbol:?}")]
    InvalidSymbol { token: String, symbol: char },

    /// The ships together occupy more cells than the board has.
    #[error("ships occupy {cells} cells but a {size}x{size} board holds only {capacity}")]
    ExceedsCapacity {
        cells: usize,
        size: usize,
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_SHIPS: &[&str] = &["AAAAA", "BBBB", "CCC", "DD", "DD", "SSS", "SSS"];

    #[test]
    fn parses_default_ship_set() {
        let spec = ShipSpec::parse(DEFAULT_SHIPS, 10).unwrap();
        assert_eq!(spec.len(), 7);
        assert_eq!(spec.total_cells(), 5 + 4 + 3 + 2 + 2 + 3 + 3);
        let ids: Vec<char> = spec.ships().map(|ship| ship.id()).collect();
        assert_eq!(ids, vec!['A', 'B', 'C', 'D', 'D', 'S', 'S']);
    }

    #[test]
    fn rejects_empty_token() {
        let err = ShipSpec::parse(&["AA", ""], 10).unwrap_err();
        assert_eq!(err, InvalidShipSpec::EmptyToken { index: 1 });
    }

    #[test]
    fn rejects_mixed_symbols() {
        let err = ShipSpec::parse(&["AB"], 10).unwrap_err();
        assert_eq!(
            err,
            InvalidShipSpec::MixedSymbols {
                token: "AB".to_owned()
            }
        );
    }

    #[test]
    fn rejects_non_alphanumeric_symbol() {
        let err = ShipSpec::parse(&["--"], 10).unwrap_err();
        assert_eq!(
            err,
            InvalidShipSpec::InvalidSymbol {
                token: "--".to_owned(),
                symbol: '-'
            }
        );
    }

    #[test]
    fn rejects_spec_larger_than_board() {
        let err = ShipSpec::parse(&["AAA", "BB"], 2).unwrap_err();
        assert_eq!(
            err,
            InvalidShipSpec::ExceedsCapacity {
                cells: 5,
                size: 2,
                capacity: 4
            }
        );
    }

    #[test]
    fn duplicate_symbols_are_allowed() {
        // The default set carries two destroyers and two submarines.
        let spec = ShipSpec::parse(&["DD", "DD"], 4).unwrap();
        assert_eq!(spec.len(), 2);
    }
}
