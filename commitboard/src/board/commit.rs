//! Nonce grids, hashed commitments, and reveal pairs.

use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::board::Coordinate;

/// Number of random bytes behind each cell nonce. The hashed symbol alphabet
/// is tiny, so the salt is what makes commitments resistant to dictionary
/// attacks.
const NONCE_BYTES: usize = 16;

/// Compute the commitment digest for one cell: SHA-256 over the cell symbol
/// followed by its nonce, hex encoded.
///
/// The encoding is byte-stable across processes. The same digest is
/// recomputed at join time for resubmission and by the opponent when checking
/// a reveal, so it must never vary for fixed inputs.
pub fn commit_space(space: char, nonce: &str) -> String {
    let mut buf = [0u8; 4];
    let mut hasher = Sha256::new();
    hasher.update(space.encode_utf8(&mut buf).as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

/// Per-cell random salts for one board.
///
/// Generated once when the layout is created and persisted alongside it for
/// the life of the game. Regenerating nonces for an existing layout would
/// invalidate every previously published commitment.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonceGrid(Vec<Vec<String>>);

impl NonceGrid {
    /// Fill a `size`×`size` grid with independent salts from the thread-local
    /// CSPRNG.
    pub fn generate(size: usize) -> Self {
        Self::generate_with(size, &mut thread_rng())
    }

    /// Fill a `size`×`size` grid with salts drawn from `rng`. The source must
    /// be unpredictable for the commitments to hide anything.
    pub fn generate_with<R: Rng>(size: usize, rng: &mut R) -> Self {
        Self(
            (0..size)
                .map(|_| {
                    (0..size)
                        .map(|_| {
                            let mut bytes = [0u8; NONCE_BYTES];
                            rng.fill(&mut bytes[..]);
                            hex::encode(bytes)
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// Board dimension this grid was generated for.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// The salt for one cell. Panics if the coordinate is out of bounds.
    pub fn get(&self, coord: Coordinate) -> &str {
        &self.0[coord.row][coord.col]
    }
}

/// The hashed, publishable view of a layout: one hex digest per cell.
/// Submitted to the ledger at join time and immutable afterward.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commitment(Vec<Vec<String>>);

impl Commitment {
    pub(crate) fn new(digests: Vec<Vec<String>>) -> Self {
        Self(digests)
    }

    /// Board dimension this commitment covers.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// The digest committed for one cell. Panics if the coordinate is out of
    /// bounds.
    pub fn get(&self, coord: Coordinate) -> &str {
        &self.0[coord.row][coord.col]
    }

    /// Iterate the digest rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.0.iter().map(|row| row.as_slice())
    }

    /// Check a reveal pair against the digest committed for `coord`. This is
    /// the verification the opponent and ledger run on every shot.
    pub fn matches(&self, coord: Coordinate, reveal: &Reveal) -> bool {
        commit_space(reveal.space, &reveal.nonce) == self.get(coord)
    }
}

/// The disclosure for a single previously fired-upon cell: its true content
/// and the salt that was mixed into the commitment. Revealing one pair
/// confirms hit or miss without exposing the rest of the board.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reveal {
    /// The cell's symbol: the empty marker or a ship id.
    pub space: char,
    /// The salt generated for the cell at layout creation.
    pub nonce: String,
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn nonces_are_hex_of_expected_width() {
        let nonces = NonceGrid::generate(3);
        assert_eq!(nonces.size(), 3);
        for row in 0..3 {
            for col in 0..3 {
                let nonce = nonces.get(Coordinate::new(row, col));
                assert_eq!(nonce.len(), NONCE_BYTES * 2);
                assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = NonceGrid::generate_with(4, &mut StdRng::seed_from_u64(11));
        let b = NonceGrid::generate_with(4, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn commit_space_is_deterministic_and_salted() {
        let digest = commit_space('A', "00ff");
        assert_eq!(digest, commit_space('A', "00ff"));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, commit_space('A', "00fe"));
        assert_ne!(digest, commit_space('B', "00ff"));
    }

    #[test]
    fn nonce_grid_survives_json_round_trip() {
        let nonces = NonceGrid::generate_with(2, &mut StdRng::seed_from_u64(3));
        let json = serde_json::to_string(&nonces).unwrap();
        let back: NonceGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(nonces, back);
    }
}
