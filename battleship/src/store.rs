//! Local persistence for secret boards and their nonces.
//!
//! One JSON file per (player alias, game name) under an explicit storage
//! root. The file is written exactly once, when the board is first
//! generated: the commitment posted at join time can only be reproduced from
//! that exact layout and nonce grid, so the record is never rewritten.

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use commitboard::{
    board::{BoardLayout, NonceGrid},
    ships::ShipSpec,
};

/// The persisted record for one secret board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBoard {
    /// Serialized cell grid, as produced by `BoardLayout::serialize`.
    pub spaces: String,
    /// The salts generated alongside the layout.
    pub nonces: NonceGrid,
}

/// Stores secret boards under an explicit root directory, keyed by player
/// alias and game name.
pub struct BoardStore {
    root: PathBuf,
}

impl BoardStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path(&self, alias: &str, game: &str) -> PathBuf {
        self.root.join(format!("{}-{}.json", alias, game))
    }

    /// Load the stored board for `(alias, game)`, or `None` if no board has
    /// been generated yet.
    pub fn load(&self, alias: &str, game: &str) -> Result<Option<StoredBoard>> {
        let path = self.path(alias, game);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("could not read {}", path.display()))
            }
        };
        let stored = serde_json::from_str(&data)
            .with_context(|| format!("corrupt board file {}", path.display()))?;
        Ok(Some(stored))
    }

    /// Load the stored board, generating and persisting a fresh layout and
    /// nonce grid on first use.
    pub fn load_or_generate(
        &self,
        alias: &str,
        game: &str,
        ships: &ShipSpec,
    ) -> Result<StoredBoard> {
        if let Some(stored) = self.load(alias, game)? {
            return Ok(stored);
        }
        let layout = BoardLayout::generate(ships)?;
        let stored = StoredBoard {
            spaces: layout.serialize(),
            nonces: NonceGrid::generate(layout.size()),
        };
        self.save_new(alias, game, &stored)?;
        Ok(stored)
    }

    /// Persist a new board. Fails if a board already exists under the key;
    /// replacing one would orphan the commitment already posted to the
    /// ledger.
    pub fn save_new(&self, alias: &str, game: &str, stored: &StoredBoard) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("could not create {}", self.root.display()))?;
        let path = self.path(alias, game);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("could not create {}", path.display()))?;
        serde_json::to_writer_pretty(file, stored)
            .with_context(|| format!("could not write {}", path.display()))?;
        debug!(path = %path.display(), "stored new secret board");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn spec() -> ShipSpec {
        ShipSpec::parse(&["AA", "B"], 10).unwrap()
    }

    #[test]
    fn missing_board_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = BoardStore::new(dir.path().to_owned());
        assert!(store.load("alice", "mygame").unwrap().is_none());
    }

    #[test]
    fn generates_once_and_reloads_identically() {
        let dir = TempDir::new().unwrap();
        let store = BoardStore::new(dir.path().to_owned());
        let first = store.load_or_generate("alice", "mygame", &spec()).unwrap();
        let second = store.load_or_generate("alice", "mygame", &spec()).unwrap();
        assert_eq!(first.spaces, second.spaces);
        assert_eq!(first.nonces, second.nonces);

        // The commitment recomputed at a re-join must match byte for byte.
        let layout = BoardLayout::deserialize(&first.spaces).unwrap();
        assert_eq!(
            layout.render_hashed(&first.nonces),
            layout.render_hashed(&second.nonces)
        );
    }

    #[test]
    fn existing_board_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = BoardStore::new(dir.path().to_owned());
        let stored = store.load_or_generate("alice", "mygame", &spec()).unwrap();
        let err = store.save_new("alice", "mygame", &stored).unwrap_err();
        assert!(err.to_string().contains("could not create"));
        // The original record is intact.
        let reloaded = store.load("alice", "mygame").unwrap().unwrap();
        assert_eq!(reloaded.spaces, stored.spaces);
    }

    #[test]
    fn boards_are_keyed_by_alias_and_game() {
        let dir = TempDir::new().unwrap();
        let store = BoardStore::new(dir.path().to_owned());
        store.load_or_generate("alice", "mygame", &spec()).unwrap();
        assert!(store.load("bob", "mygame").unwrap().is_none());
        assert!(store.load("alice", "other").unwrap().is_none());
    }
}
