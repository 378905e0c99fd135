//! Client for the ledger gateway.
//!
//! The gateway owns transaction signing, submission, and polling; this
//! client only encodes the four game operations and their wire form,
//! newline-delimited JSON request/response over TCP. Commitments and reveal
//! pairs cross the boundary as hex digests and letter/digit coordinates.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use commitboard::{
    board::{Commitment, Reveal},
    view::GameRecord,
};

/// The game operations the ledger accepts.
pub trait LedgerClient {
    /// Fetch every game the ledger knows about.
    fn list_games(&self) -> Result<Vec<GameRecord>>;

    /// Create a game with the given ship tokens.
    fn create(&self, player: &str, name: &str, ships: &[String]) -> Result<String>;

    /// Join a game, publishing the hashed board.
    fn join(&self, player: &str, name: &str, board: &Commitment) -> Result<String>;

    /// Fire at a cell, optionally disclosing the reveal pair for the
    /// previously fired-upon cell.
    fn fire(
        &self,
        player: &str,
        name: &str,
        row: &str,
        column: &str,
        reveal: Option<&Reveal>,
    ) -> Result<String>;
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Request<'a> {
    ListGames,
    Create {
        player: &'a str,
        name: &'a str,
        ships: &'a [String],
    },
    Join {
        player: &'a str,
        name: &'a str,
        board: &'a Commitment,
    },
    Fire {
        player: &'a str,
        name: &'a str,
        row: &'a str,
        column: &'a str,
        reveal_space: Option<String>,
        reveal_nonce: Option<&'a str>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Response {
    Games { games: Vec<GameRecord> },
    Accepted { message: String },
    Rejected { message: String },
}

/// [`LedgerClient`] speaking to a TCP gateway, one connection per call. The
/// gateway's own retry and timeout policy applies beyond that point.
pub struct TcpLedgerClient {
    addr: String,
}

impl TcpLedgerClient {
    pub fn new(addr: String) -> Self {
        Self { addr }
    }

    fn call(&self, request: &Request) -> Result<Response> {
        let mut stream = TcpStream::connect(&self.addr)
            .with_context(|| format!("could not reach ledger gateway at {}", self.addr))?;
        let line = serde_json::to_string(request)?;
        debug!(request = %line, "ledger call");
        writeln!(stream, "{}", line)?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .context("ledger gateway closed the connection")?;
        debug!(response = %line.trim_end(), "ledger reply");
        serde_json::from_str(&line).context("malformed reply from ledger gateway")
    }

    fn submit(&self, request: &Request) -> Result<String> {
        match self.call(request)? {
            Response::Accepted { message } => Ok(message),
            Response::Rejected { message } => bail!("ledger rejected the transaction: {}", message),
            Response::Games { .. } => bail!("unexpected reply from ledger gateway"),
        }
    }
}

impl LedgerClient for TcpLedgerClient {
    fn list_games(&self) -> Result<Vec<GameRecord>> {
        match self.call(&Request::ListGames)? {
            Response::Games { games } => Ok(games),
            Response::Rejected { message } => bail!("ledger rejected the query: {}", message),
            Response::Accepted { .. } => bail!("unexpected reply from ledger gateway"),
        }
    }

    fn create(&self, player: &str, name: &str, ships: &[String]) -> Result<String> {
        self.submit(&Request::Create {
            player,
            name,
            ships,
        })
    }

    fn join(&self, player: &str, name: &str, board: &Commitment) -> Result<String> {
        self.submit(&Request::Join {
            player,
            name,
            board,
        })
    }

    fn fire(
        &self,
        player: &str,
        name: &str,
        row: &str,
        column: &str,
        reveal: Option<&Reveal>,
    ) -> Result<String> {
        self.submit(&Request::Fire {
            player,
            name,
            row,
            column,
            reveal_space: reveal.map(|reveal| reveal.space.to_string()),
            reveal_nonce: reveal.map(|reveal| reveal.nonce.as_str()),
        })
    }
}
