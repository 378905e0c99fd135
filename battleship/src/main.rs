use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use commitboard::{
    board::{BoardLayout, Coordinate, DEFAULT_SIZE},
    ships::ShipSpec,
    view::{self, GameRecord},
};

use crate::{
    ledger::{LedgerClient, TcpLedgerClient},
    store::BoardStore,
};

mod display;
mod ledger;
mod store;

/// Ship set used when `create` is not given an explicit one.
const DEFAULT_SHIPS: &[&str] = &["AAAAA", "BBBB", "CCC", "DD", "DD", "SSS", "SSS"];

/// Matchers for the wire form of fire coordinates.
static ROW_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]$").unwrap());
static COL_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{1,2}$").unwrap());

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = App::new("battleship")
        .version("0.1.0")
        .about("Command line client for battleship games recorded on a replicated ledger.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("url")
                .short("u")
                .long("url")
                .value_name("ADDR")
                .help("Address of the ledger gateway")
                .takes_value(true)
                .global(true)
                .default_value("127.0.0.1:8008"),
        )
        .arg(
            Arg::with_name("alias")
                .short("a")
                .long("alias")
                .value_name("ALIAS")
                .help("Public identity used for ledger calls and board storage")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("storage-root")
                .short("r")
                .long("storage-root")
                .value_name("DIR")
                .help("Directory holding secret board files")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a new game on the ledger")
                .arg(Arg::with_name("NAME").required(true))
                .arg(
                    Arg::with_name("ships")
                        .short("s")
                        .long("ships")
                        .value_name("SHIP")
                        .help("Ship tokens, one letter-coded token per ship")
                        .takes_value(true)
                        .multiple(true),
                ),
        )
        .subcommand(SubCommand::with_name("list").about("List games recorded on the ledger"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Show a game's boards from this player's point of view")
                .arg(Arg::with_name("NAME").required(true)),
        )
        .subcommand(
            SubCommand::with_name("join")
                .about("Join a game, committing to a generated secret board")
                .arg(Arg::with_name("NAME").required(true)),
        )
        .subcommand(
            SubCommand::with_name("fire")
                .about("Fire at a cell, revealing the previously fired-upon cell")
                .arg(Arg::with_name("NAME").required(true))
                .arg(Arg::with_name("ROW").required(true))
                .arg(Arg::with_name("COL").required(true)),
        )
        .get_matches();

    let config = Config::from_matches(&matches)?;
    match matches.subcommand() {
        ("create", Some(sub)) => cmd_create(&config, sub),
        ("list", Some(_)) => cmd_list(&config),
        ("show", Some(sub)) => cmd_show(&config, sub),
        ("join", Some(sub)) => cmd_join(&config, sub),
        ("fire", Some(sub)) => cmd_fire(&config, sub),
        _ => unreachable!(),
    }
}

/// Explicit configuration shared by every subcommand. Nothing here is read
/// from ambient process state; the storage root and identity always arrive
/// through flags or the platform data directory.
struct Config {
    url: String,
    alias: Option<String>,
    storage_root: PathBuf,
}

impl Config {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let storage_root = match matches.value_of("storage-root") {
            Some(path) => PathBuf::from(path),
            None => directories::ProjectDirs::from("", "", "battleship")
                .map(|dirs| dirs.data_dir().to_owned())
                .ok_or_else(|| {
                    anyhow!("could not determine a data directory; pass --storage-root")
                })?,
        };
        Ok(Self {
            url: matches.value_of("url").expect("url has a default").to_owned(),
            alias: matches.value_of("alias").map(str::to_owned),
            storage_root,
        })
    }

    fn alias(&self) -> Result<&str> {
        self.alias
            .as_deref()
            .context("--alias is required for this command")
    }

    fn client(&self) -> TcpLedgerClient {
        TcpLedgerClient::new(self.url.clone())
    }

    fn store(&self) -> BoardStore {
        BoardStore::new(self.storage_root.clone())
    }
}

fn find_game(client: &TcpLedgerClient, name: &str) -> Result<GameRecord> {
    client
        .list_games()?
        .into_iter()
        .find(|game| game.name == name)
        .with_context(|| format!("no such game: {}", name))
}

fn cmd_create(config: &Config, matches: &ArgMatches) -> Result<()> {
    let name = matches.value_of("NAME").expect("NAME is required");
    let ships: Vec<String> = match matches.values_of("ships") {
        Some(values) => values.map(str::to_owned).collect(),
        None => DEFAULT_SHIPS.iter().map(|ship| (*ship).to_owned()).collect(),
    };
    // Catch a bad spec locally before anything reaches the ledger.
    ShipSpec::parse(&ships, DEFAULT_SIZE)?;

    let response = config.client().create(config.alias()?, name, &ships)?;
    println!("{}", response);
    Ok(())
}

fn cmd_list(config: &Config) -> Result<()> {
    let mut games = config.client().list_games()?;
    games.sort_by(|a, b| a.name.cmp(&b.name));

    println!(
        "{:<15} {:<15.15} {:<15.15} {}",
        "GAME", "PLAYER 1", "PLAYER 2", "STATE"
    );
    for game in &games {
        println!(
            "{:<15} {:<15.15} {:<15.15} {}",
            game.name,
            game.player1.as_deref().unwrap_or(""),
            game.player2.as_deref().unwrap_or(""),
            game.state,
        );
    }
    Ok(())
}

fn cmd_show(config: &Config, matches: &ArgMatches) -> Result<()> {
    let name = matches.value_of("NAME").expect("NAME is required");
    let alias = config.alias()?;
    let client = config.client();
    let game = find_game(&client, name)?;

    println!("GAME     : {}", game.name);
    println!("PLAYER 1 : {}", game.player1.as_deref().unwrap_or(""));
    println!("PLAYER 2 : {}", game.player2.as_deref().unwrap_or(""));
    println!("STATE    : {}", game.state);

    let view = view::resolve(&game, alias)?;

    if let Some(target) = view.target_board(&game) {
        let marker = view.pending.filter(|shot| shot.on_target_board);
        println!();
        println!("  Target Board");
        display::print_target_board(target, marker.map(|shot| shot.coord));
    }

    if let Some(stored) = config.store().load(alias, name)? {
        let layout = BoardLayout::deserialize(&stored.spaces)?;
        let marker = view.pending.filter(|shot| !shot.on_target_board);
        println!();
        println!("  Secret Board");
        display::print_secret_board(&layout, marker.map(|shot| shot.coord));
    }
    Ok(())
}

fn cmd_join(config: &Config, matches: &ArgMatches) -> Result<()> {
    let name = matches.value_of("NAME").expect("NAME is required");
    let alias = config.alias()?;
    let client = config.client();
    let game = find_game(&client, name)?;

    let spec = ShipSpec::parse(&game.ships, DEFAULT_SIZE)?;
    let stored = config.store().load_or_generate(alias, name, &spec)?;
    let layout = BoardLayout::deserialize(&stored.spaces)?;
    let commitment = layout.render_hashed(&stored.nonces);

    let response = client.join(alias, name, &commitment)?;
    println!("{}", response);
    Ok(())
}

fn cmd_fire(config: &Config, matches: &ArgMatches) -> Result<()> {
    let name = matches.value_of("NAME").expect("NAME is required");
    let row = matches.value_of("ROW").expect("ROW is required");
    let col = matches.value_of("COL").expect("COL is required");
    if !ROW_ARG.is_match(row) {
        bail!("invalid row {:?}: expected a single letter like A", row);
    }
    if !COL_ARG.is_match(col) {
        bail!("invalid column {:?}: expected a number like 4", col);
    }

    let alias = config.alias()?;
    let client = config.client();
    let game = find_game(&client, name)?;
    let stored = config
        .store()
        .load(alias, name)?
        .with_context(|| format!("no secret board stored for game {:?}; join it first", name))?;
    let layout = BoardLayout::deserialize(&stored.spaces)?;

    Coordinate::from_wire(row, col)
        .filter(|coord| coord.row < layout.size() && coord.col < layout.size())
        .with_context(|| {
            format!(
                "coordinate {}{} is off the {2}x{2} board",
                row,
                col,
                layout.size()
            )
        })?;

    // Disclose the opponent's previous shot, if there is one to answer.
    let reveal = match game.last_fire()? {
        Some(coord) if layout.get(coord).is_some() => {
            Some(layout.reveal(&stored.nonces, coord))
        }
        Some(coord) => bail!("ledger reports a last fire at {} which is off this board", coord),
        None => None,
    };

    let response = client.fire(alias, name, row, col, reveal.as_ref())?;
    println!("{}", response);
    Ok(())
}
