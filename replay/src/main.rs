//! Replays a recorded game against the rules engine, printing every outcome as a line of JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lunation::builder::{Builder, SquareBoardBuilder};
use lunation::{BoardGraph, GameSession, PlacementRequest, PlacementResponse, SessionConfig};

/// Replay a game from a move list.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board layout as JSON; a 5x5 square grid if not given
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Move list as JSON
    #[arg(short, long)]
    moves: PathBuf,

    /// Session config as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the board after every move
    #[arg(short, long)]
    render: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Control {
    Undo,
    Redo,
    Reset,
}

/// One entry of a move list: either a placement or a history action.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
enum Move {
    Control {
        action: Control,
    },
    // fields stay optional so that a malformed entry is reported by the session rather than the parser
    Place {
        player: Option<u8>,
        node: Option<String>,
        value: Option<u8>,
    },
}

fn parse_moves(json: &str) -> anyhow::Result<Vec<Move>> {
    serde_json::from_str(json).context("move list is not a JSON array of moves")
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn load_board(path: Option<&Path>) -> anyhow::Result<BoardGraph> {
    match path {
        Some(path) => BoardGraph::from_json(&read(path)?)
            .with_context(|| format!("failed to load board from {}", path.display())),
        None => SquareBoardBuilder::default()
            .build()
            .map_err(|reasons| anyhow!("default board is invalid: {reasons:?}")),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => serde_json::from_str(&read(path)?)
            .with_context(|| format!("failed to parse config from {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn play(session: &mut GameSession, step: Move) -> anyhow::Result<String> {
    let line = match step {
        Move::Place { player, node, value } => {
            let request = PlacementRequest { player, node_name: node, value };
            serde_json::to_string(&PlacementResponse::from(session.place_request(&request)))?
        }
        Move::Control { action } => {
            let result = match action {
                Control::Undo => session.undo(),
                Control::Redo => session.redo(),
                Control::Reset => Ok(session.reset()),
            };
            match result {
                Ok(state) => json!({ "success": true, "state": state }).to_string(),
                Err(e) => {
                    warn!(?action, error = %e, "history action refused");
                    json!({ "success": false, "error": e.to_string() }).to_string()
                }
            }
        }
    };

    Ok(line)
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lunation=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    initialize_tracing();
    let args = Args::parse();

    let board = load_board(args.board.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let moves = parse_moves(&read(&args.moves)?)?;
    info!(cells = board.len(), moves = moves.len(), "replaying");

    let mut session = GameSession::new(board, config);
    if args.render {
        print!("{}", session.board());
    }

    for step in moves {
        println!("{}", play(&mut session, step)?);
        if args.render {
            print!("{}", session.board());
        }
    }

    println!("{}", serde_json::to_string(&session.finalize_scores())?);
    Ok(())
}
