use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use ethers::types::Address;
use op_proposal_driver::{
    Driver, DriverConfig, DriverHandle, GameDriver, Request, Response, WorldConfig,
};
use op_proposal_game::proposal::ProposalGame;
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::Level;

/// Arguments for the `op-proposal` binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count, env = "VERBOSITY")]
    v: u8,

    /// Path to the JSON world configuration.
    #[arg(
        long,
        short,
        help = "Path to the JSON world configuration (game parameters, registry, verifiers).",
        env = "OP_PROPOSAL_PARAMS"
    )]
    config: PathBuf,

    /// Path to the JSON scenario.
    #[arg(
        long,
        short,
        help = "Path to a JSON array of requests to run against the games.",
        env = "OP_PROPOSAL_SCENARIO"
    )]
    scenario: PathBuf,

    /// Overrides the configured TEE proposer.
    #[arg(
        long,
        short,
        help = "Overrides the account allowed to submit TEE proofs.",
        env = "OP_PROPOSAL_TEE_PROPOSER"
    )]
    tee_proposer: Option<Address>,
}

/// The final report printed once the scenario has run.
#[derive(Serialize, Debug)]
struct Report {
    /// Indices of the scenario steps that were rejected.
    failed_steps: Vec<usize>,
    /// Every game created, in factory order.
    games: Vec<ProposalGame>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command arguments
    let Args {
        v,
        config,
        scenario,
        tee_proposer,
    } = Args::parse();

    // Initialize the tracing subscriber
    init_tracing_subscriber(v)?;

    // Load the world and the scenario.
    let mut world: WorldConfig = read_json(&config)?;
    if let Some(tee_proposer) = tee_proposer {
        world.params.tee_proposer = tee_proposer;
    }
    let steps: Vec<Request> = read_json(&scenario)?;
    tracing::info!(target: "op-proposal-cli", "Loaded world config and {} scenario steps.", steps.len());

    // Create the driver config and start the driver loop.
    let driver_config = Arc::new(DriverConfig::new(world));
    let handle = DriverHandle::from(driver_config.as_ref());
    let driver = tokio::spawn(GameDriver::new(Arc::clone(&driver_config)).start_loop());
    tracing::debug!(target: "op-proposal-cli", "Game driver spawned.");

    let mut failed_steps = Vec::new();
    for (i, step) in steps.into_iter().enumerate() {
        match handle.request(step).await {
            Ok(response) => {
                tracing::info!(target: "op-proposal-cli", "Step {}: {:?}", i, response);
            }
            Err(e) => {
                // Soft failure, log the error and continue.
                tracing::error!(target: "op-proposal-cli", "Step {} rejected: {}", i, e);
                failed_steps.push(i);
            }
        }
    }

    let games = collect_games(&handle).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&Report {
            failed_steps,
            games
        })?
    );

    handle.request(Request::Shutdown).await?;
    driver.await??;

    Ok(())
}

/// Queries games in factory order until the first unknown index.
async fn collect_games(handle: &DriverHandle) -> Result<Vec<ProposalGame>> {
    let mut games = Vec::new();
    loop {
        let game = games.len() as u32;
        match handle.request(Request::Query { game }).await {
            Ok(Response::Game { game }) => games.push(*game),
            Ok(other) => return Err(anyhow!("unexpected response to query: {:?}", other)),
            Err(_) => return Ok(games),
        }
    }
}

/// Reads and deserializes a JSON file.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-4)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match verbosity_level {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
