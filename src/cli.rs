use std::io;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::GuessConfig;
use crate::display::{describe_node, print_error, print_section};
use crate::error::GuessResult;
use crate::explore::{describe_path, find_paths, ExploreLimits};
use crate::node::NodeId;
use crate::oracle::{HttpOracle, Oracle};
use crate::play::run_interactive_session;
use crate::session::create_session;

#[derive(Parser)]
#[command(name = "guess", version = "1.0.0", about = "Guessing game client \u{2014} answer the oracle's questions until it names your character.")]
struct Cli {
    /// Oracle base URL (overrides the config file)
    #[arg(long = "oracle", env = "GUESS_ORACLE_URL", global = true)]
    oracle_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Retries for transient oracle failures
    #[arg(long, global = true)]
    retries: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game against the oracle
    Play,
    /// List every answer path that ends in a given guess
    Paths {
        /// Guess to search for (e.g., "Kakashi HATAKE")
        name: String,
        /// Give up below this many questions
        #[arg(long)]
        max_depth: Option<usize>,
        /// Give up after fetching this many nodes
        #[arg(long)]
        max_nodes: Option<usize>,
    },
    /// Fetch one node and show its fields
    Show {
        /// Node id; omit for the root
        id: Option<String>,
    },
}

pub async fn run() {
    let cli = Cli::parse();
    dispatch(cli).await;
}

async fn dispatch(cli: Cli) {
    if let Err(err) = try_dispatch(cli).await {
        print_error(&err.to_string());
        process::exit(1);
    }
}

async fn try_dispatch(cli: Cli) -> GuessResult<()> {
    let config = GuessConfig::load()?;

    let url = cli.oracle_url.as_deref().unwrap_or_else(|| config.oracle_url());
    let timeout = cli.timeout.map(Duration::from_secs).unwrap_or_else(|| config.timeout());
    let mut retry = config.retry();
    if let Some(retries) = cli.retries {
        retry.max_retries = retries;
    }
    let oracle = HttpOracle::new(url, timeout, retry)?;
    tracing::debug!(url = %oracle.base_url(), ?timeout, "Oracle configured");

    match cli.command {
        Commands::Play => cmd_play(oracle).await,
        Commands::Paths {
            name,
            max_depth,
            max_nodes,
        } => {
            let mut limits = config.explore_limits();
            if let Some(depth) = max_depth {
                limits.max_depth = depth;
            }
            if let Some(nodes) = max_nodes {
                limits.max_nodes = nodes;
            }
            cmd_paths(&oracle, &name, limits).await?;
        }
        Commands::Show { id } => cmd_show(&oracle, id).await?,
    }
    Ok(())
}

async fn cmd_play(oracle: HttpOracle) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    let mut session = create_session(oracle);
    run_interactive_session(&mut session, &mut reader, &mut writer).await;
}

async fn cmd_paths(oracle: &HttpOracle, name: &str, limits: ExploreLimits) -> GuessResult<()> {
    let paths = find_paths(oracle, name, limits).await?;
    if paths.is_empty() {
        println!("No path found for {}.", name.bold());
        return Ok(());
    }
    for (idx, path) in paths.iter().enumerate() {
        print_section(&format!("Path {}:", idx + 1), &describe_path(path));
    }
    Ok(())
}

async fn cmd_show(oracle: &HttpOracle, id: Option<String>) -> GuessResult<()> {
    let node = match id {
        Some(id) => oracle.node(&NodeId::new(id)).await?,
        None => oracle.root().await?,
    };
    println!("{}", describe_node(&node));
    Ok(())
}
