//! aide-ctl - Drive a PokerAide table from the command line
//!
//! One subcommand per action creator. Each invocation performs exactly one
//! backend request through the store and prints what it dispatched.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use libpokeraide::actions::ActionCreators;
use libpokeraide::api::http::HttpApi;
use libpokeraide::config::Config;
use libpokeraide::store::{
    Action, AppState, Deferred, LoggerMiddleware, Middleware, Outcome, Store,
};
use libpokeraide::types::{
    BalanceForm, CardsForm, Game, GameStatus, Player, PlayerForm, PlayerId,
};
use libpokeraide::{logging, AideError, Result};

#[derive(Parser, Debug)]
#[command(name = "aide-ctl")]
#[command(version)]
#[command(about = "Manage a PokerAide table from the command line")]
#[command(long_about = "\
aide-ctl - Manage a PokerAide table from the command line

DESCRIPTION:
    aide-ctl sends one request to the PokerAide game server and prints the
    result: the game record for start/status, the player list otherwise.

USAGE EXAMPLES:
    # Open a new table
    aide-ctl start

    # Seat a player with 200 chips
    aide-ctl add-player --name hero --balance 200

    # Deal hole cards and move to the flop
    aide-ctl cards 1 Ah Kd
    aide-ctl status flop

    # Machine-readable output
    aide-ctl --format json dealer 1

CONFIGURATION:
    Configuration file: ~/.config/pokeraide/config.toml

    Override with environment variables:
        POKERAIDE_CONFIG    - Path to config file
        POKERAIDE_API_URL   - Base URL of the game server

EXIT CODES:
    0 - Success
    1 - Request or configuration failed
    3 - Invalid input (empty name, card too long, etc.)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the game server
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a new game
    Start,

    /// Seat a new player
    AddPlayer {
        /// Player name
        #[arg(short, long)]
        name: String,

        /// Starting chip balance
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        balance: String,
    },

    /// Remove a player from the table
    RemovePlayer {
        /// Player ID
        id: String,
    },

    /// Set a player's chip balance
    Balance {
        /// Player ID
        id: String,

        /// New balance
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Sit a player out (or back in with --back)
    SitOut {
        /// Player ID
        id: String,

        /// Bring the player back in
        #[arg(long)]
        back: bool,
    },

    /// Move the game to a new status (setup, preflop, flop, turn, river, showdown)
    Status {
        /// New status; the server decides which transitions are legal
        status: String,
    },

    /// Set a player's hole cards; pass "" to clear one
    Cards {
        /// Player ID
        id: String,

        /// First hole card (e.g. Ah)
        hold_1: String,

        /// Second hole card (e.g. Kd)
        hold_2: String,
    },

    /// Give a player the dealer button
    Dealer {
        /// Player ID
        id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Keeps the last reduced descriptor so it can be printed
#[derive(Clone, Default)]
struct Recorder {
    last: Arc<Mutex<Option<Action>>>,
}

impl Recorder {
    fn take(&self) -> Option<Action> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Middleware for Recorder {
    fn after_reduce(&self, action: &Action, _: &AppState, _: &AppState, _: Duration) {
        *self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(action.clone());
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::from_env(cli.verbose).init();

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let api = HttpApi::new(&config.api)?;
    tracing::debug!(base_url = %api.base_url(), "Using game server");

    let creators = ActionCreators::new(Arc::new(api), config.client.sequencing);
    let deferred = build_request(&creators, cli.command)?;

    let recorder = Recorder::default();
    let store = Store::builder()
        .middleware(LoggerMiddleware)
        .middleware(recorder.clone())
        .build()?;

    match store.dispatch(deferred).settled().await {
        Outcome::Applied => {}
        Outcome::Failed(error) => return Err(error.into()),
        other => {
            return Err(AideError::Runtime(format!(
                "Request did not complete: {:?}",
                other
            )))
        }
    }

    let action = recorder
        .take()
        .ok_or_else(|| AideError::Runtime("Request completed without a result".to_string()))?;

    match cli.format {
        OutputFormat::Json => output_json(&action)?,
        OutputFormat::Text => output_text(&action),
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.api.timeout_secs = Some(secs);
    }
    Ok(config)
}

/// Validate the command's input and turn it into deferred work
///
/// Arguments arrive as plain strings so that every malformed value is an
/// `InvalidInput` error (exit code 3) rather than a usage error from clap.
fn build_request(creators: &ActionCreators, command: Commands) -> Result<Deferred> {
    let deferred = match command {
        Commands::Start => creators.start_game(),
        Commands::AddPlayer { name, balance } => {
            creators.add_player(PlayerForm::new(&name, parse_amount(&balance)?)?)
        }
        Commands::RemovePlayer { id } => creators.remove_player(id.parse()?),
        Commands::Balance { id, amount } => {
            creators.set_balance(BalanceForm::new(id.parse()?, parse_amount(&amount)?))
        }
        Commands::SitOut { id, back } => creators.set_sit_out(id.parse()?, !back),
        Commands::Status { status } => creators.set_status(status.parse::<GameStatus>()?),
        Commands::Cards { id, hold_1, hold_2 } => {
            let id: PlayerId = id.parse()?;
            creators.set_cards(id, CardsForm::new(&hold_1, &hold_2)?)
        }
        Commands::Dealer { id } => creators.set_dealer(id.parse()?),
    };
    Ok(deferred)
}

fn parse_amount(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| AideError::InvalidInput(format!("'{}' is not a chip amount", value)))
}

fn output_json(action: &Action) -> Result<()> {
    let json = serde_json::to_string_pretty(action)
        .map_err(|e| AideError::Runtime(format!("Failed to serialize result: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn output_text(action: &Action) {
    match action {
        Action::SetGame { game } => print_game(game),
        Action::SetPlayers { players } => print_players(players),
        other => println!("{}", other.kind()),
    }
}

fn print_game(game: &Game) {
    println!(
        "game {} | {} | {} player{}",
        game.id,
        game.status,
        game.players.len(),
        if game.players.len() == 1 { "" } else { "s" }
    );
    print_players(&game.players);
}

fn print_players(players: &[Player]) {
    for player in players {
        println!("{}", player_line(player));
    }
}

fn player_line(player: &Player) -> String {
    let mut flags = Vec::new();
    if player.dealer {
        flags.push("dealer");
    }
    if player.sit_out {
        flags.push("sitting out");
    }

    let cards = match (&player.hold_1, &player.hold_2) {
        (None, None) => "-".to_string(),
        (a, b) => format!(
            "{} {}",
            a.as_deref().unwrap_or("?"),
            b.as_deref().unwrap_or("?")
        ),
    };

    format!(
        "{} | {} | {} | {} | {}",
        player.id,
        player.name,
        player.balance,
        cards,
        flags.join(", ")
    )
    .trim_end_matches(" | ")
    .to_string()
}
