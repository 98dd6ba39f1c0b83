//! Words on Stream solver - CLI
//!
//! Plays a live game with browser bots, or looks up and replays words offline.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wos_solver::{
    commands::{RunConfig, load_frames, prompt, run_live, run_replay, unscramble},
    config::{GAME_SOCKET_PREFIX, GameConfig},
    output::{print_replay_summary, print_status, print_unscramble_result},
    webdriver::{ChromeOptions, WindowSize},
    wordsource::{FixedWords, WordFinderApi, WordSource, api},
};

#[derive(Parser)]
#[command(
    name = "wos_solver",
    about = "Words on Stream solver driving a pool of browser bots",
    version,
    author,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Join a live game and play it (default)
    Run(RunArgs),

    /// Look up the words for a set of letters
    Unscramble {
        /// Letters to unscramble, `?` for hidden ones
        letters: String,

        /// Word finder endpoint
        #[arg(long, env = "WOS_WORDFINDER_URL", default_value = api::DEFAULT_URL)]
        wordfinder_url: String,
    },

    /// Feed captured websocket frames through the dispatcher
    Replay {
        /// Capture file, one frame per line
        file: PathBuf,

        /// Number of simulated bots
        #[arg(short = 'n', long, default_value = "1")]
        workers: usize,

        /// Answer every lookup with these words instead of asking the word finder
        #[arg(long, value_delimiter = ',')]
        words: Option<Vec<String>>,

        /// Word finder endpoint
        #[arg(long, env = "WOS_WORDFINDER_URL", default_value = api::DEFAULT_URL)]
        wordfinder_url: String,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Game code from the streamer's url (asked for if missing)
    #[arg(short, long)]
    game_code: Option<String>,

    /// Firefox profile directory, once per bot
    #[arg(short = 'p', long = "firefox-profile")]
    firefox_profiles: Vec<PathBuf>,

    /// Chromedriver endpoint for the websocket listener
    #[arg(long, env = "WOS_CHROMEDRIVER_URL", default_value = "http://localhost:9515")]
    chromedriver_url: String,

    /// Geckodriver host; bot N uses port `geckodriver-port + N`
    #[arg(long, env = "WOS_GECKODRIVER_URL", default_value = "http://localhost")]
    geckodriver_host: String,

    /// First geckodriver port
    #[arg(long, default_value = "4444")]
    geckodriver_port: u16,

    /// Chrome user data directory holding the logged-in profile
    #[arg(long)]
    chrome_user_data_dir: Option<PathBuf>,

    /// Chrome profile directory name
    #[arg(long, default_value = "Default")]
    chrome_profile: String,

    /// Run the listener browser headless
    #[arg(long)]
    headless_listener: bool,

    /// Run the bot browsers headless
    #[arg(long)]
    headless_bots: bool,

    #[arg(long, default_value = "1920")]
    window_width: u32,

    #[arg(long, default_value = "1080")]
    window_height: u32,

    /// Word finder endpoint
    #[arg(long, env = "WOS_WORDFINDER_URL", default_value = api::DEFAULT_URL)]
    wordfinder_url: String,

    /// Skip the login reminder
    #[arg(short, long)]
    yes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Default to a live run if no command given
    let command = cli.command.unwrap_or(Commands::Run(cli.run));

    match command {
        Commands::Run(args) => run_command(args),
        Commands::Unscramble {
            letters,
            wordfinder_url,
        } => unscramble_command(&letters, &wordfinder_url),
        Commands::Replay {
            file,
            workers,
            words,
            wordfinder_url,
        } => match words {
            Some(words) => replay_command(&file, workers, FixedWords::new(words)),
            None => replay_command(&file, workers, WordFinderApi::new(wordfinder_url)?),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_command(args: RunArgs) -> Result<()> {
    let code = match args.game_code {
        Some(code) => code,
        None => prompt("Game code: ").context("reading game code")?,
    };
    if code.trim().is_empty() {
        bail!("a game code is required");
    }
    if args.firefox_profiles.is_empty() {
        println!("No --firefox-profile given, only watching the game");
    }

    if !args.yes {
        println!("Make sure every Chrome and Firefox profile is logged in to Words on Stream.");
        prompt("Press Enter to start...").context("waiting for confirmation")?;
    }

    let window = WindowSize {
        width: args.window_width,
        height: args.window_height,
    };
    let config = RunConfig {
        game: GameConfig::for_code(&code),
        chromedriver_url: args.chromedriver_url,
        chrome: ChromeOptions {
            user_data_dir: args.chrome_user_data_dir,
            profile_directory: args.chrome_profile,
            headless: args.headless_listener,
        },
        geckodriver_host: args.geckodriver_host,
        geckodriver_port: args.geckodriver_port,
        firefox_profiles: args.firefox_profiles,
        headless_bots: args.headless_bots,
        window,
        wordfinder_url: args.wordfinder_url,
    };

    run_live(&config, print_status)
}

fn unscramble_command(letters: &str, wordfinder_url: &str) -> Result<()> {
    let source = WordFinderApi::new(wordfinder_url)?;
    let result = unscramble(&source, letters).context("looking up words")?;
    print_unscramble_result(&result.letters, result.wordlist.words());
    Ok(())
}

fn replay_command<S: WordSource>(file: &Path, workers: usize, source: S) -> Result<()> {
    let frames = load_frames(file, GAME_SOCKET_PREFIX)
        .with_context(|| format!("loading capture {}", file.display()))?;

    let summary = run_replay(source, &frames, workers, GAME_SOCKET_PREFIX, |status| {
        print_status(status, workers);
    });
    print_replay_summary(&summary);
    Ok(())
}
