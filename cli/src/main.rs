mod commands;

use clap::{Parser, Subcommand};
use tictactoe_engine::config::ConfigManager;
use tictactoe_engine::logger::{self, LogLevel};
use tictactoe_engine::{AIEngine, EngineConfig, log};

const DEFAULT_CONFIG_FILE: &str = "tictactoe_engine.yaml";

#[derive(Parser)]
#[command(name = "tictactoe", about = "Tic-tac-toe search engine front end")]
struct Args {
    /// Engine config file; defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    #[arg(long)]
    use_log_prefix: bool,

    /// Also log cache hits and search statistics.
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Pick a move for the side to move.
    Move {
        /// Rows separated by '/', e.g. "XX./OO./..."
        board: String,
        #[arg(long, default_value = "medium")]
        difficulty: String,
        /// X or O; inferred from the mark counts when omitted.
        #[arg(long)]
        player: Option<char>,
        #[arg(long, default_value_t = 3)]
        win_count: usize,
        #[arg(long)]
        time_ms: Option<u64>,
    },
    /// Static evaluation with threats and opportunities.
    Analyze {
        board: String,
        #[arg(long)]
        player: Option<char>,
        #[arg(long, default_value_t = 3)]
        win_count: usize,
    },
    /// Strongest move with an explanation.
    Hint {
        board: String,
        #[arg(long)]
        player: Option<char>,
        #[arg(long, default_value_t = 3)]
        win_count: usize,
    },
    /// Engine against engine.
    SelfPlay {
        #[arg(long, default_value = "impossible")]
        x: String,
        #[arg(long, default_value = "easy")]
        o: String,
        #[arg(long, default_value_t = 3)]
        size: usize,
        #[arg(long, default_value_t = 3)]
        win_count: usize,
        #[arg(long, default_value_t = 10)]
        games: usize,
    },
    /// Review a finished game given as "row,col" moves, X first.
    AnalyzeGame {
        moves: Vec<String>,
        #[arg(long, default_value_t = 3)]
        size: usize,
        #[arg(long, default_value_t = 3)]
        win_count: usize,
    },
    /// Write the default config to the config path.
    InitConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Engine".to_string())
    } else {
        None
    };
    let level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logger::init_logger(prefix, level);

    let manager: ConfigManager<_, EngineConfig, _> = ConfigManager::from_yaml_file(&args.config);

    if let Command::InitConfig = args.command {
        manager.set_config(&EngineConfig::default())?;
        log!("Default config written to {}", args.config);
        return Ok(());
    }

    let config = manager.get_config()?;
    let mut engine = AIEngine::from_config(&config)?;

    let output = match args.command {
        Command::Move {
            board,
            difficulty,
            player,
            win_count,
            time_ms,
        } => {
            let time_ms = time_ms.unwrap_or(config.default_thinking_time_ms);
            commands::select_move(&mut engine, &board, &difficulty, player, win_count, time_ms)?
        }
        Command::Analyze {
            board,
            player,
            win_count,
        } => commands::analyze(&engine, &board, player, win_count)?,
        Command::Hint {
            board,
            player,
            win_count,
        } => commands::hint(&mut engine, &board, player, win_count)?,
        Command::SelfPlay {
            x,
            o,
            size,
            win_count,
            games,
        } => commands::self_play(&mut engine, &x, &o, size, win_count, games, config.default_thinking_time_ms)?,
        Command::AnalyzeGame {
            moves,
            size,
            win_count,
        } => commands::analyze_game(&mut engine, &moves, size, win_count)?,
        Command::InitConfig => return Ok(()),
    };

    print!("{}", output);
    Ok(())
}
