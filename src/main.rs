//! ccg - rules engine driver
//!
//! Plays the two-player demonstration scenario with selectable controllers.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use ccg_rules::core::PlayerId;
use ccg_rules::game::{
    demo, GameConfig, GameEndReason, GameLogger, GameLoop, OutputFormat, PlayerController,
    RandomController, ScriptedController, VerbosityLevel, ZeroController,
};
use std::path::PathBuf;
use std::time::Instant;

/// Controller type for each seat
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always takes the first option (passes whenever it can)
    Zero,
    /// Makes random choices
    Random,
    /// Predetermined choices (requires --p1-script / --p2-script)
    Scripted,
}

#[derive(Parser)]
#[command(name = "ccg")]
#[command(about = "Turn-based card combat rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the demonstration scenario once
    Run {
        /// Player 0 controller type
        #[arg(long, value_enum, default_value = "random")]
        p1: ControllerType,

        /// Player 1 controller type
        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        /// Script for player 0 (space or comma separated indices, e.g. "1 0 0")
        #[arg(long, value_name = "CHOICES")]
        p1_script: Option<String>,

        /// Script for player 1
        #[arg(long, value_name = "CHOICES")]
        p2_script: Option<String>,

        /// Random seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity (0=silent, 1=minimal, 2=normal, 3=verbose, 4=debug)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityLevel,

        /// Turn cap (overrides the config file)
        #[arg(long)]
        max_turns: Option<u32>,

        /// Engine configuration as JSON
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Emit log lines as JSON objects
        #[arg(long)]
        json: bool,
    },

    /// Play many silent games with random controllers and report timings
    Profile {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Seed of the first game; game i uses seed + i
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            p1,
            p2,
            p1_script,
            p2_script,
            seed,
            verbosity,
            max_turns,
            config,
            json,
        } => {
            let mut config = match config {
                Some(path) => GameConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GameConfig::default(),
            };
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(max_turns) = max_turns {
                config = config.with_max_turns(max_turns);
            }

            let mut controllers = vec![
                make_controller(p1, PlayerId::new(0), p1_script.as_deref(), config.seed)?,
                make_controller(p2, PlayerId::new(1), p2_script.as_deref(), config.seed.wrapping_add(1))?,
            ];

            let mut logger = GameLogger::with_verbosity(verbosity);
            if json {
                logger.set_output_format(OutputFormat::Json);
            }
            let mut game = demo::demo_game(config)?.with_logger(logger);
            let result = GameLoop::new(&mut game)
                .with_verbosity(verbosity)
                .run_game(&mut controllers)
                .context("game aborted")?;

            if verbosity == VerbosityLevel::Silent {
                println!("{result:?}");
            }
        }
        Commands::Profile { games, seed } => run_profile(games, seed)?,
    }

    Ok(())
}

fn make_controller(
    kind: ControllerType,
    player: PlayerId,
    script: Option<&str>,
    seed: u64,
) -> anyhow::Result<Box<dyn PlayerController>> {
    Ok(match kind {
        ControllerType::Zero => Box::new(ZeroController::new(player)),
        ControllerType::Random => Box::new(RandomController::with_seed(player, seed)),
        ControllerType::Scripted => {
            let Some(script) = script else {
                bail!("scripted controller for player {player} needs a script");
            };
            Box::new(ScriptedController::new(player, parse_script(script)?))
        }
    })
}

/// Parse "1 2 0" or "1,2,0" into indices
fn parse_script(script: &str) -> anyhow::Result<Vec<usize>> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("invalid choice index '{s}'"))
        })
        .collect()
}

fn run_profile(games: usize, seed: u64) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut decided = 0usize;
    let mut total_turns = 0u64;

    for i in 0..games {
        let game_seed = seed.wrapping_add(i as u64);
        let config = GameConfig::default().with_seed(game_seed);
        let mut controllers: Vec<Box<dyn PlayerController>> = vec![
            Box::new(RandomController::with_seed(PlayerId::new(0), game_seed)),
            Box::new(RandomController::with_seed(PlayerId::new(1), game_seed.wrapping_add(1))),
        ];
        let mut game = demo::demo_game(config)?.with_logger(GameLogger::silent());
        let result = GameLoop::new(&mut game).run_game(&mut controllers)?;
        if matches!(result.end_reason, GameEndReason::PlayerDefeated(_)) {
            decided += 1;
        }
        total_turns += u64::from(result.turns_played);
    }

    let elapsed = start.elapsed();
    println!("Games: {games}");
    println!("Decided: {decided}");
    println!("Turns: {total_turns}");
    println!("Elapsed: {elapsed:?}");
    if games > 0 {
        println!("Per game: {:?}", elapsed / games as u32);
    }
    Ok(())
}
