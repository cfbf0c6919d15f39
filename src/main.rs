use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use squarix::clock::SystemClock;
use squarix::config::{GameConfig, Resolution, DEFAULT_ENEMY_COUNT, MAX_ENEMY_COUNT};
use squarix::input::TerminalInput;
use squarix::surface::TerminalSurface;
use squarix::terminal::TerminalSession;
use squarix::{MenuChoice, MenuResult, RunOutcome, Session};

#[derive(Parser, Debug)]
#[command(name = "squarix")]
#[command(about = "Dodge the pursuing squares in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Playfield resolution (800x600, 1024x768 or 1280x720)
    #[arg(long, default_value = "800x600")]
    resolution: Resolution,

    /// Stretch the playfield over the whole terminal
    #[arg(long)]
    fullscreen: bool,

    /// Start playing immediately instead of showing the resolution menu
    #[arg(long)]
    skip_menu: bool,

    /// Number of pursuing enemies
    #[arg(long, default_value_t = DEFAULT_ENEMY_COUNT as u16,
          value_parser = clap::value_parser!(u16).range(1..=MAX_ENEMY_COUNT as i64))]
    enemies: u16,

    /// Seed for enemy placement and respawns (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write log records to this file (the terminal is busy drawing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("squarix starting with seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    // Dropping the session restores the terminal on every exit path,
    // including a failed startup step.
    let terminal = TerminalSession::start()?;
    let (cols, rows) = terminal.size();
    let (width, height) = cli.resolution.dimensions();

    let surface = TerminalSurface::new(
        BufWriter::new(stdout()),
        cols,
        rows,
        width,
        height,
        cli.fullscreen,
    );
    let input = TerminalInput::spawn(terminal.reports_key_releases());
    let mut session = Session::new(surface, input, SystemClock::new());

    let initial = MenuChoice {
        resolution: cli.resolution,
        fullscreen: cli.fullscreen,
    };
    let choice = if cli.skip_menu {
        initial
    } else {
        match session.show_menu(initial)? {
            MenuResult::Start(choice) => choice,
            MenuResult::Quit => {
                info!("quit from menu");
                return Ok(());
            }
        }
    };

    let config = GameConfig::new(choice.resolution, cli.enemies as usize);
    let (outcome, state) = session.play(config, choice.fullscreen, &mut rng)?;

    drop(session);
    drop(terminal);

    if outcome == RunOutcome::GameOver {
        println!("Game Over!");
    }
    println!("Final score: {}", state.score);
    Ok(())
}
