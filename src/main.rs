//! Binary entrypoint for the Gloomdelve CLI.
//!
//! Commands:
//! - `play [--save <path>] [--seed <n>] [--name <who>]` - start a delve (the default)
//! - `init` - create a starter `gloomdelve.toml`
//!
//! See the library crate docs for module-level details: `gloomdelve::`.
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use gloomdelve::config::Config;
use gloomdelve::engine::Catalog;
use gloomdelve::game::{LoopControl, RustylineEditor, Session};

#[derive(Parser)]
#[command(name = "gloomdelve")]
#[command(about = "A single-player terminal dungeon crawler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "gloomdelve.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a delve (assumed when no command is given)
    Play {
        /// Save file path, overriding the configured one
        #[arg(short, long)]
        save: Option<String>,

        /// Fixed rng seed for a reproducible delve
        #[arg(long)]
        seed: Option<u64>,

        /// Adventurer name, overriding the configured one
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Write a starter configuration file
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play {
        save: None,
        seed: None,
        name: None,
    });

    match command {
        Commands::Play { save, seed, name } => {
            let config = Config::load_or_default(&cli.config)?;
            init_logging(&config, cli.verbose);
            info!("Gloomdelve v{}", env!("CARGO_PKG_VERSION"));

            let save_path = PathBuf::from(save.unwrap_or_else(|| config.game.save_path.clone()));
            let seed = seed.or(config.game.seed);
            let name = name.unwrap_or_else(|| config.game.player_name.clone());

            let catalog = Catalog::builtin();
            let mut session = Session::new(&catalog, &name, save_path, seed);
            let mut editor = RustylineEditor::new()?;
            match session.run(&mut editor)? {
                LoopControl::Won => info!("{} carried a treasure out alive", name),
                LoopControl::Dead => info!("{} died in the delve", name),
                LoopControl::Quit | LoopControl::Continue => {
                    info!("{} walked away from the delve", name)
                }
            }
        }
        Commands::Init => {
            init_logging(&Config::default(), cli.verbose);
            Config::create_default(&cli.config)?;
            info!("configuration file created at {}", cli.config);
            println!("Wrote a starter config to {}.", cli.config);
        }
    }

    Ok(())
}

fn init_logging(config: &Config, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .logging
            .level
            .parse()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(ref file) = config.logging.file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
        {
            let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let write_mutex = mutex.clone();

            // At an interactive terminal the prompt owns the screen, so logs
            // stay in the file; when piped they echo to stderr as well.
            let echo_to_console = !atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if echo_to_console {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        } else {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
