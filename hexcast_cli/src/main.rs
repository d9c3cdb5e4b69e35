//! Command-line surface for the hexcast spell compiler.
//!
//! Loads spell templates from a spell file, lists their names, or compiles
//! a named spell and prints the human-readable instruction listing.

mod provider;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hexcast_compiler::{DebugEmitter, SpellCompiler};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hexcast",
    version,
    about = "Spell-to-bytecode compiler for the hexcast battle VM"
)]
struct Cli {
    /// Enables verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lists the spells available in a spell file.
    List {
        /// Path to the spell file.
        spell_file: PathBuf,
    },
    /// Compiles a spell and prints its instruction listing.
    Compile {
        /// Path to the spell file.
        spell_file: PathBuf,
        /// Exact name of the spell to compile.
        name: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::List { spell_file } => {
            let spells = provider::load_spell_file(&spell_file)?;
            for spell in &spells {
                println!("{}", spell.name);
            }
        }
        Command::Compile { spell_file, name } => {
            let spells = provider::load_spell_file(&spell_file)?;
            let spell = provider::find_spell(&spells, &name)?;
            let listing = SpellCompiler::new(DebugEmitter::new()).compile(spell)?;
            print!("{listing}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}
