use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::generate::GenerateArgs;
use crate::optimize::OptimizeArgs;

mod generate;
mod optimize;
mod parsers;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a synthetic demand instance and write it as CSV
    #[command(visible_alias = "g")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Optimize a demand instance with one of the search strategies
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Generate { args } => generate::run(args),
        Commands::Optimize { args } => optimize::run(args),
    }
}
