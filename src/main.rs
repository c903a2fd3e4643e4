use clap::{Parser, Subcommand};
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ciphertext-only search over rotor machine keys", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search a key space described by a query file
    Attack(cmd::attack::AttackArgs),
    /// Encrypt (or decrypt) text with a single key
    Encrypt(cmd::encrypt::EncryptArgs),
    /// Count the distinct keys of a query file
    Count(cmd::count::CountArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Attack(args) => cmd::attack::run(args),
        Commands::Encrypt(args) => cmd::encrypt::run(args),
        Commands::Count(args) => cmd::count::run(args),
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}
