use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerlift",
    version,
    about = "Categorize a bank export using your finance tool's history"
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Conversion profile (TOML). Defaults to the per-user profile when present.
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one or more bank exports into the import format
    Convert {
        /// Categorized export to learn from
        #[arg(short, long)]
        reference: PathBuf,

        /// Bank exports to convert
        #[arg(required = true)]
        raw: Vec<PathBuf>,

        /// Where converted-<name>.csv files are written
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// List learned merchants resembling each uncategorized merchant
        #[arg(long)]
        explain: bool,
    },

    /// Show what would be learned from a categorized export
    Learn {
        #[arg(short, long)]
        reference: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Manage the conversion profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Write the default profile as TOML
    Init {
        /// Destination (defaults to the per-user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the profile that would be used
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let profile_path = cli.profile.as_deref();

    match cli.command {
        Command::Convert {
            reference,
            raw,
            out_dir,
            json,
            explain,
        } => {
            let profile = commands::load_profile(profile_path)?;
            commands::convert(profile, &reference, &raw, &out_dir, json, explain).await?;
        }

        Command::Learn { reference, json } => {
            let profile = commands::load_profile(profile_path)?;
            commands::learn(&profile, &reference, json).await?;
        }

        Command::Profile { command } => match command {
            ProfileCommand::Init { path, force } => {
                commands::init_profile(path, force)?;
            }
            ProfileCommand::Show => {
                let profile = commands::load_profile(profile_path)?;
                print!("{}", profile.to_toml()?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
