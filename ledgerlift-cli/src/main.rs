use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgerlift_finance::ExportFormat;
use ledgerlift_ingest::GeminiClient;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod process;
mod state;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("LEDGERLIFT_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "ledgerlift",
    version,
    long_version = LONG_VERSION,
    about = "Turn bank statement PDFs and images into ledger spreadsheets"
)]
struct Cli {
    /// Debug logging on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from statements, one file at a time, and export each
    Process {
        /// Statement files (pdf, jpg/jpeg, png, webp); others are skipped
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Where exports go (default: config export.out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// xlsx or csv (default: config export.format)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Only show results; write no spreadsheets
        #[arg(long)]
        no_export: bool,

        /// Also write each service payload as <name>_raw.json
        #[arg(long)]
        dump_raw: bool,
    },

    /// Export a saved raw payload (from --dump-raw) again
    Export {
        /// Path to a <name>_raw.json payload
        #[arg(long)]
        input: PathBuf,

        /// Original statement name; without it the name is <Bank>_Statement_<date>
        #[arg(long)]
        filename: Option<String>,

        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Credential commands
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.ledgerlift/config.toml with defaults
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Store a Gemini API key in ~/.ledgerlift/auth.json
    PasteApiKey,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Process {
            files,
            out_dir,
            format,
            no_export,
            dump_raw,
        } => {
            let cfg = config::load_config()?;
            let api_key = auth::resolve_api_key()?;
            let client = GeminiClient::new(api_key, cfg.gemini_settings())
                .context("build extraction client")?;
            if !client.has_credential() {
                tracing::warn!("no API key configured; every file will fail");
            }
            tracing::debug!(model = client.model(), "extraction client ready");

            let opts = process::ProcessOptions {
                out_dir: out_dir.unwrap_or_else(|| cfg.export.out_dir.clone()),
                format: format.unwrap_or(cfg.export.format),
                export: !no_export,
                dump_raw,
            };
            process::run_process(&client, files, &opts).await?;
        }

        Command::Export {
            input,
            filename,
            out_dir,
            format,
        } => {
            let cfg = config::load_config()?;
            let out_dir = out_dir.unwrap_or_else(|| cfg.export.out_dir.clone());
            let format = format.unwrap_or(cfg.export.format);
            process::run_export(&input, filename.as_deref(), &out_dir, format)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteApiKey => auth::paste_api_key()?,
        },
    }

    Ok(())
}
