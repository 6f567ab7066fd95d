//! CLI entry point for `maildecode`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};

use maildecode::config::Config;
use maildecode::error::DecodeError;
use maildecode::model::email::{DecodedEmail, Envelope};
use maildecode::parser::{decode_message_with, DecoderOptions};
use maildecode::payload::StoragePayload;

#[derive(Parser)]
#[command(name = "maildecode", version, about = "Decode raw inbound email messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw message file and print subject, text and HTML
    Decode {
        path: PathBuf,
        /// Envelope sender
        #[arg(long, default_value = "", env = "MAILDECODE_FROM")]
        from: String,
        /// Envelope recipient
        #[arg(long, default_value = "", env = "MAILDECODE_TO")]
        to: String,
        /// Print the decoded record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a raw message file and print the storage payload as JSON
    Payload {
        path: PathBuf,
        /// Envelope sender
        #[arg(long, env = "MAILDECODE_FROM")]
        from: String,
        /// Envelope recipient
        #[arg(long, env = "MAILDECODE_TO")]
        to: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = maildecode::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Decode {
            path,
            from,
            to,
            json,
        } => cmd_decode(&path, Envelope::new(from, to), json, &config),
        Commands::Payload { path, from, to } => {
            cmd_payload(&path, Envelope::new(from, to), &config)
        }
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = maildecode::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "maildecode.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

fn read_message(path: &Path) -> Result<Vec<u8>, DecodeError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DecodeError::FileNotFound(path.to_path_buf())
        } else {
            DecodeError::io(path, e)
        }
    })
}

fn decode_file(path: &Path, envelope: &Envelope, config: &Config) -> anyhow::Result<DecodedEmail> {
    let raw = read_message(path)?;
    let options = DecoderOptions::from(&config.decoder);
    Ok(decode_message_with(envelope, &raw, &options))
}

/// Decode a message file and print the result.
fn cmd_decode(path: &Path, envelope: Envelope, json: bool, config: &Config) -> anyhow::Result<()> {
    let email = decode_file(path, &envelope, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&email)?);
        return Ok(());
    }

    println!("Subject:   {}", email.subject);
    println!("Multipart: {}", email.is_multipart);
    println!("Text:      {} chars", email.text.chars().count());
    println!("HTML:      {} chars", email.html.chars().count());
    println!();
    println!("{}", email.text);
    Ok(())
}

/// Decode a message file and print its storage payload.
fn cmd_payload(path: &Path, envelope: Envelope, config: &Config) -> anyhow::Result<()> {
    let email = decode_file(path, &envelope, config)?;
    StoragePayload::validate(&email)?;
    let payload = StoragePayload::build(&email, &config.payload);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "maildecode", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
