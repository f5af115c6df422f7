use chatsift_core::Config;
use chatsift_sources::{ImportReport, Importer};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chatsift", about = "chatsift — normalize chat exports into sessions")]
struct Cli {
    /// Write debug logs to /tmp/chatsift-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/chatsift/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the parsed data as pretty JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Write recovered images here as <name>.<ext>.
    #[arg(long, value_name = "DIR")]
    media_out: Option<PathBuf>,

    /// Export files: .json, .csv, .txt, decrypted .db, or .dat attachments.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;

    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    let mut report = Importer::new(config).import_paths(&cli.files).await;

    if let Some(dir) = &cli.media_out {
        write_media(&mut report, dir).await?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.data)?);
    } else {
        print_summary(&report);
    }
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    Ok(())
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/chatsift-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("chatsift debug log started — tail -f /tmp/chatsift-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}

async fn write_media(report: &mut ImportReport, dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let names: Vec<String> = report.media.names().map(str::to_owned).collect();
    for name in names {
        if let Some(media) = report.media.release(&name) {
            let out = dir.join(format!("{name}.{}", media.extension()));
            tokio::fs::write(&out, &media.bytes).await?;
            tracing::debug!(path = %out.display(), "wrote attachment");
        }
    }
    Ok(())
}

fn print_summary(report: &ImportReport) {
    let data = &report.data;
    println!(
        "{} sessions, {} messages ({} ms)",
        data.sessions.len(),
        data.total_messages,
        data.parse_time.as_millis()
    );
    for session in &data.sessions {
        let marker = if session.is_group { " [group]" } else { "" };
        println!("  {}{}: {} messages", session.name, marker, session.message_count());
    }
    if !report.media.is_empty() {
        println!("{} recovered attachments", report.media.len());
    }
}
