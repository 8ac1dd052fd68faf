//! Entry point for the sysdash TUI. Parses args, resolves settings and runs the App.

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sysdash::app::{App, NoInput};
use sysdash::config::{self, Overrides, Settings, SortKey};
use sysdash::connection::ConnectionManager;
use sysdash::sink::LogSink;
use sysdash::store::MetricsStore;
use sysdash::ui::{enter_terminal, input::TerminalInput, leave_terminal, TuiSink};
use sysdash::ws::WsConnector;

#[derive(Parser, Debug)]
#[command(name = "sysdash", version, about = "Live system telemetry dashboard")]
struct Cli {
    /// Collector endpoint (ws://HOST:PORT, wss://..., or HOST:PORT)
    endpoint: Option<String>,

    /// Use (or with --save, store) a named endpoint profile
    #[arg(short = 'P', long)]
    profile: Option<String>,

    /// Save ENDPOINT under --profile in the config file
    #[arg(long, requires = "profile")]
    save: bool,

    /// Config file (default: $XDG_CONFIG_HOME/sysdash/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Points kept per history chart
    #[arg(long)]
    history: Option<usize>,

    /// Reconnect delay unit; attempt n waits n times this
    #[arg(long)]
    base_delay_ms: Option<u64>,

    /// Connection attempts before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Hide cores reporting 0% load
    #[arg(long)]
    hide_idle_cores: bool,

    /// Process table sort column
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Log updates instead of drawing the terminal UI
    #[arg(long)]
    headless: bool,

    /// Log filter (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs here (TUI mode discards logs otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print resolved settings and exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut file = config::load(&config_path)?;

    if let (true, Some(name), Some(endpoint)) = (cli.save, &cli.profile, &cli.endpoint) {
        // validate before persisting
        config::normalize_endpoint(endpoint)?;
        if file.remember_profile(name, endpoint) {
            config::save(&config_path, &file)?;
            tracing::info!(profile = %name, %endpoint, "saved profile");
        }
    }

    let overrides = Overrides {
        endpoint: cli.endpoint.clone(),
        profile: cli.profile.clone(),
        history_len: cli.history,
        base_delay_ms: cli.base_delay_ms,
        max_attempts: cli.max_attempts,
        hide_idle_cores: cli.hide_idle_cores,
        sort: cli.sort,
    };
    let settings = Settings::resolve(&file, &overrides)?;

    if cli.dry_run {
        println!("endpoint: {}", settings.endpoint);
        println!("history: {}", settings.history_len);
        println!(
            "retry: base {} ms, max {} attempts",
            settings.retry.base_delay.as_millis(),
            settings.retry.max_attempts
        );
        println!("hide idle cores: {}", settings.projection.hide_idle_cores);
        println!("sort: {}", settings.projection.sort.column());
        return Ok(());
    }

    let endpoint = settings.endpoint.to_string();
    let connection = ConnectionManager::new(WsConnector::new(settings.endpoint), settings.retry);
    let store = MetricsStore::new(settings.history_len);
    let mut app = App::new(connection, store, settings.projection);

    if cli.headless {
        tracing::info!(%endpoint, "starting headless");
        return app.run(&mut LogSink::default(), &mut NoInput).await;
    }

    let terminal = enter_terminal().context("setting up terminal")?;
    let mut sink = TuiSink::new(terminal, &endpoint);
    let res = app.run(&mut sink, &mut TerminalInput).await;

    // Teardown
    let mut terminal = sink.into_terminal();
    leave_terminal(&mut terminal).context("restoring terminal")?;
    res
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.is_empty() => EnvFilter::try_new(v),
        _ => EnvFilter::try_new(&cli.log_level),
    }
    .with_context(|| format!("invalid log level: {}", cli.log_level))?;

    if let Some(path) = &cli.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.headless || cli.dry_run {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    // TUI without --log-file: the terminal is ours, drop logs
    Ok(())
}
