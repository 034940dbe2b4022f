use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info, warn};

use tx_sampler::app::{App, StatusLevel};
use tx_sampler::config;
use tx_sampler::core::Session;
use tx_sampler::domain::{Chain, QueryParams};
use tx_sampler::infrastructure::{HttpSampleClient, RuntimeBridge, RuntimeCommand, RuntimeEvent};
use tx_sampler::{logging, ui};

#[derive(Debug, Parser)]
#[command(
    name = "sampler",
    version,
    about = "Sample recent transactions for an EVM address from a sampling backend"
)]
struct Args {
    /// Backend base URL (e.g. http://127.0.0.1:8080)
    #[arg(long)]
    backend: Option<String>,

    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shareable query string, e.g. "?chain=eth&address=0x.."
    #[arg(long)]
    query: Option<String>,

    /// Initial chain (wire value, e.g. eth)
    #[arg(long)]
    chain: Option<String>,

    /// Initial address
    #[arg(long)]
    address: Option<String>,

    /// Log file (defaults to sampler.log in the data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = logging::init(args.log_file.as_deref());

    let config = config::load(args.config.as_deref()).context("failed to load config")?;
    let query = initial_query(&args);
    let backend_url = args
        .backend
        .as_deref()
        .map(config::normalize_backend_url)
        .unwrap_or_else(|| config.backend_url());
    let timeout = Duration::from_secs(config.app.timeout_secs);
    info!(backend = %backend_url, ?timeout, query = %query.to_query_string(), "starting sampler");

    let client = HttpSampleClient::new(backend_url.clone(), timeout)
        .with_context(|| format!("invalid backend URL {backend_url}"))?;
    let runtime = RuntimeBridge::new(Arc::new(client));

    let mut app = App::new(
        Session::new(query, config.chain_alias_to_name()),
        backend_url,
    );
    app.chain_alias = config.alias_for(app.input.chain).map(str::to_string);
    app.log_file = log_file.map(|path| path.display().to_string());

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal loop failed");
        eprintln!("{err:?}");
    }

    println!("{}", app.share_query());
    Ok(())
}

/// `--query` first, then `--chain`/`--address` override its parts.
/// A disabled chain falls back to the default.
fn initial_query(args: &Args) -> QueryParams {
    let mut query = args
        .query
        .as_deref()
        .map(QueryParams::parse)
        .unwrap_or_default();
    if let Some(raw) = args.chain.as_deref() {
        match Chain::from_wire(raw) {
            Some(chain) => query.chain = chain,
            None => {
                warn!(chain = raw, "unknown chain argument, using default");
                query.chain = Chain::default();
            }
        }
    }
    if let Some(address) = args.address.as_deref() {
        query.address = address.trim().to_string();
    }
    query.into_selectable()
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(app, &runtime);
        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }

        pump_background(app, &runtime);
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        match event {
            RuntimeEvent::SampleReady { id, outcome } => app.apply_sample_ready(id, outcome),
            RuntimeEvent::Error { message } => app.apply_runtime_error(message),
        }
    }

    if let Some((id, request)) = app.take_sample_request() {
        if let Err(err) = runtime.send(RuntimeCommand::FetchSample { id, request }) {
            app.apply_runtime_error(format!("Worker unavailable: {err}"));
        }
    }

    if let Some(text) = app.take_clipboard_request() {
        copy_to_clipboard(app, text);
    }
}

fn copy_to_clipboard(app: &mut App, text: String) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(&text).is_ok() {
                let shown = if text.chars().count() > 20 {
                    format!("{}...", text.chars().take(20).collect::<String>())
                } else {
                    text
                };
                app.set_status(format!("Copied: {shown}"), StatusLevel::Info);
            } else {
                app.set_status("Failed to copy to clipboard", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Clipboard not available", StatusLevel::Error);
        }
    }
}
