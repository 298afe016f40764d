use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio_util::sync::CancellationToken;

use paysheet_core::config_file::{self, ConfigFile, DisplaySection, FlowSection, RepositorySection};
use paysheet_core::{FlowStore, PaymentTypeRepository};

mod action;
mod app;
mod input;
mod logging;
mod theme;
mod view;

use app::App;

/// Paysheet: pick a payment type before the discount countdown runs out.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seconds on the discount countdown
    #[arg(long)]
    countdown: Option<u32>,

    /// Simulated repository latency in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Probability (0-1) that a simulated load fails
    #[arg(long)]
    failure_rate: Option<f64>,

    /// Color theme: classic (default) or night
    #[arg(long)]
    theme: Option<String>,

    /// Log filter, e.g. "debug" or "paysheet_core=trace" (default: RUST_LOG, then info)
    #[arg(long)]
    log_level: Option<String>,
}

fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Settings from CLI flags, falling back to `PAYSHEET_*` env vars, as a config overlay.
fn overrides(args: &Args) -> ConfigFile {
    ConfigFile {
        flow: Some(FlowSection {
            countdown_secs: args.countdown.or_else(|| env_var("PAYSHEET_COUNTDOWN")),
            tick_millis: None,
        }),
        repository: Some(RepositorySection {
            delay_ms: args.delay_ms.or_else(|| env_var("PAYSHEET_DELAY_MS")),
            failure_rate: args
                .failure_rate
                .or_else(|| env_var("PAYSHEET_FAILURE_RATE")),
            payment_types: None,
        }),
        display: Some(DisplaySection {
            theme: args.theme.clone().or_else(|| env_var("PAYSHEET_THEME")),
        }),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Before config loading, so malformed-file warnings reach the log.
    let _log_guard = logging::init(args.log_level.as_deref());

    // Resolve config from CLI flags > env vars > config files > defaults
    let config = config_file::merge(config_file::load_config(), overrides(&args));
    if let Some(rate) = config.repository.as_ref().and_then(|r| r.failure_rate)
        && !(0.0..=1.0).contains(&rate)
    {
        anyhow::bail!("failure rate must be between 0 and 1, got {rate}");
    }

    let theme = theme::Theme::from_name(config.theme_name().unwrap_or("classic"));
    let repository: Arc<dyn PaymentTypeRepository> = Arc::new(config.repository());
    let flow = FlowStore::spawn(config.flow_config(), repository);
    let mut snapshots = flow.subscribe();

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(flow.snapshot(), theme);
    app.intents = Some(flow.intents());

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            // Flow snapshots: countdown ticks, load resolutions, applied intents
            changed = snapshots.changed() => {
                if changed.is_ok() {
                    let state = snapshots.borrow_and_update().clone();
                    app.apply_snapshot(state);
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    flow.shutdown().await;
    Ok(())
}
