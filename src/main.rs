use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use sysmon::app::App;
use sysmon::config::{self, Config, load_config, load_config_from_path};
use sysmon::event::{Event, EventHandler};
use sysmon::logging::init_file_logging;
use sysmon::report::render_report;
use sysmon::system::collector::Collector;
use sysmon::system::platform::HostSource;
use sysmon::ui;
use sysmon::ui::theme::Theme;

/// Longest wait between the two samples of a `--once` report.
const ONCE_SAMPLE_CAP_MS: u64 = 1000;

#[derive(Parser)]
#[command(
    name = "sysmon",
    about = "TUI system monitor: uptime, memory, CPU and a CPU-ranked process table"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Show at most this many processes (0 = all)
    #[arg(long)]
    max_processes: Option<usize>,

    /// Print one report to stdout and exit instead of starting the TUI.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// With --once, print the snapshot as JSON.
    #[arg(long, default_value_t = false, requires = "once")]
    json: bool,

    /// Write tracing output to this file (filter with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_file_logging(path)?;
    }
    let config = load_config_for_cli(&cli);
    if config.general.refresh_rate_ms == 0 {
        return Err(eyre!("--refresh-rate must be greater than 0"));
    }

    let source = HostSource::new().wrap_err("opening host data source")?;

    if cli.once {
        return run_once(source, &config, cli.json).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, source, &config).await;
    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    source: HostSource,
    config: &Config,
) -> Result<()> {
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms);
    let theme = Theme::default();
    let mut app = App::new(source, config);
    let mut events = EventHandler::new(tick_rate);

    terminal.draw(|frame| ui::draw(frame, &mut app, &theme))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind != crossterm::event::KeyEventKind::Press {
                    continue;
                }
                let action = app.map_key(key);
                app.dispatch(action);
            }
            Event::Tick => app.refresh_data(),
            Event::Resize => app.on_resize(),
        }
        terminal.draw(|frame| ui::draw(frame, &mut app, &theme))?;
    }

    Ok(())
}

/// Two samples are taken so the aggregate CPU figure covers a real interval.
async fn run_once(source: HostSource, config: &Config, json: bool) -> Result<()> {
    let mut collector =
        Collector::new(source).with_process_limit(config.general.process_limit());
    collector.refresh();
    let wait = config.general.refresh_rate_ms.min(ONCE_SAMPLE_CAP_MS);
    tokio::time::sleep(Duration::from_millis(wait)).await;
    let snapshot = collector.refresh();

    let output = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        render_report(&snapshot)
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output.trim_end())?;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(max) = cli.max_processes {
        config.general.max_processes = max;
    }

    config
}
