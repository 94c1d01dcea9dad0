use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::KeyEventKind;
use sysinfo::System;
use tokio::sync::mpsc::UnboundedSender;

use clauditor::app::{App, Effect, PendingAction};
use clauditor::config::{self, Config, load_config, load_config_from_path};
use clauditor::event::{Event, EventHandler};
use clauditor::format::{extract_project_name, format_memory, shorten_path, truncate_unicode};
use clauditor::logging::init_file_logging;
use clauditor::system::collector::Collector;
use clauditor::system::identify::Identifier;
use clauditor::system::lifecycle::LifecycleController;
use clauditor::system::process::ProcessRecord;
use clauditor::system::signal::SysinfoSignaller;
use clauditor::system::source::SourceKind;
use clauditor::ui;

#[derive(Parser)]
#[command(
    name = "clauditor",
    about = "Monitor, pause, resume and kill running Claude CLI sessions"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Process source: ps, sysinfo
    #[arg(long)]
    source: Option<String>,

    /// Color theme: dark, light
    #[arg(long)]
    theme: Option<String>,

    /// Write tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `clauditor=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Print one refresh as a table and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Print one refresh as JSON and exit.
    #[arg(long, default_value_t = false)]
    json: bool,
}

struct Services {
    collector: Collector,
    controller: Arc<LifecycleController>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(path) = &config.general.log_file {
        init_file_logging(path, &config.general.log_level)?;
    }

    let source = SourceKind::from_config_str(&config.general.source);
    tracing::info!(source = source.label(), "starting");
    let source = source.build();
    let services = Services {
        collector: Collector::new(
            Arc::clone(&source),
            Identifier::from_config(&config.identify),
        ),
        controller: Arc::new(LifecycleController::new(
            source,
            Arc::new(SysinfoSignaller),
        )),
    };
    let total_memory_bytes = total_memory_bytes(&config);

    if cli.json || cli.once {
        let records = services.collector.refresh().await;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
        } else {
            print!("{}", render_table(&records, total_memory_bytes));
        }
        return Ok(());
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config, services, total_memory_bytes).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    services: Services,
    total_memory_bytes: u64,
) -> Result<()> {
    // tokio intervals reject a zero period
    let tick_rate = Duration::from_millis(config.general.refresh_rate_ms.max(100));
    let mut app = App::new(config, total_memory_bytes);
    let mut events = EventHandler::new(tick_rate);
    let tx = events.sender();

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        let action = app.map_key(key);
                        let effect = app.dispatch(action);
                        spawn_effect(effect, &services, &tx);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    spawn_refresh(&services.collector, &tx);
                    app.on_tick();
                    should_draw = true;
                }
                Event::Resize => {
                    should_draw = true;
                }
                Event::Refreshed(records) => {
                    app.apply_refresh(records);
                    should_draw = true;
                }
                Event::LifecycleDone {
                    action,
                    pid,
                    project,
                    success,
                } => {
                    app.apply_lifecycle_result(action, pid, &project, success);
                    spawn_refresh(&services.collector, &tx);
                    should_draw = true;
                }
            }
            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        }
    }

    Ok(())
}

fn spawn_effect(effect: Effect, services: &Services, tx: &UnboundedSender<Event>) {
    match effect {
        Effect::None => {}
        Effect::Refresh => spawn_refresh(&services.collector, tx),
        Effect::Lifecycle(pending) => spawn_lifecycle(pending, &services.controller, tx),
    }
}

/// Refreshes may overlap; whichever lands last is what the list shows.
fn spawn_refresh(collector: &Collector, tx: &UnboundedSender<Event>) {
    let collector = collector.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let records = collector.refresh().await;
        let _ = tx.send(Event::Refreshed(records));
    });
}

fn spawn_lifecycle(
    pending: PendingAction,
    controller: &Arc<LifecycleController>,
    tx: &UnboundedSender<Event>,
) {
    let controller = Arc::clone(controller);
    let tx = tx.clone();
    tokio::spawn(async move {
        let PendingAction {
            action,
            pid,
            project,
        } = pending;
        let success = tokio::task::spawn_blocking(move || {
            controller.execute(action, pid).root_delivered
        })
        .await
        .unwrap_or(false);
        let _ = tx.send(Event::LifecycleDone {
            action,
            pid,
            project,
            success,
        });
    });
}

fn total_memory_bytes(config: &Config) -> u64 {
    if config.general.total_memory_gb > 0.0 {
        return (config.general.total_memory_gb * 1024.0 * 1024.0 * 1024.0) as u64;
    }
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}

fn render_table(records: &[ProcessRecord], total_memory_bytes: u64) -> String {
    let mut out = format!(
        "{:>7}  {:<22} {:>7} {:>8} {:<8} {:>5}  {:<30} {}\n",
        "PID", "PROJECT", "CPU", "MEM", "STATE", "KIDS", "DIRECTORY", "STARTED"
    );
    for p in records {
        out.push_str(&format!(
            "{:>7}  {:<22} {:>6.1}% {:>8} {:<8} {:>5}  {:<30} {}\n",
            p.pid,
            truncate_unicode(&extract_project_name(p), 22),
            p.total_cpu_percent,
            format_memory(p.total_mem_percent, total_memory_bytes),
            p.state.label(),
            p.descendants.len(),
            shorten_path(&p.working_dir, 30),
            p.start_time,
        ));
    }
    if records.is_empty() {
        out.push_str("No Claude sessions found\n");
    }
    out
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref source) = cli.source {
        config.general.source = source.clone();
    }
    if let Some(ref theme) = cli.theme {
        config.colors.theme = theme.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.general.log_file = Some(path.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }

    config
}
