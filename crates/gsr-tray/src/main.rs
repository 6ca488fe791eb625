//! gsr-tray: tray front-end for gpu-screen-recorder with global shortcuts.

mod app;
mod app_command;
mod cli;
mod config;
mod error;
mod hotkey_handler;
mod notifier;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::{HotkeyHandler, ShortcutService},
    tray_command::{TrayCommand, TraySink},
    tray_icon_state::TrayIconState,
    tray_manager::{TrayManager, TrayMenuIds},
};

use crate::{
    cli::{Cli, CliCommand},
    config::Config,
};

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use gsr_tray_core::RecordingSession;
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const TRAY_LOG_FILTER: &str = "gsr_tray=debug,gsr_tray_core=debug,recorder=info";
const CLI_LOG_FILTER: &str = "gsr_tray=warn,gsr_tray_core=warn";
const STATUS_DURATION: Duration = Duration::from_secs(2);

/// Application entry point.
fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(CliCommand::Run);

    let _log_guard = init_tracing(matches!(command, CliCommand::Run));

    let result = match command {
        CliCommand::Run => run_tray(),
        CliCommand::Command => cli::assembled_command().map(print),
        CliCommand::Sources => block_on(cli::sources()).map(print),
        CliCommand::Config { action } => cli::config(&action).map(print),
        CliCommand::Hook { file } => block_on(cli::hook(file)).map(print),
    };

    if let Err(e) = result {
        error!(error = ?e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Stdout/stderr logging plus a daily JSON log file for the tray app.
fn init_tracing(tray: bool) -> Option<WorkerGuard> {
    let default_filter = if tray { TRAY_LOG_FILTER } else { CLI_LOG_FILTER };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file, guard) = match tray.then(Config::log_dir) {
        Some(Ok(log_dir)) => {
            let appender = tracing_appender::rolling::daily(log_dir, "gsr-tray.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}

fn print(text: String) {
    println!("{}", text);
}

fn block_on<F: std::future::Future<Output = AppResult<String>>>(future: F) -> AppResult<String> {
    tokio::runtime::Runtime::new()?.block_on(future)
}

/// Everything the runtime thread needs, handed over once the loop starts.
struct Startup {
    config: Config,
    config_path: PathBuf,
    menu_ids: TrayMenuIds,
    tray_proxy: EventLoopProxy<TrayCommand>,
}

fn run_tray() -> AppResult<()> {
    let config_path = Config::config_path()?;
    let config = Config::load_from(&config_path)?;

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = TrayManager::new()?;

    let mut startup = Some(Startup {
        config,
        config_path,
        menu_ids: tray_manager.menu_ids().clone(),
        tray_proxy: event_loop.create_proxy(),
    });

    // Dropping the service unregisters the hotkeys, so it lives in the closure.
    let mut shortcut_service: Option<ShortcutService> = None;
    let mut status_deadline: Option<Instant> = None;

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::UserEvent(TrayCommand::SetState(state)) => {
                status_deadline = None;
                if let Err(e) = tray_manager.update_state(state) {
                    error!(error = ?e, "Failed to update tray icon");
                }
            }
            Event::UserEvent(TrayCommand::ShowStatus(status)) => {
                status_deadline = Some(Instant::now() + STATUS_DURATION);
                if let Err(e) = tray_manager.show_status(&status) {
                    error!(error = ?e, "Failed to show tray status");
                }
            }
            Event::UserEvent(TrayCommand::Shutdown) => {
                *control_flow = ControlFlow::ExitWithCode(0);
                return;
            }
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                status_deadline = None;
                if let Err(e) = tray_manager.restore_status() {
                    error!(error = ?e, "Failed to restore tray status");
                }
            }
            Event::NewEvents(StartCause::Init) => {
                let Some(startup) = startup.take() else {
                    return;
                };

                // Registered on the main thread, which pumps the hotkey messages.
                let service = ShortcutService::probe();
                info!(strategy = service.name(), "Shortcut service selected");
                let bindings = service.bindings();
                shortcut_service = Some(service);

                // Tokio runtime on a separate thread; tray and hotkeys stay here.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async move {
                        let (command_tx, command_rx) = mpsc::channel(32);
                        let (shutdown_tx, shutdown_rx) = watch::channel(false);
                        let (session_tx, session_rx) = mpsc::unbounded_channel();

                        let session = RecordingSession::new(session_tx)
                            .with_grace_period(startup.config.recorder.grace_period());
                        let hotkey_handler = HotkeyHandler::new(bindings, command_tx);

                        let app = App {
                            config: startup.config,
                            config_path: startup.config_path,
                            session,
                            session_rx,
                            notifier: notifier::probe(),
                            tray: Box::new(startup.tray_proxy),
                            menu_ids: startup.menu_ids,
                            command_rx,
                            shutdown_tx,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep the hotkeys registered for the app's lifetime.
        let _ = &shortcut_service;

        *control_flow = match status_deadline {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    })
}
