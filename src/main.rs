use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use device_monitor::app::{poll_event, Action, AppEvent, AppState, Config, ViewMode};
use device_monitor::monitor::MonitorSession;
use device_monitor::telemetry::DeviceProfile;
use device_monitor::ui;
use device_monitor::ui::{SelectionDialog, SelectionDialogKind};

/// Device Monitor - TUI serial monitor for IoT device firmwares
#[derive(Parser)]
#[command(name = "device-monitor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Serial port to preselect (e.g. /dev/ttyUSB0)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Device firmware to monitor
    #[arg(short, long, value_enum)]
    device: Option<DeviceArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeviceArg {
    Feeder,
    Home,
}

impl From<DeviceArg> for DeviceProfile {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Feeder => DeviceProfile::Feeder,
            DeviceArg::Home => DeviceProfile::Home,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ログ初期化
    init_logging(&cli.log_level)?;

    run_tui(cli)
}

fn init_logging(level: &str) -> Result<()> {
    let log_dir = directories::ProjectDirs::from("", "", "device-monitor")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("device-monitor"));

    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("device-monitor.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(log_file))
        .init();

    info!("Device Monitor starting");
    Ok(())
}

fn run_tui(cli: Cli) -> Result<()> {
    // 設定を先に読み込む（ファイルがなければ作成）
    let config = Config::load().unwrap_or_default();

    // CLI引数が設定より優先
    let profile = cli
        .device
        .map(DeviceProfile::from)
        .unwrap_or(config.default_device);
    let baud = cli.baud.unwrap_or(config.default_baud);
    let preselect_port = cli.port.or(config.default_port);

    // The reader worker uses blocking_send and the UI loop uses try_recv,
    // so no runtime is needed for this channel.
    let (tx, rx) = tokio::sync::mpsc::channel::<AppEvent>(256);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = AppState::new(profile, baud, config.transcript_limit);
    state.refresh_ports();
    if let Some(port) = preselect_port {
        if state.ports.contains(&port) {
            state.selected_port = Some(port);
        } else {
            state.status_message = Some(format!("Configured port {} not found", port));
        }
    }

    let result = run_app(&mut terminal, &mut state, tx, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    tx: tokio::sync::mpsc::Sender<AppEvent>,
    mut rx: tokio::sync::mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut session: Option<MonitorSession> = None;

    loop {
        // ワーカーからのイベントを取り込む（ノンブロッキング）
        while let Ok(event) = rx.try_recv() {
            handle_worker_event(state, &mut session, event);
        }

        terminal.draw(|frame| {
            ui::render(frame, state);
        })?;

        if let Some(event) = poll_event(Duration::from_millis(100))? {
            match state.view_mode {
                ViewMode::Selection => {
                    if let AppEvent::Key(key) = event {
                        handle_selection_event(state, key);
                    }
                }
                _ => match event {
                    AppEvent::Key(key) => {
                        let action = Action::from(key);
                        handle_action(state, &mut session, &tx, action);
                    }
                    AppEvent::Resize(_, _) => {}
                    _ => {}
                },
            }
        }

        if state.should_quit {
            break;
        }
    }

    if let Some(mut session) = session {
        session.stop();
    }

    Ok(())
}

/// ワーカースレッドからのイベント処理
fn handle_worker_event(
    state: &mut AppState,
    session: &mut Option<MonitorSession>,
    event: AppEvent,
) {
    match event {
        AppEvent::Telemetry { raw, snapshot } => {
            state.apply_telemetry(raw, snapshot);
        }
        AppEvent::SessionEnded { reason } => {
            if state.monitoring {
                state.end_session(reason);
            }
            *session = None;
        }
        _ => {}
    }
}

/// 選択モードでのキーイベント処理
fn handle_selection_event(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            state.close_dialog();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(ref mut dialog) = state.selection_dialog {
                dialog.move_up();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(ref mut dialog) = state.selection_dialog {
                dialog.move_down();
            }
        }
        KeyCode::Enter => {
            let choice = state
                .selection_dialog
                .as_ref()
                .and_then(|d| d.selected_item().map(|item| (d.kind, item.to_string())));

            if let Some((kind, item)) = choice {
                match kind {
                    SelectionDialogKind::SelectPort => {
                        state.selected_port = Some(item.clone());
                        state.status_message = Some(format!("Port: {}", item));
                    }
                    SelectionDialogKind::SelectBaud => {
                        if let Ok(baud) = item.parse::<u32>() {
                            state.baud = baud;
                            state.status_message = Some(format!("Baud rate: {}", baud));
                        }
                    }
                }
            }
            state.close_dialog();
        }
        _ => {}
    }
}

fn handle_action(
    state: &mut AppState,
    session: &mut Option<MonitorSession>,
    tx: &tokio::sync::mpsc::Sender<AppEvent>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => {
            state.view_mode = if state.view_mode == ViewMode::Help {
                ViewMode::Dashboard
            } else {
                ViewMode::Help
            };
        }
        Action::Back => {
            if state.view_mode != ViewMode::Dashboard {
                state.view_mode = ViewMode::Dashboard;
                state.selection_dialog = None;
            }
        }
        Action::StartMonitor => {
            if state.monitoring {
                state.status_message = Some("Already monitoring".to_string());
                return;
            }
            let Some(port) = state.selected_port.clone() else {
                state.status_message = Some("No serial port selected".to_string());
                return;
            };
            match MonitorSession::start(&port, state.baud, state.profile, tx.clone()) {
                Ok(s) => {
                    *session = Some(s);
                    state.begin_session();
                    state.status_message =
                        Some(format!("Monitoring {} at {} baud", port, state.baud));
                }
                Err(e) => {
                    state.status_message = Some(format!("Could not open {}: {:#}", port, e));
                }
            }
        }
        Action::StopMonitor => {
            if let Some(mut s) = session.take() {
                s.stop();
            }
            if state.monitoring {
                state.end_session(None);
            }
        }
        Action::SelectPort => {
            state.refresh_ports();
            if state.ports.is_empty() {
                state.status_message = Some("No serial ports found".to_string());
            } else {
                state.open_dialog(SelectionDialog::new_port_select(state.ports.clone()));
            }
        }
        Action::SelectBaud => {
            state.open_dialog(SelectionDialog::new_baud_select(state.baud));
        }
        Action::ToggleProfile => {
            state.toggle_profile();
        }
        Action::RefreshPorts => {
            state.refresh_ports();
            state.status_message = Some(format!("Found {} ports", state.ports.len()));
        }
        Action::ClearTranscript => {
            state.clear_transcript();
            state.status_message = Some("Data stream cleared".to_string());
        }
        // ダイアログ外では移動キーは何もしない
        Action::MoveUp | Action::MoveDown | Action::Select => {}
        Action::None => {}
    }
}
