use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use tgdrive::api::DriveClient;
use tgdrive::clipboard::ClipboardChain;
use tgdrive::config::{find_config_path, Config};
use tgdrive::handlers;
use tgdrive::messages::{Command, Msg};
use tgdrive::model::Model;
use tgdrive::services::api::{spawn_api_service, ApiRequest, ApiResponse};
use tgdrive::services::transfers::{TransferEvent, Transfers};
use tgdrive::{logging, utils};

mod input;
mod ui;

use input::KeyMapper;

/// Terminal client for a Telegram-backed file drive
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to tgdrive-debug.log in the temp dir
    #[arg(short, long)]
    debug: bool,

    /// Enable vim keybindings (jk, gg/G)
    #[arg(long)]
    vim: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Files to upload right away
    files: Vec<PathBuf>,
}

/// Runtime: owns the model, the channels and every side effect
struct App {
    model: Model,
    base_url: String,
    api_tx: mpsc::UnboundedSender<ApiRequest>,
    api_rx: mpsc::UnboundedReceiver<ApiResponse>,
    transfer_rx: mpsc::UnboundedReceiver<TransferEvent>,
    transfers: Transfers,
    clipboard: ClipboardChain,
    keys: KeyMapper,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let client = DriveClient::new(
            config.base_url.clone(),
            &config.session_cookie,
            config.request_timeout(),
        )
        .context("Failed to create HTTP client")?;

        let (api_tx, api_rx) = spawn_api_service(client.clone(), config.list_limit);
        let (transfer_tx, transfer_rx) = mpsc::unbounded_channel();
        let transfers = Transfers::new(client.clone(), config.download_dir(), transfer_tx);

        Ok(Self {
            model: Model::new(config.vim_mode),
            base_url: client.base_url().to_string(),
            api_tx,
            api_rx,
            transfer_rx,
            transfers,
            clipboard: ClipboardChain::new(config.clipboard_command.as_deref()),
            keys: KeyMapper::default(),
        })
    }

    /// Run a message through `update`, then every command it produces,
    /// until nothing follows up
    fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            for command in handlers::update(&mut self.model, msg) {
                queue.extend(self.execute(command));
            }
        }
    }

    fn send_api(&self, request: ApiRequest) {
        if self.api_tx.send(request).is_err() {
            tracing::error!("api worker is gone");
        }
    }

    fn execute(&mut self, command: Command) -> Vec<Msg> {
        tracing::trace!(?command, "executing command");

        match command {
            Command::FetchFiles { sort, direction } => {
                self.send_api(ApiRequest::ListFiles { sort, direction });
                Vec::new()
            }
            Command::ResolvePaths(paths) => resolve_paths(paths),
            Command::StartUpload { client_id, file } => {
                self.transfers.spawn_upload(client_id, file);
                Vec::new()
            }
            Command::StartDownload {
                file_id,
                name,
                size,
            } => {
                self.transfers.spawn_download(file_id, name, size);
                Vec::new()
            }
            Command::Delete { file_id } => {
                self.send_api(ApiRequest::DeleteFile { file_id });
                Vec::new()
            }
            Command::Share { file_id } => {
                self.send_api(ApiRequest::Share { file_id });
                Vec::new()
            }
            Command::Revoke { file_id } => {
                self.send_api(ApiRequest::RevokeShare { file_id });
                Vec::new()
            }
            Command::CopyLink(link) => vec![Msg::LinkCopied(self.clipboard.copy(&link))],
            Command::Logout => {
                self.send_api(ApiRequest::Logout);
                Vec::new()
            }
        }
    }
}

/// Stat every path; usable files come back together, failures one by one
fn resolve_paths(paths: Vec<PathBuf>) -> Vec<Msg> {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        match utils::local_file(&path) {
            Ok(file) => files.push(file),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot upload path");
                failures.push(Msg::PickFailed {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    let mut msgs = Vec::new();
    if !files.is_empty() {
        msgs.push(Msg::FilesPicked(files));
    }
    msgs.extend(failures);
    msgs
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    logging::init_logging(args.debug, &utils::get_debug_log_path())?;

    // Determine config file path
    let config_path = find_config_path(args.config)?;
    tracing::debug!(path = %config_path.display(), "loading config");

    let mut config = Config::load(&config_path)?;

    // Override config with CLI flags
    if args.vim {
        config.vim_mode = true;
    }

    let mut app = App::new(config)?;

    // Initial listing, then anything passed on the command line
    app.dispatch(Msg::Refresh);
    if !args.files.is_empty() {
        for msg in resolve_paths(args.files) {
            app.dispatch(msg);
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app with error handler
    let result = run_app(&mut terminal, &mut app).await;

    // Stop transfers still in flight
    app.transfers.shutdown();

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Return result after cleanup
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, &app.model, &app.base_url))?;

        // Toast dismissal and download row resets
        app.dispatch(Msg::Tick(Instant::now()));

        if app.model.ui.should_quit {
            break;
        }

        // Process API responses (non-blocking)
        while let Ok(response) = app.api_rx.try_recv() {
            app.dispatch(Msg::Api(response));
        }

        // Process transfer progress (non-blocking)
        while let Ok(event) = app.transfer_rx.try_recv() {
            app.dispatch(Msg::Transfer(event));
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(msg) = app.keys.map(&app.model, key) {
                        app.dispatch(msg);
                    }
                }
                // Terminals deliver dropped files as pasted paths
                Event::Paste(text) => app.dispatch(Msg::Pasted(text)),
                _ => {}
            }
        }

        if app.model.ui.should_quit {
            break;
        }
    }

    Ok(())
}
