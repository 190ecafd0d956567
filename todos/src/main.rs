//! `todos` -- terminal todo list with optimistic editing.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/todos/config.toml`).
//!
//! ```bash
//! # Offline demo against a seeded in-process store
//! cargo run --bin todos -- --demo
//!
//! # Against a running todos-server
//! cargo run --bin todos -- --base-url http://127.0.0.1:8080 --owner-id 1
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use todos::app::App;
use todos::config::{CliArgs, ClientConfig};
use todos::controller::{Controller, ControllerConfig};
use todos::store::http::HttpStore;
use todos::store::memory::InMemoryStore;
use todos::store::{Operation, RemoteStore};
use todos::ui;
use todos_proto::task::{OwnerId, Task, TaskId};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };

    // Logs go to a file, never stdout, since ratatui owns the terminal.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    if cli.demo {
        let controller_config = config.controller_config().unwrap_or_else(|_| {
            let mut fallback = ControllerConfig::new(OwnerId::new(1));
            fallback.session_policy = config.session_policy;
            fallback.busy_release = config.busy_release;
            fallback.initial_filter = config.initial_filter;
            fallback
        });
        tracing::info!(owner = %controller_config.owner, "todos starting in demo mode");
        let store = Arc::new(demo_store(controller_config.owner));
        return run(Controller::new(store, controller_config), &config).await;
    }

    let controller_config = match config.controller_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };
    let store = match HttpStore::with_timeout(&config.base_url, config.request_timeout) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: invalid base URL {}: {e}", config.base_url);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
        }
    };
    tracing::info!(
        owner = %controller_config.owner,
        base_url = %config.base_url,
        "todos starting"
    );
    run(Controller::new(Arc::new(store), controller_config), &config).await
}

/// Set up the terminal, run the loop, and always restore the terminal.
async fn run<S: RemoteStore>(controller: Controller<S>, config: &ClientConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, controller, config.poll_timeout).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("todos exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todos.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app<S: RemoteStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut controller: Controller<S>,
    poll_timeout: Duration,
) -> io::Result<()> {
    let mut app = App::new();
    controller.start();

    loop {
        // Step 1: Apply every completion that has arrived.
        controller.drain();

        // Step 2: Draw from a fresh snapshot.
        let view = controller.view();
        app.sync(&view);
        terminal.draw(|frame| ui::draw(frame, &app, &view))?;

        // Step 3: Poll for terminal input and dispatch the resulting intents.
        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            for intent in app.handle_key_event(key, &view) {
                controller.handle(intent);
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned requests make progress between frames.
        tokio::task::yield_now().await;
    }
}

/// A seeded store with a little latency so busy markers are visible.
fn demo_store(owner: OwnerId) -> InMemoryStore {
    let seed = [
        ("Read the manual", true),
        ("Write the report", false),
        ("Water the plants", false),
        ("Book train tickets", true),
    ];
    let tasks = seed
        .iter()
        .zip(1_u64..)
        .map(|((title, completed), id)| Task {
            id: TaskId::new(id),
            user_id: owner,
            title: (*title).to_string(),
            completed: *completed,
        })
        .collect();
    let store = InMemoryStore::with_tasks(tasks);
    for op in [
        Operation::FetchAll,
        Operation::Create,
        Operation::UpdateTitle,
        Operation::UpdateStatus,
        Operation::Delete,
    ] {
        store.delay(op, Duration::from_millis(400));
    }
    store
}
