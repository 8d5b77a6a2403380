use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use thread_lens::{
    app::{update, update::select_thread, AppState},
    cli::{init_logging, Cli},
    event::AppEvent,
    shell::Shell,
    store::{JsonFileHistory, SqliteThreadStore, ThreadHistory, ThreadStore},
    view::render,
};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = cli.paths();

    init_logging(&paths.log_file, cli.default_log_filter())
        .map_err(|e| eyre!("failed to open log file {}: {}", paths.log_file.display(), e))?;
    tracing::info!(data = %paths.database.display(), feeds = %paths.feed_dir.display(), "starting");

    let store = SqliteThreadStore::open(&paths.database)
        .map_err(|e| eyre!("failed to open {}: {}", paths.database.display(), e))?;
    let history = JsonFileHistory::new(paths.history.clone());

    let (feed_tx, feed_rx) = mpsc::channel::<AppEvent>();
    let mut shell = Shell::new(store, history, paths, feed_tx);

    let mut state = AppState::new();
    match shell.load_threads() {
        Ok(event) => update(&mut state, event),
        Err(error) => update(
            &mut state,
            AppEvent::Error {
                source: "startup".to_string(),
                error,
            },
        ),
    }
    if let Some(thread_id) = cli.initial_thread() {
        select_thread(&mut state, thread_id);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(250);
    let result = run_event_loop(&mut terminal, &mut state, &mut shell, &feed_rx, tick_rate);

    // Restore the terminal even if the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

/// Main event loop following Elm Architecture.
fn run_event_loop<S: ThreadStore, H: ThreadHistory>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    shell: &mut Shell<S, H>,
    feed_rx: &mpsc::Receiver<AppEvent>,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        run_actions(state, shell);

        terminal.draw(|frame| render(state, frame))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    update(state, AppEvent::Key(key));
                }
            }
        }

        while let Ok(event) = feed_rx.try_recv() {
            update(state, event);
        }

        if last_tick.elapsed() >= tick_rate {
            update(state, AppEvent::Tick(Utc::now()));
            last_tick = Instant::now();
        }

        if state.meta.should_quit {
            break;
        }
    }

    Ok(())
}

/// Execute queued actions until none remain; results may queue more.
fn run_actions<S: ThreadStore, H: ThreadHistory>(state: &mut AppState, shell: &mut Shell<S, H>) {
    loop {
        let actions = state.take_actions();
        if actions.is_empty() {
            return;
        }
        for action in actions {
            tracing::debug!(?action, "executing action");
            for event in shell.execute(action) {
                update(state, event);
            }
        }
    }
}
