pub mod handlers;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::filter::FilterMode;
use crate::storage::SnapshotFile;
use crate::store::TaskStore;

use state::{AppState, CalendarView};
use view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

pub fn run() -> Result<()> {
    // Panics inside the alternate screen are invisible; keep them on disk.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("taskdeck_panic.log")
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    // --- CONFIG & STORE ---
    let config = Config::load().unwrap_or_default();

    let snapshot = match &config.data_file {
        Some(path) => SnapshotFile::at(path.clone()),
        None => SnapshotFile::default_location()?,
    };
    let store = TaskStore::open(snapshot);

    let filter_mode = config
        .default_filter
        .as_deref()
        .and_then(FilterMode::from_label)
        .unwrap_or_default();
    let calendar_view = config
        .default_calendar_view
        .as_deref()
        .and_then(CalendarView::from_label)
        .unwrap_or(CalendarView::Week);

    // --- TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(store, filter_mode, calendar_view);
    let result = run_loop(&mut terminal, &mut app_state);

    // --- RESTORE TERMINAL ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    loop {
        state.sync_today();
        terminal.draw(|f| draw(f, state))?;

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if handlers::handle_key_event(key, state) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => handlers::handle_mouse_event(mouse.kind, state),
            _ => {}
        }
    }
}
