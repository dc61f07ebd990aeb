// File: src/tui/handlers.rs
use crate::form::{FormField, TaskForm};
use crate::tui::state::{AppState, CalendarView, Focus, InputMode};
use crossterm::event::{KeyCode, KeyEvent, MouseEventKind};

/// Dispatches one key event. Returns true when the app should quit.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> bool {
    // An open details popup swallows keys before anything else.
    if state.details.is_some() {
        match key.code {
            KeyCode::Char('x') | KeyCode::Char(' ') => {
                if let Some(task) = state.details.take() {
                    state.store.toggle_status(task.id);
                    state.refresh_filtered_view();
                    state.message = format!("Toggled \"{}\".", task.title);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                state.details = None;
            }
            _ => {}
        }
        return false;
    }

    match state.mode {
        InputMode::Form => handle_form_key(key, state),
        InputMode::Searching => handle_search_key(key, state),
        InputMode::Normal => return handle_normal_key(key, state),
    }
    false
}

fn handle_form_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => {
            if state.form.is_editing() {
                // Invalid drafts keep the dialog open, silently.
                if let Some(updated) = state.form.as_update() {
                    let title = updated.title.clone();
                    state.store.update(updated);
                    state.form.clear();
                    state.mode = InputMode::Normal;
                    state.refresh_filtered_view();
                    state.message = format!("Updated \"{}\".", title);
                }
            } else if let Some(input) = state.form.as_input() {
                if let Some(task) = state.store.add(input) {
                    state.message = format!("Added \"{}\".", task.title);
                }
                state.form.clear();
                state.mode = InputMode::Normal;
                state.refresh_filtered_view();
            }
        }
        KeyCode::Esc => {
            // Cancel discards the draft without touching the store.
            state.form.clear();
            state.mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => state.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.form.focus_previous(),
        KeyCode::Left => {
            if state.form.focus == FormField::Priority {
                state.form.cycle_priority();
            } else {
                state.form.move_cursor_left();
            }
        }
        KeyCode::Right => {
            if state.form.focus == FormField::Priority {
                state.form.cycle_priority();
            } else {
                state.form.move_cursor_right();
            }
        }
        KeyCode::Char(' ') if state.form.focus == FormField::Priority => {
            state.form.cycle_priority();
        }
        KeyCode::Char(c) => state.form.enter_char(c),
        KeyCode::Backspace => state.form.delete_char(),
        _ => {}
    }
}

fn handle_search_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter => state.mode = InputMode::Normal,
        KeyCode::Esc => {
            state.reset_search();
            state.mode = InputMode::Normal;
            state.refresh_filtered_view();
        }
        KeyCode::Char(c) => {
            state.enter_search_char(c);
            state.refresh_filtered_view();
        }
        KeyCode::Backspace => {
            state.delete_search_char();
            state.refresh_filtered_view();
        }
        KeyCode::Left => state.move_search_cursor_left(),
        KeyCode::Right => state.move_search_cursor_right(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
}

fn handle_normal_key(key: KeyEvent, state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            state.focus = Focus::List;
            state.mode = InputMode::Searching;
        }
        KeyCode::Char('a') => {
            state.form.clear();
            state.mode = InputMode::Form;
        }
        KeyCode::Char('e') => {
            // Seed the draft from the canonical task, wherever the
            // selection came from.
            let target = selected_id(state).and_then(|id| state.store.get(id)).cloned();
            if let Some(task) = target {
                state.form = TaskForm::seed(&task);
                state.mode = InputMode::Form;
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = selected_id(state) {
                state.store.remove(id);
                state.refresh_filtered_view();
                state.message = "Task deleted.".to_string();
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = selected_id(state) {
                state.store.toggle_status(id);
                state.refresh_filtered_view();
            }
        }
        KeyCode::Char('f') => {
            state.filter_mode = state.filter_mode.next();
            state.refresh_filtered_view();
        }
        KeyCode::Char('F') => {
            state.filter_mode = state.filter_mode.previous();
            state.refresh_filtered_view();
        }
        KeyCode::Char('v') => state.cycle_calendar_view(),
        KeyCode::Char('[') => state.shift_period(-1),
        KeyCode::Char(']') => state.shift_period(1),
        KeyCode::Char('t') => state.jump_to_today(),
        KeyCode::Tab => state.toggle_focus(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Left => {
            if state.focus == Focus::Calendar {
                if state.calendar_view == CalendarView::Month {
                    state.move_cal_day(-1);
                } else {
                    state.shift_period(-1);
                }
            }
        }
        KeyCode::Right => {
            if state.focus == Focus::Calendar {
                if state.calendar_view == CalendarView::Month {
                    state.move_cal_day(1);
                } else {
                    state.shift_period(1);
                }
            }
        }
        KeyCode::Enter => match state.focus {
            Focus::List => {
                state.details = state.get_selected_task().cloned();
            }
            Focus::Calendar => match state.calendar_view {
                // Enter on a month cell drills into that day.
                CalendarView::Month => {
                    state.calendar_view = CalendarView::Day;
                    state.refresh_filtered_view();
                }
                _ => {
                    // The detail record comes from the event projection,
                    // not a store lookup.
                    state.details = state.get_selected_event().map(|e| e.to_task());
                }
            },
        },
        _ => {}
    }
    false
}

pub fn handle_mouse_event(kind: MouseEventKind, state: &mut AppState) {
    match kind {
        MouseEventKind::ScrollDown => state.next(),
        MouseEventKind::ScrollUp => state.previous(),
        _ => {}
    }
}

fn selected_id(state: &AppState) -> Option<i64> {
    match state.focus {
        Focus::List => state.get_selected_task().map(|t| t.id),
        Focus::Calendar => state.get_selected_event().map(|e| e.meta.id),
    }
}
