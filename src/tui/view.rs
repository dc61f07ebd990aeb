use crate::calendar::CalendarEvent;
use crate::form::FormField;
use crate::metrics::{overall_progress, tasks_per_day, this_week_progress, today_progress};
use crate::model::{Priority, Status};
use crate::tui::state::{AppState, CalendarView, Focus, InputMode};
use chrono::{Datelike, Duration, Months, NaiveDate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, List, ListItem, Paragraph,
        Wrap,
    },
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(v_chunks[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(9),
        ])
        .split(h_chunks[0]);

    draw_search_box(f, state, left_chunks[0]);
    draw_task_list(f, state, left_chunks[1]);
    draw_progress(f, state, left_chunks[2]);
    draw_chart(f, state, left_chunks[3]);
    draw_calendar(f, state, h_chunks[1]);
    draw_footer(f, state, v_chunks[1]);

    // Popups render last, over everything else.
    if state.mode == InputMode::Form {
        draw_form_dialog(f, state);
    }
    if state.details.is_some() {
        draw_details_dialog(f, state);
    }
}

fn draw_search_box(f: &mut Frame, state: &AppState, area: Rect) {
    let searching = state.mode == InputMode::Searching;
    let style = if searching {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let search = Paragraph::new(format!("/ {}", state.search_query))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    f.render_widget(search, area);

    if searching {
        let cursor_x = area.x + 1 + 2 + state.search_cursor as u16;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_task_list(f: &mut Frame, state: &mut AppState, area: Rect) {
    let task_items: Vec<ListItem> = state
        .tasks
        .iter()
        .map(|t| {
            let checkbox = match t.status {
                Status::Completed => "[x]",
                Status::InProgress => "[>]",
                Status::Pending => "[ ]",
            };

            let style = if t.status.is_completed() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                match t.priority {
                    Priority::High => Style::default().fg(Color::Red),
                    Priority::Medium => Style::default().fg(Color::Yellow),
                    Priority::Low => Style::default().fg(Color::Green),
                }
            };

            let due_str = match t.due_day() {
                Some(d) => format!(" ({})", d.format("%d/%m")),
                None => format!(" ({})", t.due_date),
            };

            let summary = format!("{} {}{}", checkbox, t.title, due_str);
            ListItem::new(Line::from(vec![Span::styled(summary, style)]))
        })
        .collect();

    let list_style = if state.focus == Focus::List {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let title = format!(
        " Tasks: {} ({}) ",
        state.filter_mode.label(),
        state.tasks.len()
    );
    let task_list = List::new(task_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(list_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(task_list, area, &mut state.list_state);
}

fn draw_progress(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Progress ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let all = state.store.tasks();
    let bars = [
        ("Overall", overall_progress(all), Color::Cyan),
        ("Today", today_progress(all, state.today), Color::Magenta),
        (
            "This Week",
            this_week_progress(all, state.today),
            Color::Blue,
        ),
    ];

    for (row, (name, percent, color)) in rows.iter().zip(bars) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(*row);
        f.render_widget(Paragraph::new(name), cells[0]);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio((percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.0}%", percent));
        f.render_widget(gauge, cells[1]);
    }
}

fn draw_chart(f: &mut Frame, state: &AppState, area: Rect) {
    let buckets = tasks_per_day(state.store.tasks());
    if buckets.is_empty() {
        let empty = Paragraph::new("No tasks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Tasks per Day "),
            );
        f.render_widget(empty, area);
        return;
    }

    let points: Vec<(f64, f64)> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (i as f64, b.count as f64))
        .collect();
    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    let x_max = (buckets.len() - 1).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("tasks")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let x_labels: Vec<String> = vec![
        buckets.first().map(|b| b.date.clone()).unwrap_or_default(),
        buckets.last().map(|b| b.date.clone()).unwrap_or_default(),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tasks per Day "),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, max_count as f64])
                .labels(vec!["0".to_string(), max_count.to_string()])
                .style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(chart, area);
}

fn draw_calendar(f: &mut Frame, state: &mut AppState, area: Rect) {
    let cal_style = if state.focus == Focus::Calendar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let title = match state.calendar_view {
        CalendarView::Day => format!(
            " Calendar [Day] {} ",
            state.cal_date.format("%A %d %B %Y")
        ),
        CalendarView::Week => {
            let monday = state.cal_date
                - Duration::days(i64::from(state.cal_date.weekday().num_days_from_monday()));
            format!(" Calendar [Week] of {} ", monday.format("%d %B %Y"))
        }
        CalendarView::Month => {
            format!(" Calendar [Month] {} ", state.cal_date.format("%B %Y"))
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(cal_style);

    match state.calendar_view {
        CalendarView::Month => {
            let inner = block.inner(area);
            f.render_widget(block, area);

            let mut lines = month_grid(state);
            lines.push(Line::from(""));
            let selected_count = state
                .events
                .iter()
                .filter(|e| e.start_day() == Some(state.cal_date))
                .count();
            lines.push(Line::from(Span::styled(
                format!(
                    "{} task(s) on {} (Enter opens the day)",
                    selected_count,
                    state.cal_date.format("%Y-%m-%d")
                ),
                Style::default().fg(Color::DarkGray),
            )));
            f.render_widget(Paragraph::new(lines), inner);
        }
        CalendarView::Day | CalendarView::Week => {
            let items: Vec<ListItem> = state
                .visible_events
                .iter()
                .map(|e| event_list_item(e, state.calendar_view))
                .collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::Blue),
            );
            f.render_stateful_widget(list, area, &mut state.event_state);
        }
    }
}

fn event_list_item(event: &CalendarEvent, view: CalendarView) -> ListItem<'static> {
    let color = hex_color(event.background);
    let prefix = match view {
        CalendarView::Week => event
            .start_day()
            .map(|d| format!("{} ", d.format("%a %d")))
            .unwrap_or_default(),
        _ => time_part(&event.start)
            .map(|t| format!("{} ", t))
            .unwrap_or_default(),
    };
    ListItem::new(Line::from(vec![
        Span::styled("■ ", Style::default().fg(color)),
        Span::raw(prefix),
        Span::styled(event.title.clone(), Style::default().fg(color)),
    ]))
}

/// "HH:MM" when the raw start string carries a time component.
fn time_part(start: &str) -> Option<&str> {
    let (_, time) = start.split_once('T')?;
    Some(time.get(0..5).unwrap_or(time))
}

fn month_grid(state: &AppState) -> Vec<Line<'static>> {
    let first = state
        .cal_date
        .with_day(1)
        .unwrap_or(state.cal_date);
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut lines = vec![Line::from(Span::styled(
        "Mo  Tu  We  Th  Fr  Sa  Su",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let mut spans: Vec<Span> = Vec::new();
    for _ in 0..lead {
        spans.push(Span::raw("    "));
    }

    for day in 1..=days_in_month(first) {
        let date = first.with_day(day).unwrap_or(first);
        let count = state
            .events
            .iter()
            .filter(|e| e.start_day() == Some(date))
            .count();

        let marker = if count > 0 { '*' } else { ' ' };
        let mut style = if count > 0 {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        if date == state.today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if date == state.cal_date {
            style = style.add_modifier(Modifier::REVERSED);
        }

        spans.push(Span::styled(format!("{:>2}{} ", day, marker), style));
        if (lead + day as usize) % 7 == 0 {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );

    let help_str = if state.details.is_some() {
        "x:Toggle Done | Esc:Close".to_string()
    } else {
        match state.mode {
            InputMode::Form => "Tab:Next Field | Enter:Save | Esc:Cancel".to_string(),
            InputMode::Searching => "Type to filter | Enter:Keep | Esc:Clear".to_string(),
            InputMode::Normal => match state.focus {
                Focus::List => {
                    "/:Find | a:Add | e:Edit | d:Del | Space:Done | f:Filter | Enter:Details | Tab:Cal | q:Quit"
                        .to_string()
                }
                Focus::Calendar => {
                    "v:View | [/]:Prev/Next | t:Today | Enter:Details | Tab:List | q:Quit"
                        .to_string()
                }
            },
        }
    };

    let help = Paragraph::new(help_str)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn draw_form_dialog(f: &mut Frame, state: &AppState) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let title = if state.form.is_editing() {
        " Edit Task "
    } else {
        " Add Task "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let fields = [
        (FormField::Title, "Title:    ", state.form.title.as_str()),
        (FormField::DueDate, "Due:      ", state.form.due_date.as_str()),
        (FormField::Details, "Details:  ", state.form.details.as_str()),
    ];

    for ((field, label, value), row) in fields.iter().zip(rows.iter()) {
        let focused = state.form.focus == *field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(format!("{}{}", label, value)).style(style),
            *row,
        );
        if focused {
            let cursor_x = row.x + label.chars().count() as u16 + state.form.cursor as u16;
            f.set_cursor_position((cursor_x, row.y));
        }
    }

    let prio_focused = state.form.focus == FormField::Priority;
    let prio_style = if prio_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    f.render_widget(
        Paragraph::new(format!("Priority: < {} >", state.form.priority.label())).style(prio_style),
        rows[3],
    );

    let hint = Paragraph::new("Due date: YYYY-MM-DD or YYYY-MM-DDTHH:MM")
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    f.render_widget(hint, rows[4]);
}

fn draw_details_dialog(f: &mut Frame, state: &AppState) {
    let Some(task) = &state.details else {
        return;
    };
    let area = centered_rect(60, 50, f.area());
    f.render_widget(Clear, area);

    let status_style = if task.status.is_completed() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title:    ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                task.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Due:      ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.due_date.clone()),
        ]),
        Line::from(vec![
            Span::styled("Priority: ", Style::default().fg(Color::DarkGray)),
            Span::raw(task.priority.label()),
        ]),
        Line::from(vec![
            Span::styled("Status:   ", Style::default().fg(Color::DarkGray)),
            Span::styled(task.status.label(), status_style),
        ]),
        Line::from(""),
    ];
    for detail_line in task.details.lines() {
        lines.push(Line::from(detail_line.to_string()));
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Task Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(details, area);
}

fn hex_color(hex: &str) -> Color {
    let raw = hex.strip_prefix('#').unwrap_or(hex);
    if raw.len() != 6 {
        return Color::White;
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&raw[range], 16);
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

/// Helper function to create a centered rect using up certain percentages of the available rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(hex_color("#ff5252"), Color::Rgb(0xff, 0x52, 0x52));
        assert_eq!(hex_color("#000000"), Color::Rgb(0, 0, 0));
        assert_eq!(hex_color("nonsense"), Color::White);
    }

    #[test]
    fn test_time_part() {
        assert_eq!(time_part("2025-01-01T09:30"), Some("09:30"));
        assert_eq!(time_part("2025-01-01T09:30:15"), Some("09:30"));
        assert_eq!(time_part("2025-01-01"), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()),
            28
        );
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
            29
        );
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()),
            31
        );
    }
}
