// gym-tracker-tui/src/ui/schedule_tab.rs
use crate::{
    app::{state::ScheduleFocus, App},
    ui::layout::focus_style,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, List, ListItem, Row, Table},
    Frame,
};

pub fn render_schedule_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_day_list(f, app, chunks[0]);
    render_exercise_table(f, app, chunks[1]);
}

fn render_day_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .tracker
        .week(app.schedule_week)
        .iter()
        .map(|day| ListItem::new(format!("{}: {}", day.day, day.focus)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ([w] to switch)", app.schedule_week))
        .border_style(focus_style(app.schedule_focus == ScheduleFocus::DayList));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.schedule_day_state);
}

fn render_exercise_table(f: &mut Frame, app: &mut App, area: Rect) {
    let day = app.tracker.week(app.schedule_week).get(app.selected_day_index());
    let title = day.map_or_else(
        || "No day selected".to_string(),
        |d| format!("{} - {}", d.day, d.focus),
    );

    let header = Row::new(
        ["Exercise", "Sets", "Reps"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = day
        .map(|d| {
            d.exercises
                .iter()
                .map(|ex| {
                    Row::new(vec![
                        Cell::from(ex.name.clone()),
                        Cell::from(ex.sets.clone()),
                        Cell::from(ex.reps.clone()),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(60),
            Constraint::Percentage(15),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(focus_style(app.schedule_focus == ScheduleFocus::ExerciseTable)),
    )
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.schedule_exercise_state);
}
