// gym-tracker-tui/src/ui/log_tab.rs
use crate::app::App;
use gym_tracker_lib::model::format_weight;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub fn render_log_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Weight Log (newest first)")
        .border_style(Style::default().fg(Color::Yellow));

    let logs = app.tracker.logs();
    if logs.is_empty() {
        let placeholder = Paragraph::new("No logs yet. Press [a] to record a lift.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(
        ["Date", "Exercise", "Weight (kg)"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = logs
        .iter()
        .map(|entry| {
            let weight = if entry.weight.is_nan() {
                Cell::from("?").style(Style::default().fg(Color::Red))
            } else {
                Cell::from(format_weight(entry.weight))
            };
            Row::new(vec![
                Cell::from(entry.date.format("%Y-%m-%d").to_string()),
                Cell::from(entry.exercise.clone()),
                weight,
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(60),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.log_table_state);
}
