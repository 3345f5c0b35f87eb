// gym-tracker-tui/src/ui/progress_tab.rs
use crate::app::App;
use gym_tracker_lib::{model::format_weight, ChartError, ChartProjection};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_progress_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    render_exercise_list(f, app, chunks[0]);

    let title = app
        .selected_progress_exercise()
        .map_or_else(|| "Progress".to_string(), |name| format!("Progress: {name}"));
    let block = Block::default().borders(Borders::ALL).title(title);

    match &app.progress_projection {
        Some(Ok(projection)) => render_chart(f, projection, block, chunks[1]),
        Some(Err(ChartError::InsufficientData { .. })) => {
            render_message(f, "Add at least 2 logs for this exercise to see a graph.", block, chunks[1]);
        }
        None => render_message(f, "Log a lift or add exercises to the schedule first.", block, chunks[1]),
    }
}

fn render_exercise_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .progress_exercises
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Exercises")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.progress_list_state);
}

fn render_message(f: &mut Frame, message: &str, block: Block, area: Rect) {
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, projection: &ChartProjection, block: Block, area: Rect) {
    let geometry = projection.geometry;
    // Plot weights directly so the terminal y axis needs no inversion
    let data: Vec<(f64, f64)> = projection.points.iter().map(|p| (p.x, p.weight)).collect();

    let datasets = vec![
        Dataset::default()
            .name("Weight")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&data),
    ];

    let x_labels = match (projection.points.first(), projection.points.last()) {
        (Some(first), Some(last)) => vec![Span::from(first.date_label()), Span::from(last.date_label())],
        _ => Vec::new(),
    };
    let [low, high] = projection.weight_bounds();
    let y_labels = [low, (low + high) / 2.0, high]
        .into_iter()
        .map(|w| Span::from(format!("{w:.1}")))
        .collect();

    let latest = projection
        .points
        .last()
        .map(|p| format!(" latest {}kg ", format_weight(p.weight)))
        .unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block.title_bottom(latest))
        .x_axis(
            Axis::default()
                .title("Date".italic())
                .style(Style::default().fg(Color::Gray))
                .bounds([geometry.padding, geometry.width - geometry.padding])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Weight (kg)".italic())
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}
