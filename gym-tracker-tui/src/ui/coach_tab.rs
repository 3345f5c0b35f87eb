// gym-tracker-tui/src/ui/coach_tab.rs
use crate::app::App;
use gym_tracker_lib::{ChatRole, CoachState, QuickPrompt};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render_coach_tab(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Transcript
            Constraint::Length(1), // Quick prompts
            Constraint::Length(3), // Input
        ])
        .split(area);

    render_transcript(f, app, chunks[0]);
    render_quick_prompts(f, chunks[1]);
    render_input(f, app, chunks[2]);
}

fn render_transcript(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("AI Coach")
        .border_style(Style::default().fg(Color::Yellow));

    let Some(session) = app.coach.as_ref() else {
        let reason = app.coach_unavailable.as_deref().unwrap_or("Coach is unavailable.");
        let paragraph = Paragraph::new(vec![
            Line::from(reason.to_string()).red(),
            Line::from(""),
            Line::from("Set GEMINI_API_KEY or coach.api_key in the config file and restart."),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(paragraph, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for message in session.transcript() {
        let (speaker, style) = match message.role {
            ChatRole::User => ("You", Style::default().fg(Color::Cyan)),
            ChatRole::Model => ("Coach", Style::default().fg(Color::Green)),
        };
        lines.push(Line::from(Span::styled(
            format!("{speaker}:"),
            style.add_modifier(Modifier::BOLD),
        )));
        lines.extend(message.text.lines().map(|l| Line::from(l.to_string())));
        lines.push(Line::from(""));
    }
    if session.state() == CoachState::AwaitingReply {
        lines.push(Line::from("Coach is typing...").italic().dark_gray());
    }

    // Scroll so the newest lines sit at the bottom, then back off by the user's offset
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let wrapped_height: usize = lines
        .iter()
        .map(|l| l.width().max(1).div_ceil(inner_width))
        .sum();
    let bottom = wrapped_height.saturating_sub(inner_height);
    let offset = bottom.saturating_sub(app.coach_scroll as usize);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_quick_prompts(f: &mut Frame, area: Rect) {
    let spans: Vec<Span> = [
        ("F5", QuickPrompt::Shorten),
        ("F6", QuickPrompt::Meal),
        ("F7", QuickPrompt::Analyze),
        ("F8", QuickPrompt::Form),
    ]
    .into_iter()
    .flat_map(|(key, prompt)| {
        [
            Span::styled(format!(" [{key}] "), Style::default().fg(Color::Yellow)),
            Span::raw(prompt.label()),
        ]
    })
    .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let busy = app.coach.as_ref().is_some_and(|c| c.is_busy());
    let title = if app.coach_include_logs {
        "Ask the coach (recent logs included)"
    } else {
        "Ask the coach"
    };
    let style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let input = Paragraph::new(format!("{}_", app.coach_input))
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(input, area);
}
