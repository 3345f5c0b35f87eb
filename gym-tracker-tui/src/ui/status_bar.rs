// gym-tracker-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, ActiveTab, App};
use gym_tracker_lib::CoachState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.active_modal {
        ActiveModal::None => match app.active_tab {
            ActiveTab::Schedule => {
                " [Tab] Focus | [↑↓/jk] Nav | [w] Switch Week | [e/Enter] Edit Day | [?] Help | [q] Quit "
            }
            ActiveTab::Log => " [↑↓/jk] Nav | [a]dd | [d]elete | [g]raph | [?] Help | [q] Quit ",
            ActiveTab::Progress => " [↑↓/jk] Select Exercise | [?] Help | [q] Quit ",
            ActiveTab::Coach => match app.coach.as_ref().map(|c| c.state()) {
                Some(CoachState::AwaitingReply) => " Coach is typing... | [PgUp/PgDn] Scroll ",
                _ => " [Enter] Send | [F5-F8] Quick Prompts | [Ctrl-L] Include Logs | [Ctrl-C] Quit ",
            },
        },
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::EditDay { .. } => {
            " [Esc] Cancel | [Tab/↑↓] Navigate | [←→] Column | [Ins] Add | [Del] Remove "
        }
        ActiveModal::AddLog { .. } => {
            " [Esc] Cancel | [Enter] Confirm | [Tab] Navigate | [↑↓] Suggestions "
        }
        ActiveModal::ConfirmDeleteLog { .. } => " [y/Enter] Delete | [n/Esc] Keep ",
    };

    let error_text = app.last_error.as_deref().unwrap_or("");

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(80), Constraint::Percentage(20)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    let error_paragraph = Paragraph::new(error_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Red))
        .alignment(Alignment::Right);
    f.render_widget(error_paragraph, status_chunks[1]);
}
