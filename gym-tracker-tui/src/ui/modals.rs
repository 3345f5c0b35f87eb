// gym-tracker-tui/src/ui/modals.rs
use crate::{
    app::{
        state::{AddLogField, EditDayField},
        ActiveModal, App,
    },
    ui::layout::centered_rect,
};
use gym_tracker_lib::ExerciseField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_modal(f: &mut Frame, app: &App) {
    match &app.active_modal {
        ActiveModal::Help => render_help_modal(f),
        ActiveModal::EditDay { .. } => render_edit_day_modal(f, app),
        ActiveModal::AddLog { .. } => render_add_log_modal(f, app),
        ActiveModal::ConfirmDeleteLog { .. } => render_confirm_delete_modal(f, app),
        ActiveModal::None => {} // Should not happen if called correctly
    }
}

fn highlight_if(focused: bool) -> Style {
    if focused {
        Style::default().reversed()
    } else {
        Style::default()
    }
}

fn render_buttons(f: &mut Frame, area: Rect, ok_label: &str, ok_focused: bool, cancel_focused: bool) {
    let button_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ok_button = Paragraph::new(format!(" {ok_label} "))
        .alignment(Alignment::Center)
        .style(highlight_if(ok_focused));
    f.render_widget(ok_button, button_layout[0]);

    let cancel_button = Paragraph::new(" Cancel ")
        .alignment(Alignment::Center)
        .style(highlight_if(cancel_focused));
    f.render_widget(cancel_button, button_layout[1]);
}

fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let help_text = vec![
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" q: Quit Application (Ctrl-C anywhere)"),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" F1-F4: Switch Tabs"),
        Line::from(""),
        Line::from("--- Schedule Tab (F1) ---").style(Style::new().bold().underlined()),
        Line::from(" k/j / ↑/↓: Navigate"),
        Line::from(" Tab: Switch Focus (Days <=> Exercises)"),
        Line::from(" w: Switch Between Week 1 and Week 2"),
        Line::from(" e / Enter: Edit Selected Day"),
        Line::from("   in the editor: Ins adds, Del removes, ←→ picks Name/Sets/Reps"),
        Line::from("   nothing is saved until you choose Save; Esc discards"),
        Line::from(""),
        Line::from("--- Log Tab (F2) ---").style(Style::new().bold().underlined()),
        Line::from(" k/j / ↑/↓: Navigate"),
        Line::from(" a: Log a Weight"),
        Line::from(" d / Delete: Delete Selected Entry"),
        Line::from(" g: Graph the Selected Entry's Exercise"),
        Line::from(""),
        Line::from("--- Progress Tab (F3) ---").style(Style::new().bold().underlined()),
        Line::from(" k/j / ↑/↓: Choose Exercise"),
        Line::from(""),
        Line::from("--- Coach Tab (F4) ---").style(Style::new().bold().underlined()),
        Line::from(" Type and press Enter to ask; Esc clears the input"),
        Line::from(" F5-F8: Quick Prompts"),
        Line::from(" Ctrl-L: Include Recent Logs in the Question"),
        Line::from(" PgUp/PgDn: Scroll the Conversation"),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc, ?, or Enter to close ",
            Style::new().italic().yellow(),
        )),
    ];

    let paragraph = Paragraph::new(help_text).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area.inner(&Margin { vertical: 1, horizontal: 1 }));
}

fn render_edit_day_modal(f: &mut Frame, app: &App) {
    let ActiveModal::EditDay {
        draft,
        focused_field,
        exercise_row,
        exercise_column,
        error_message,
    } = &app.active_modal
    else {
        return;
    };
    let day = draft.day();

    let block = Block::default()
        .title(format!("Edit {} Day {}", draft.week(), draft.index() + 1))
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Day label
            Constraint::Length(1), // Focus
            Constraint::Length(1),
            Constraint::Min(3), // Exercises
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Error
        ])
        .split(area.inner(&Margin { vertical: 1, horizontal: 1 }));

    let label_row = |label: &str, value: &str, field: EditDayField| {
        Line::from(vec![
            Span::raw(format!("{label:<7}")),
            Span::styled(value.to_string(), highlight_if(*focused_field == field)),
        ])
    };
    f.render_widget(Paragraph::new(label_row("Day:", &day.day, EditDayField::DayLabel)), chunks[0]);
    f.render_widget(Paragraph::new(label_row("Focus:", &day.focus, EditDayField::Focus)), chunks[1]);

    let editing_exercises = *focused_field == EditDayField::Exercises;
    let cell = |text: &str, row: usize, column: ExerciseField| {
        let selected = editing_exercises && row == *exercise_row && column == *exercise_column;
        Cell::from(text.to_string()).style(highlight_if(selected))
    };
    let rows: Vec<Row> = day
        .exercises
        .iter()
        .enumerate()
        .map(|(i, ex)| {
            Row::new(vec![
                cell(&ex.name, i, ExerciseField::Name),
                cell(&ex.sets, i, ExerciseField::Sets),
                cell(&ex.reps, i, ExerciseField::Reps),
            ])
        })
        .collect();
    let header = Row::new(
        ["Exercise", "Sets", "Reps"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(Color::LightBlue))),
    );
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
            .title("Exercises ([Ins] add, [Del] remove)")
            .border_style(if editing_exercises {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    f.render_widget(table, chunks[3]);

    render_buttons(
        f,
        chunks[4],
        "Save",
        *focused_field == EditDayField::Save,
        *focused_field == EditDayField::Cancel,
    );

    if let Some(err) = error_message {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            chunks[5],
        );
    }
}

fn render_add_log_modal(f: &mut Frame, app: &App) {
    let ActiveModal::AddLog {
        exercise_input,
        weight_input,
        date_input,
        focused_field,
        error_message,
        exercise_suggestions,
        suggestion_index,
    } = &app.active_modal
    else {
        return;
    };

    let block = Block::default()
        .title("Log Weight")
        .borders(Borders::ALL)
        .border_style(Style::new().yellow());
    let area = centered_rect(50, 60, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Exercise label
            Constraint::Length(1), // Exercise input
            Constraint::Min(1),    // Suggestions
            Constraint::Length(1), // Weight label
            Constraint::Length(1), // Weight input
            Constraint::Length(1), // Date label
            Constraint::Length(1), // Date input
            Constraint::Length(1),
            Constraint::Length(1), // Buttons
            Constraint::Length(1), // Error
        ])
        .split(area.inner(&Margin { vertical: 1, horizontal: 1 }));

    f.render_widget(Paragraph::new("Exercise:"), chunks[0]);
    f.render_widget(
        Paragraph::new(exercise_input.as_str())
            .style(highlight_if(*focused_field == AddLogField::Exercise)),
        chunks[1],
    );

    if *focused_field == AddLogField::Exercise {
        let visible = chunks[2].height as usize;
        let start = suggestion_index.map_or(0, |i| (i + 1).saturating_sub(visible));
        let lines: Vec<Line> = exercise_suggestions
            .iter()
            .enumerate()
            .skip(start)
            .take(visible)
            .map(|(i, name)| {
                if Some(i) == *suggestion_index {
                    Line::from(format!("> {name}")).bold()
                } else {
                    Line::from(format!("  {name}")).dark_gray()
                }
            })
            .collect();
        f.render_widget(Paragraph::new(lines), chunks[2]);
    }

    f.render_widget(Paragraph::new("Weight (kg):"), chunks[3]);
    f.render_widget(
        Paragraph::new(weight_input.as_str()).style(highlight_if(*focused_field == AddLogField::Weight)),
        chunks[4],
    );
    f.render_widget(Paragraph::new("Date (YYYY-MM-DD / today):"), chunks[5]);
    f.render_widget(
        Paragraph::new(date_input.as_str()).style(highlight_if(*focused_field == AddLogField::Date)),
        chunks[6],
    );

    render_buttons(
        f,
        chunks[8],
        "OK",
        *focused_field == AddLogField::Confirm,
        *focused_field == AddLogField::Cancel,
    );

    if let Some(err) = error_message {
        f.render_widget(
            Paragraph::new(err.as_str()).style(Style::default().fg(Color::Red)),
            chunks[9],
        );
    }
}

fn render_confirm_delete_modal(f: &mut Frame, app: &App) {
    let ActiveModal::ConfirmDeleteLog { exercise, date, .. } = &app.active_modal else {
        return;
    };

    let block = Block::default()
        .title("Confirm Deletion")
        .borders(Borders::ALL)
        .border_style(Style::new().red());
    let area = centered_rect(50, 20, f.size());
    f.render_widget(Clear, area);

    let text = vec![
        Line::from(format!(
            "Delete the {} entry from {}?",
            exercise,
            date.format("%Y-%m-%d")
        )),
        Line::from(""),
        Line::from("[y]es / [n]o").bold(),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(paragraph, area);
}
