// gym-tracker-tui/src/app/input.rs
use super::{
    actions::{
        open_add_log_modal, open_delete_confirmation_modal, open_edit_day_modal,
        send_quick_prompt, show_progress_for_selected_log, submit_coach_input,
        toggle_schedule_week,
    },
    modals::{
        handle_add_log_modal_input, handle_confirm_delete_modal_input,
        handle_edit_day_modal_input,
    },
    navigation_helpers::{list_next, list_previous, table_next, table_previous},
    state::{ActiveModal, ActiveTab, App, ScheduleFocus},
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gym_tracker_lib::QuickPrompt;

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            return self.handle_modal_input(key);
        }

        // Tab switching works everywhere, including the coach input line
        match key.code {
            KeyCode::F(1) => self.active_tab = ActiveTab::Schedule,
            KeyCode::F(2) => self.active_tab = ActiveTab::Log,
            KeyCode::F(3) => {
                self.active_tab = ActiveTab::Progress;
                self.refresh_progress_exercises();
            }
            KeyCode::F(4) => self.active_tab = ActiveTab::Coach,
            _ if self.active_tab == ActiveTab::Coach => self.handle_coach_input(key),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            _ => match self.active_tab {
                ActiveTab::Schedule => self.handle_schedule_input(key),
                ActiveTab::Log => self.handle_log_input(key),
                ActiveTab::Progress => self.handle_progress_input(key),
                ActiveTab::Coach => {}
            },
        }
        Ok(())
    }

    // --- Modal Input Handling ---
    fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match self.active_modal {
            ActiveModal::Help => self.handle_help_modal_input(key),
            ActiveModal::EditDay { .. } => handle_edit_day_modal_input(self, key)?,
            ActiveModal::AddLog { .. } => handle_add_log_modal_input(self, key)?,
            ActiveModal::ConfirmDeleteLog { .. } => handle_confirm_delete_modal_input(self, key)?,
            ActiveModal::None => {}
        }
        Ok(())
    }

    fn handle_help_modal_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
                self.active_modal = ActiveModal::None;
            }
            _ => {} // Ignore other keys in help
        }
    }

    // --- Tab-Specific Input Handling ---
    fn handle_schedule_input(&mut self, key: KeyEvent) {
        let day_count = self.tracker.week(self.schedule_week).len();
        let exercise_count = self
            .tracker
            .week(self.schedule_week)
            .get(self.selected_day_index())
            .map_or(0, |d| d.exercises.len());

        match key.code {
            KeyCode::Char('w') => toggle_schedule_week(self),
            KeyCode::Char('e') | KeyCode::Enter => open_edit_day_modal(self),
            KeyCode::Tab => {
                self.schedule_focus = match self.schedule_focus {
                    ScheduleFocus::DayList => ScheduleFocus::ExerciseTable,
                    ScheduleFocus::ExerciseTable => ScheduleFocus::DayList,
                }
            }
            KeyCode::Char('k') | KeyCode::Up => match self.schedule_focus {
                ScheduleFocus::DayList => {
                    list_previous(&mut self.schedule_day_state, day_count);
                    self.schedule_exercise_state.select(Some(0));
                }
                ScheduleFocus::ExerciseTable => {
                    table_previous(&mut self.schedule_exercise_state, exercise_count);
                }
            },
            KeyCode::Char('j') | KeyCode::Down => match self.schedule_focus {
                ScheduleFocus::DayList => {
                    list_next(&mut self.schedule_day_state, day_count);
                    self.schedule_exercise_state.select(Some(0));
                }
                ScheduleFocus::ExerciseTable => {
                    table_next(&mut self.schedule_exercise_state, exercise_count);
                }
            },
            _ => {}
        }
    }

    fn handle_log_input(&mut self, key: KeyEvent) {
        let row_count = self.tracker.logs().len();
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => table_previous(&mut self.log_table_state, row_count),
            KeyCode::Char('j') | KeyCode::Down => table_next(&mut self.log_table_state, row_count),
            KeyCode::Char('a') => open_add_log_modal(self),
            KeyCode::Char('d') | KeyCode::Delete => open_delete_confirmation_modal(self),
            KeyCode::Char('g') => show_progress_for_selected_log(self),
            _ => {}
        }
    }

    fn handle_progress_input(&mut self, key: KeyEvent) {
        let count = self.progress_exercises.len();
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => {
                list_previous(&mut self.progress_list_state, count);
                self.refresh_projection();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                list_next(&mut self.progress_list_state, count);
                self.refresh_projection();
            }
            _ => {}
        }
    }

    // Every printable key goes to the prompt line on this tab
    fn handle_coach_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => submit_coach_input(self),
            KeyCode::Backspace => {
                self.coach_input.pop();
            }
            KeyCode::Esc => self.coach_input.clear(),
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.coach_include_logs = !self.coach_include_logs;
            }
            KeyCode::Char(c) => self.coach_input.push(c),
            KeyCode::F(5) => send_quick_prompt(self, QuickPrompt::Shorten),
            KeyCode::F(6) => send_quick_prompt(self, QuickPrompt::Meal),
            KeyCode::F(7) => send_quick_prompt(self, QuickPrompt::Analyze),
            KeyCode::F(8) => send_quick_prompt(self, QuickPrompt::Form),
            KeyCode::PageUp => self.coach_scroll = self.coach_scroll.saturating_add(3),
            KeyCode::PageDown => self.coach_scroll = self.coach_scroll.saturating_sub(3),
            _ => {}
        }
    }
}
