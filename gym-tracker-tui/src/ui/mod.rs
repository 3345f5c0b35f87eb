// gym-tracker-tui/src/ui/mod.rs
mod coach_tab;
mod layout;
mod log_tab;
mod modals;
mod progress_tab;
mod schedule_tab;
mod status_bar;

pub use layout::render_ui;
