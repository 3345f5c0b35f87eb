// gym-tracker-tui/src/app.rs
pub mod actions;
pub mod input;
pub mod modals;
pub mod navigation_helpers;
pub mod state;

pub use state::{ActiveModal, ActiveTab, App};
