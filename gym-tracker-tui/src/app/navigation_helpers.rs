// gym-tracker-tui/src/app/navigation_helpers.rs
use ratatui::widgets::{ListState, TableState};

/// Index after `current`, wrapping around a list of `len` items.
fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if i + 1 >= len => 0,
        Some(i) => i + 1,
        None => 0,
    })
}

fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(0) | None => len - 1,
        Some(i) => (i - 1).min(len - 1),
    })
}

pub fn list_next(state: &mut ListState, list_len: usize) {
    state.select(next_index(state.selected(), list_len));
}

pub fn list_previous(state: &mut ListState, list_len: usize) {
    state.select(previous_index(state.selected(), list_len));
}

pub fn table_next(state: &mut TableState, row_count: usize) {
    state.select(next_index(state.selected(), row_count));
}

pub fn table_previous(state: &mut TableState, row_count: usize) {
    state.select(previous_index(state.selected(), row_count));
}

/// Pulls a selection back inside the list after rows were removed.
pub fn clamp_table_selection(state: &mut TableState, row_count: usize) {
    let clamped = match state.selected() {
        _ if row_count == 0 => None,
        Some(i) => Some(i.min(row_count - 1)),
        None => Some(0),
    };
    state.select(clamped);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_both_ways() {
        assert_eq!(next_index(Some(2), 3), Some(0));
        assert_eq!(next_index(None, 3), Some(0));
        assert_eq!(previous_index(Some(0), 3), Some(2));
        assert_eq!(previous_index(Some(2), 3), Some(1));
        assert_eq!(next_index(Some(0), 0), None);
    }

    #[test]
    fn clamp_keeps_selection_in_range() {
        let mut state = TableState::default();
        state.select(Some(5));
        clamp_table_selection(&mut state, 2);
        assert_eq!(state.selected(), Some(1));
        clamp_table_selection(&mut state, 0);
        assert_eq!(state.selected(), None);
    }
}
