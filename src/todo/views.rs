use super::models::{AppState, TodoItem};

pub fn visible_todos(state: &AppState) -> Vec<&TodoItem> {
    let filter = state.ui.filter_state;
    state.todos.iter().filter(|todo| filter.matches(todo)).collect()
}

pub fn remaining_count(state: &AppState) -> usize {
    state.todos.iter().filter(|todo| !todo.completed).count()
}

pub fn completed_count(state: &AppState) -> usize {
    state.todos.iter().filter(|todo| todo.completed).count()
}

pub fn status_label(count: usize) -> String {
    match count {
        0 => "no items left".to_string(),
        1 => "1 item left".to_string(),
        n => format!("{} items left", n),
    }
}
