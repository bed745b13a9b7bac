use super::models::{AppState, FilterState, TodoItem};
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTextInput(String),
    SetFilterState(FilterState),
    /// Appends a new item titled with the current text input.
    AddTodo,
    /// Prepends an item that already carries its id, e.g. one created remotely.
    AddTodoItem(TodoItem),
    ToggleTodo(String),
    DeleteTodo(String),
    SetTodos(Vec<TodoItem>),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetTextInput(_) => "set_text_input",
            Action::SetFilterState(_) => "set_filter_state",
            Action::AddTodo => "add_todo",
            Action::AddTodoItem(_) => "add_todo_item",
            Action::ToggleTodo(_) => "toggle_todo",
            Action::DeleteTodo(_) => "delete_todo",
            Action::SetTodos(_) => "set_todos",
        }
    }
}

/// Computes the next state without touching `state`.
pub fn apply(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    reduce(&mut next, action);
    next
}

fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::SetTextInput(text) => {
            state.ui.text_input = text;
        }
        Action::SetFilterState(filter) => {
            state.ui.filter_state = filter;
        }
        Action::AddTodo => {
            let id = next_id(&state.todos);
            let title = std::mem::take(&mut state.ui.text_input);
            state.todos.push(TodoItem::new(id, title));
        }
        Action::AddTodoItem(item) => {
            if state.contains(&item.id) {
                return;
            }
            state.todos.insert(0, item);
            state.ui.text_input.clear();
        }
        Action::ToggleTodo(id) => {
            if let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) {
                todo.toggle();
            }
        }
        Action::DeleteTodo(id) => {
            state.todos.retain(|todo| todo.id != id);
        }
        Action::SetTodos(todos) => {
            let mut seen = HashSet::new();
            state.todos = todos
                .into_iter()
                .filter(|todo| seen.insert(todo.id.clone()))
                .collect();
        }
    }
}

/// Next id for a locally created item: one past the largest numeric id,
/// skipping any value that is already taken as a string id.
pub fn next_id(todos: &[TodoItem]) -> String {
    let mut candidate = todos
        .iter()
        .filter_map(|todo| todo.id.parse::<u64>().ok())
        .max()
        .map_or(1u128, |max| u128::from(max) + 1);

    while todos.iter().any(|todo| todo.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&AppState)>;

/// Owns the single `AppState` of a session. Transitions go through
/// `dispatch`, which notifies subscribers in registration order once the new
/// state is in place. Subscribers only ever see `&AppState`, so they cannot
/// dispatch back into the store while being notified.
pub struct TodoStore {
    state: AppState,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl TodoStore {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        let name = action.name();
        trace!(action = ?action, "dispatching");
        self.state = apply(&self.state, action);
        debug!(
            action = name,
            todos = self.state.todos.len(),
            subscribers = self.subscribers.len(),
            "state updated"
        );

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.state);
        }
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&AppState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    #[allow(dead_code)] // the binary keeps its subscribers for the whole run
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
