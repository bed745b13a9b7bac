use super::api::{ApiError, NewTodo, TodoApi};
use crate::todo::models::{TodoItem, sort_newest_first};
use crate::todo::store::{Action, TodoStore};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("cannot add an empty todo")]
    EmptyTitle,
    #[error("todo {0} does not exist")]
    UnknownTodo(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Drives a `TodoStore` from a remote todo service.
///
/// Remote calls run outside the transition function and feed their results
/// back in as ordinary actions. Toggle and delete are applied locally first;
/// when the remote write fails `SetTodos` restores the previous collection
/// and the error is handed back to the caller.
pub struct RemoteSync<A> {
    api: A,
}

impl<A: TodoApi> RemoteSync<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn load(&self, store: &mut TodoStore) -> Result<usize, SyncError> {
        let mut todos = self.api.list()?;
        sort_newest_first(&mut todos);
        let count = todos.len();
        store.dispatch(Action::SetTodos(todos));
        info!(count, "loaded todos from remote");
        Ok(count)
    }

    /// Creates the item remotely from the current text input. The store only
    /// sees the item once the server has assigned its id.
    pub fn add(&self, store: &mut TodoStore) -> Result<(), SyncError> {
        let title = store.state().ui.text_input.trim().to_string();
        if title.is_empty() {
            return Err(SyncError::EmptyTitle);
        }

        let created = self.api.create(&NewTodo::new(title))?;
        store.dispatch(Action::AddTodoItem(created));
        Ok(())
    }

    /// Flips the item locally, then writes it. On success the server's copy,
    /// with its completion timestamp, replaces the local one. On failure the
    /// collection from before the flip is restored.
    pub fn toggle(&self, store: &mut TodoStore, id: &str) -> Result<(), SyncError> {
        if !store.state().contains(id) {
            return Err(SyncError::UnknownTodo(id.to_string()));
        }

        let previous = store.state().todos.clone();
        store.dispatch(Action::ToggleTodo(id.to_string()));
        let body = match store.state().find(id) {
            Some(item) => NewTodo::from(item),
            None => return Ok(()),
        };

        match self.api.update(id, &body) {
            Ok(updated) => {
                let todos = replace_item(&store.state().todos, id, updated);
                store.dispatch(Action::SetTodos(todos));
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "remote toggle failed, restoring");
                store.dispatch(Action::SetTodos(previous));
                Err(e.into())
            }
        }
    }

    pub fn delete(&self, store: &mut TodoStore, id: &str) -> Result<(), SyncError> {
        if !store.state().contains(id) {
            return Err(SyncError::UnknownTodo(id.to_string()));
        }

        let previous = store.state().todos.clone();
        store.dispatch(Action::DeleteTodo(id.to_string()));

        if let Err(e) = self.api.delete(id) {
            warn!(id, error = %e, "remote delete failed, restoring");
            store.dispatch(Action::SetTodos(previous));
            return Err(e.into());
        }
        Ok(())
    }
}

/// Swaps the item with `id` for `updated`, keeping its position. The local
/// id is kept so a server echo cannot re-key the item.
fn replace_item(todos: &[TodoItem], id: &str, updated: TodoItem) -> Vec<TodoItem> {
    todos
        .iter()
        .map(|todo| {
            if todo.id == id {
                TodoItem {
                    id: todo.id.clone(),
                    ..updated.clone()
                }
            } else {
                todo.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::models::AppState;
    use chrono::{TimeZone, Utc};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeApi {
        todos: RefCell<Vec<TodoItem>>,
        fail_writes: Cell<bool>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with_todos(todos: Vec<TodoItem>) -> Self {
            let api = Self::default();
            *api.todos.borrow_mut() = todos;
            api
        }

        fn failing() -> Self {
            let api = Self::default();
            api.fail_writes.set(true);
            api
        }

        fn check_write(&self) -> Result<(), ApiError> {
            if self.fail_writes.get() {
                return Err(ApiError::Status {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    impl TodoApi for FakeApi {
        fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
            self.calls.borrow_mut().push("list".to_string());
            Ok(self.todos.borrow().clone())
        }

        fn create(&self, todo: &NewTodo) -> Result<TodoItem, ApiError> {
            self.calls.borrow_mut().push(format!("create {}", todo.title));
            self.check_write()?;
            let id = format!("srv-{}", self.todos.borrow().len() + 1);
            let item = TodoItem::new(id, todo.title.clone());
            self.todos.borrow_mut().push(item.clone());
            Ok(item)
        }

        fn update(&self, id: &str, todo: &NewTodo) -> Result<TodoItem, ApiError> {
            self.calls
                .borrow_mut()
                .push(format!("update {} {}", id, todo.completed));
            self.check_write()?;
            let item = TodoItem::new(id, todo.title.clone()).completed(todo.completed);
            // The service stamps completion time itself.
            Ok(if todo.completed { item.completed_at(stamp()) } else { item })
        }

        fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(format!("delete {}", id));
            self.check_write()?;
            self.todos.borrow_mut().retain(|t| t.id != id);
            Ok(())
        }
    }

    fn stamp() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn store_with(todos: Vec<TodoItem>) -> TodoStore {
        TodoStore::new(AppState::with_todos(todos))
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let older = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let newer = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let sync = RemoteSync::new(FakeApi::with_todos(vec![
            TodoItem::new("old", "old").created_at(older),
            TodoItem::new("new", "new").created_at(newer),
        ]));
        let mut store = TodoStore::default();

        assert_eq!(sync.load(&mut store).unwrap(), 2);

        let ids: Vec<&str> = store.state().todos.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_add_prepends_server_item() {
        let sync = RemoteSync::new(FakeApi::default());
        let mut store = store_with(vec![TodoItem::new("local", "existing")]);
        store.dispatch(Action::SetTextInput("  Buy milk ".to_string()));

        sync.add(&mut store).unwrap();

        let state = store.state();
        assert_eq!(state.todos[0], TodoItem::new("srv-1", "Buy milk"));
        assert_eq!(state.ui.text_input, "");
    }

    #[test]
    fn test_add_rejects_blank_input_without_request() {
        let sync = RemoteSync::new(FakeApi::default());
        let mut store = TodoStore::default();
        store.dispatch(Action::SetTextInput("   ".to_string()));

        assert!(matches!(sync.add(&mut store), Err(SyncError::EmptyTitle)));
        assert!(sync.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_add_failure_keeps_input() {
        let sync = RemoteSync::new(FakeApi::failing());
        let mut store = TodoStore::default();
        store.dispatch(Action::SetTextInput("Buy milk".to_string()));

        assert!(sync.add(&mut store).is_err());
        assert!(store.state().todos.is_empty());
        assert_eq!(store.state().ui.text_input, "Buy milk");
    }

    #[test]
    fn test_toggle_sends_new_completed_flag() {
        let sync = RemoteSync::new(FakeApi::default());
        let mut store = store_with(vec![TodoItem::new("1", "item")]);

        sync.toggle(&mut store, "1").unwrap();

        assert!(store.state().todos[0].completed);
        assert_eq!(*sync.api().calls.borrow(), vec!["update 1 true".to_string()]);
    }

    #[test]
    fn test_toggle_takes_server_completion_time() {
        let sync = RemoteSync::new(FakeApi::default());
        let mut store = store_with(vec![
            TodoItem::new("1", "first"),
            TodoItem::new("2", "second"),
        ]);

        sync.toggle(&mut store, "2").unwrap();

        let todos = &store.state().todos;
        assert_eq!(todos[1].id, "2");
        assert!(todos[1].completed);
        assert_eq!(todos[1].completed_at, Some(stamp()));
        assert_eq!(todos[0], TodoItem::new("1", "first"));
    }

    #[test]
    fn test_toggle_failure_is_compensated() {
        let sync = RemoteSync::new(FakeApi::failing());
        let done_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut store = store_with(vec![
            TodoItem::new("1", "item").completed(true).completed_at(done_at),
        ]);
        let before = store.state().clone();

        assert!(matches!(sync.toggle(&mut store, "1"), Err(SyncError::Api(_))));
        assert_eq!(*store.state(), before);
        assert_eq!(store.state().todos[0].completed_at, Some(done_at));
    }

    #[test]
    fn test_toggle_unknown_id_makes_no_request() {
        let sync = RemoteSync::new(FakeApi::default());
        let mut store = TodoStore::default();

        assert!(matches!(
            sync.toggle(&mut store, "nope"),
            Err(SyncError::UnknownTodo(_))
        ));
        assert!(sync.api().calls.borrow().is_empty());
    }

    #[test]
    fn test_delete_removes_locally_and_remotely() {
        let sync = RemoteSync::new(FakeApi::with_todos(vec![TodoItem::new("1", "item")]));
        let mut store = store_with(vec![TodoItem::new("1", "item")]);

        sync.delete(&mut store, "1").unwrap();

        assert!(store.state().todos.is_empty());
        assert!(sync.api().todos.borrow().is_empty());
    }

    #[test]
    fn test_delete_failure_restores_position() {
        let sync = RemoteSync::new(FakeApi::failing());
        let mut store = store_with(vec![
            TodoItem::new("1", "first"),
            TodoItem::new("2", "second"),
            TodoItem::new("3", "third"),
        ]);
        let before = store.state().clone();

        assert!(sync.delete(&mut store, "2").is_err());
        assert_eq!(*store.state(), before);
    }
}
