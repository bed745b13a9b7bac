use crate::todo::models::TodoItem;

const UNDO_LIMIT: usize = 20;

/// Previous todo collections, restored through `SetTodos`.
#[derive(Debug, Default)]
pub struct UndoManager {
    undo_stack: Vec<Vec<TodoItem>>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_state(&mut self, todos: Vec<TodoItem>) {
        self.undo_stack.push(todos);

        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }

    pub fn undo(&mut self) -> Option<Vec<TodoItem>> {
        self.undo_stack.pop()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}
