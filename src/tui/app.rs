use crate::remote::{RemoteSync, TodoApi};
use crate::todo::models::{FilterState, TodoItem};
use crate::todo::store::{Action, TodoStore};
use crate::todo::views;
use crate::tui::handlers::{HelpModeAction, InsertModeAction, KeyHandler, NormalModeAction};
use crate::tui::input::LineEditor;
use crate::tui::undo::UndoManager;
use anyhow::Result;
use crossterm::event::KeyEvent;
use tracing::{debug, warn};

pub type DynRemote = RemoteSync<Box<dyn TodoApi>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

pub struct App {
    pub store: TodoStore,
    pub remote: Option<DynRemote>,
    pub selected_index: usize,
    pub mode: Mode,
    pub help_mode: bool,
    pub should_quit: bool,
    pub editor: LineEditor,
    pub status_message: Option<String>,
    undo: UndoManager,
}

impl App {
    pub fn new(store: TodoStore, remote: Option<DynRemote>) -> Self {
        let editor = LineEditor::at_end(&store.state().ui.text_input);
        Self {
            store,
            remote,
            selected_index: 0,
            mode: Mode::Normal,
            help_mode: false,
            should_quit: false,
            editor,
            status_message: None,
            undo: UndoManager::new(),
        }
    }

    pub fn visible_todos(&self) -> Vec<&TodoItem> {
        views::visible_todos(self.store.state())
    }

    pub fn status_label(&self) -> String {
        views::status_label(views::remaining_count(self.store.state()))
    }

    pub fn filter(&self) -> FilterState {
        self.store.state().ui.filter_state
    }

    pub fn text_input(&self) -> &str {
        &self.store.state().ui.text_input
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Fetches the remote collection, if a remote is configured.
    pub fn reload(&mut self) {
        let Some(remote) = &self.remote else {
            self.status_message = Some("No remote configured".to_string());
            return;
        };

        match remote.load(&mut self.store) {
            Ok(count) => {
                self.status_message = Some(format!("Loaded {} todos", count));
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.status_message = Some(format!("Reload failed: {}", e));
            }
        }
        self.clamp_selection();
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.help_mode {
            self.handle_help_mode_key(key_event);
        } else {
            match self.mode {
                Mode::Normal => self.handle_normal_mode_key(key_event),
                Mode::Insert => self.handle_insert_mode_key(key_event),
            }
        }
        Ok(())
    }

    fn handle_normal_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_normal_mode_key(key_event) {
            NormalModeAction::None => {}
            NormalModeAction::Quit => self.should_quit = true,
            NormalModeAction::MoveSelectionUp => self.move_selection_up(),
            NormalModeAction::MoveSelectionDown => self.move_selection_down(),
            NormalModeAction::ToggleSelectedItem => self.toggle_selected_item(),
            NormalModeAction::DeleteItem => self.delete_selected_item(),
            NormalModeAction::EnterInsertMode => self.enter_insert_mode(),
            NormalModeAction::CycleFilter => self.set_filter(self.filter().next()),
            NormalModeAction::SetFilter(filter) => self.set_filter(filter),
            NormalModeAction::Undo => self.undo(),
            NormalModeAction::Reload => self.reload(),
            NormalModeAction::ToggleHelpMode => self.help_mode = true,
            NormalModeAction::ClearMessage => self.status_message = None,
        }
    }

    fn handle_help_mode_key(&mut self, key_event: KeyEvent) {
        match KeyHandler::handle_help_mode_key(key_event) {
            HelpModeAction::ExitHelpMode => self.help_mode = false,
            HelpModeAction::None => {}
        }
    }

    fn handle_insert_mode_key(&mut self, key_event: KeyEvent) {
        let mut text = self.text_input().to_string();
        match KeyHandler::handle_insert_mode_key(key_event) {
            InsertModeAction::None => return,
            InsertModeAction::Cancel => {
                self.cancel_insert();
                return;
            }
            InsertModeAction::Confirm => {
                self.confirm_insert();
                return;
            }
            InsertModeAction::Backspace => self.editor.backspace(&mut text),
            InsertModeAction::Delete => self.editor.delete(&mut text),
            InsertModeAction::MoveCursorLeft => self.editor.move_cursor_left(&text),
            InsertModeAction::MoveCursorRight => self.editor.move_cursor_right(&text),
            InsertModeAction::MoveCursorHome => self.editor.move_cursor_home(),
            InsertModeAction::MoveCursorEnd => self.editor.move_cursor_end(&text),
            InsertModeAction::DeleteWordBackward => self.editor.delete_word_backward(&mut text),
            InsertModeAction::InsertChar(c) => self.editor.insert_char(&mut text, c),
        }

        if text != self.text_input() {
            self.store.dispatch(Action::SetTextInput(text));
        }
    }

    fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    fn move_selection_down(&mut self) {
        let visible = self.visible_todos().len();
        if self.selected_index < visible.saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_todos().len();
        if self.selected_index >= visible {
            self.selected_index = visible.saturating_sub(1);
        }
    }

    pub fn selected_id(&self) -> Option<String> {
        self.visible_todos()
            .get(self.selected_index)
            .map(|todo| todo.id.clone())
    }

    fn save_state(&mut self) {
        self.undo.save_state(self.store.state().todos.clone());
    }

    fn toggle_selected_item(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        match &self.remote {
            Some(remote) => {
                if let Err(e) = remote.toggle(&mut self.store, &id) {
                    self.status_message = Some(format!("Toggle failed: {}", e));
                }
            }
            None => {
                self.save_state();
                self.store.dispatch(Action::ToggleTodo(id));
            }
        }
        self.clamp_selection();
    }

    fn delete_selected_item(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        match &self.remote {
            Some(remote) => {
                if let Err(e) = remote.delete(&mut self.store, &id) {
                    self.status_message = Some(format!("Delete failed: {}", e));
                }
            }
            None => {
                self.save_state();
                self.store.dispatch(Action::DeleteTodo(id));
            }
        }
        self.clamp_selection();
    }

    fn set_filter(&mut self, filter: FilterState) {
        self.store.dispatch(Action::SetFilterState(filter));
        self.clamp_selection();
    }

    fn undo(&mut self) {
        if self.is_remote() {
            self.status_message = Some("Undo is not available with a remote".to_string());
            return;
        }

        match self.undo.undo() {
            Some(todos) => {
                debug!(todos = todos.len(), "undo");
                self.store.dispatch(Action::SetTodos(todos));
                self.clamp_selection();
            }
            None => self.status_message = Some("Nothing to undo".to_string()),
        }
    }

    fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
        self.editor = LineEditor::at_end(self.text_input());
    }

    fn cancel_insert(&mut self) {
        self.store.dispatch(Action::SetTextInput(String::new()));
        self.editor.move_cursor_home();
        self.mode = Mode::Normal;
    }

    fn confirm_insert(&mut self) {
        if self.text_input().trim().is_empty() {
            self.status_message = Some("Nothing to add".to_string());
            return;
        }

        match &self.remote {
            Some(remote) => {
                if let Err(e) = remote.add(&mut self.store) {
                    self.status_message = Some(format!("Add failed: {}", e));
                    return;
                }
                self.selected_index = 0;
            }
            None => {
                self.save_state();
                self.store.dispatch(Action::AddTodo);
                self.selected_index = self.visible_todos().len().saturating_sub(1);
            }
        }
        self.editor.move_cursor_home();
        self.status_message = None;
    }
}
