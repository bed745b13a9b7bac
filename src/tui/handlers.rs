use crate::todo::models::FilterState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_normal_mode_key(key_event: KeyEvent) -> NormalModeAction {
        match key_event.code {
            KeyCode::Char('q') => NormalModeAction::Quit,
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                NormalModeAction::Quit
            }
            KeyCode::Up | KeyCode::Char('k') => NormalModeAction::MoveSelectionUp,
            KeyCode::Down | KeyCode::Char('j') => NormalModeAction::MoveSelectionDown,
            KeyCode::Enter | KeyCode::Char(' ') => NormalModeAction::ToggleSelectedItem,
            KeyCode::Char('d') | KeyCode::Delete => NormalModeAction::DeleteItem,
            KeyCode::Char('a') | KeyCode::Char('i') => NormalModeAction::EnterInsertMode,
            KeyCode::Char('f') | KeyCode::Tab => NormalModeAction::CycleFilter,
            KeyCode::Char('1') => NormalModeAction::SetFilter(FilterState::All),
            KeyCode::Char('2') => NormalModeAction::SetFilter(FilterState::Active),
            KeyCode::Char('3') => NormalModeAction::SetFilter(FilterState::Completed),
            KeyCode::Char('u') => NormalModeAction::Undo,
            KeyCode::Char('r') => NormalModeAction::Reload,
            KeyCode::Char('?') => NormalModeAction::ToggleHelpMode,
            KeyCode::Esc => NormalModeAction::ClearMessage,
            _ => NormalModeAction::None,
        }
    }

    pub fn handle_help_mode_key(key_event: KeyEvent) -> HelpModeAction {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => {
                HelpModeAction::ExitHelpMode
            }
            _ => HelpModeAction::None,
        }
    }

    pub fn handle_insert_mode_key(key_event: KeyEvent) -> InsertModeAction {
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Esc => InsertModeAction::Cancel,
            KeyCode::Enter => InsertModeAction::Confirm,
            KeyCode::Backspace => InsertModeAction::Backspace,
            KeyCode::Delete => InsertModeAction::Delete,
            KeyCode::Left => InsertModeAction::MoveCursorLeft,
            KeyCode::Right => InsertModeAction::MoveCursorRight,
            KeyCode::Home => InsertModeAction::MoveCursorHome,
            KeyCode::End => InsertModeAction::MoveCursorEnd,
            KeyCode::Char('w') if ctrl => InsertModeAction::DeleteWordBackward,
            KeyCode::Char('a') if ctrl => InsertModeAction::MoveCursorHome,
            KeyCode::Char('e') if ctrl => InsertModeAction::MoveCursorEnd,
            KeyCode::Char('c') if ctrl => InsertModeAction::Cancel,
            KeyCode::Char(c) => InsertModeAction::InsertChar(c),
            _ => InsertModeAction::None,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum NormalModeAction {
    None,
    Quit,
    MoveSelectionUp,
    MoveSelectionDown,
    ToggleSelectedItem,
    DeleteItem,
    EnterInsertMode,
    CycleFilter,
    SetFilter(FilterState),
    Undo,
    Reload,
    ToggleHelpMode,
    ClearMessage,
}

#[derive(Debug, PartialEq)]
pub enum HelpModeAction {
    None,
    ExitHelpMode,
}

#[derive(Debug, PartialEq)]
pub enum InsertModeAction {
    None,
    Cancel,
    Confirm,
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    DeleteWordBackward,
    InsertChar(char),
}
