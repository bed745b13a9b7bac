use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Snapshots are written in camelCase. The todo service answers in
/// snake_case, so both spellings are accepted on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "completed_at", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            created_at: None,
            completed_at: None,
        }
    }

    #[cfg(test)]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[cfg(test)]
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[cfg(test)]
    pub fn completed_at(mut self, completed_at: DateTime<Utc>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
        if !self.completed {
            self.completed_at = None;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterState {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterState {
    pub const VARIANTS: [FilterState; 3] = [FilterState::All, FilterState::Active, FilterState::Completed];

    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            FilterState::All => true,
            FilterState::Active => !item.completed,
            FilterState::Completed => item.completed,
        }
    }

    /// Cycles ALL -> ACTIVE -> COMPLETED -> ALL.
    pub fn next(self) -> Self {
        match self {
            FilterState::All => FilterState::Active,
            FilterState::Active => FilterState::Completed,
            FilterState::Completed => FilterState::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterState::All => "All",
            FilterState::Active => "Active",
            FilterState::Completed => "Completed",
        }
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterState::All),
            "active" => Ok(FilterState::Active),
            "completed" => Ok(FilterState::Completed),
            other => Err(format!(
                "unknown filter '{}' (expected all, active or completed)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default)]
    pub text_input: String,
    #[serde(default)]
    pub filter_state: FilterState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub ui: UiState,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
}

impl AppState {
    #[cfg(test)]
    pub fn with_todos(todos: Vec<TodoItem>) -> Self {
        Self {
            ui: UiState::default(),
            todos,
        }
    }

    pub fn find(&self, id: &str) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Orders by creation time, newest first. Items without a timestamp go last;
/// ties keep their relative order.
pub fn sort_newest_first(todos: &mut [TodoItem]) {
    todos.sort_by(|a, b| match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
