use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filter::{Column, FilterValue, Filterable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::None, Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::None => "NONE",
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub list_id: Option<Uuid>,
    pub name: String,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub due: DateTime<Utc>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(user_id: Uuid, name: String, due: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            list_id: None,
            name,
            notes: None,
            url: None,
            due,
            priority: Priority::None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Filterable for Todo {
    fn field(&self, column: Column) -> Option<FilterValue> {
        match column {
            Column::Id => Some(self.id.into()),
            Column::UserId => Some(self.user_id.into()),
            Column::ListId => self.list_id.map(Into::into),
            Column::Completed => Some(self.completed.into()),
            Column::Due => Some(self.due.into()),
            Column::CreatedAt => Some(self.created_at.into()),
        }
    }
}

/// Fields touched by a find-and-modify. `None` leaves a field untouched; the
/// nested options on nullable fields carry an explicit clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub name: Option<String>,
    pub notes: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub due: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub list_id: Option<Option<Uuid>>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn list(list_id: Option<Uuid>) -> Self {
        Self {
            list_id: Some(list_id),
            ..Default::default()
        }
    }

    pub fn apply(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            todo.name = name;
        }
        if let Some(notes) = self.notes {
            todo.notes = notes;
        }
        if let Some(url) = self.url {
            todo.url = url;
        }
        if let Some(due) = self.due {
            todo.due = due;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(list_id) = self.list_id {
            todo.list_id = list_id;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = now;
    }
}
