use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{Column, FilterValue, Filterable};

pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoList {
    pub fn new(user_id: Uuid, name: String, color: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Filterable for TodoList {
    fn field(&self, column: Column) -> Option<FilterValue> {
        match column {
            Column::Id => Some(self.id.into()),
            Column::UserId => Some(self.user_id.into()),
            Column::CreatedAt => Some(self.created_at.into()),
            Column::ListId | Column::Completed | Column::Due => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListChanges {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl ListChanges {
    pub fn apply(self, list: &mut TodoList, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            list.name = name;
        }
        if let Some(color) = self.color {
            list.color = color;
        }
        list.updated_at = now;
    }
}
