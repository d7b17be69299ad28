use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{ListChanges, TodoChanges};

fn push_set<'a, T>(builder: &mut QueryBuilder<'a, Postgres>, column: &str, value: T)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    builder.push(", ");
    builder.push(column);
    builder.push(" = ");
    builder.push_bind(value);
}

fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, id: Uuid, owner: Option<Uuid>) {
    builder.push(" WHERE \"id\" = ");
    builder.push_bind(id);
    if let Some(owner) = owner {
        builder.push(" AND \"user_id\" = ");
        builder.push_bind(owner);
    }
}

/// `UPDATE todos SET ... RETURNING *` touching only the changed columns.
pub fn update_todo_sql(
    id: Uuid,
    owner: Option<Uuid>,
    changes: TodoChanges,
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE todos SET \"updated_at\" = ");
    builder.push_bind(now);

    if let Some(name) = changes.name {
        push_set(&mut builder, "\"name\"", name);
    }
    if let Some(notes) = changes.notes {
        push_set(&mut builder, "\"notes\"", notes);
    }
    if let Some(url) = changes.url {
        push_set(&mut builder, "\"url\"", url);
    }
    if let Some(due) = changes.due {
        push_set(&mut builder, "\"due\"", due);
    }
    if let Some(priority) = changes.priority {
        push_set(&mut builder, "\"priority\"", priority.as_str());
    }
    if let Some(list_id) = changes.list_id {
        push_set(&mut builder, "\"list_id\"", list_id);
    }
    if let Some(completed) = changes.completed {
        push_set(&mut builder, "\"completed\"", completed);
    }

    push_scope(&mut builder, id, owner);
    builder.push(" RETURNING *");
    builder
}

pub fn update_list_sql(
    id: Uuid,
    owner: Uuid,
    changes: ListChanges,
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE lists SET \"updated_at\" = ");
    builder.push_bind(now);

    if let Some(name) = changes.name {
        push_set(&mut builder, "\"name\"", name);
    }
    if let Some(color) = changes.color {
        push_set(&mut builder, "\"color\"", color);
    }

    push_scope(&mut builder, id, Some(owner));
    builder.push(" RETURNING *");
    builder
}

/// `DELETE FROM <table> WHERE id = .. [AND user_id = ..] RETURNING *`
pub fn delete_sql(table: &'static str, id: Uuid, owner: Option<Uuid>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {}", table));
    push_scope(&mut builder, id, owner);
    builder.push(" RETURNING *");
    builder
}
