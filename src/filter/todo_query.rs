use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{Column, SortDirection};
use crate::validation::{parse_day, start_of_day};

/// Query string accepted by GET /todos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoQuery {
    pub list_id: Option<String>,
    pub due: Option<String>,
    pub completed: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the GET /todos selection for `user_id`.
///
/// Defaults to open todos due on `today`. `listId` narrows to one list,
/// `due=all` drops the date window, `due=MM-DD-YYYY` moves it to that day and
/// `completed=true|false|all` replaces the completion condition.
pub fn todo_filter(user_id: Uuid, query: &TodoQuery, today: NaiveDate) -> Result<Filter, FilterError> {
    let mut filter = Filter::new().eq(Column::UserId, user_id);

    if let Some(raw) = present(&query.list_id) {
        let list_id = Uuid::parse_str(raw).map_err(|_| FilterError::InvalidListId(raw.to_string()))?;
        filter = filter.eq(Column::ListId, list_id);
    }

    match present(&query.completed) {
        None => filter = filter.eq(Column::Completed, false),
        Some(v) if v.eq_ignore_ascii_case("all") => {}
        Some(v) => {
            let completed: bool = v
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| FilterError::InvalidCompleted(v.to_string()))?;
            filter = filter.eq(Column::Completed, completed);
        }
    }

    let day = match present(&query.due) {
        None => Some(today),
        Some(v) if v.eq_ignore_ascii_case("all") => None,
        Some(v) => Some(parse_day(v).ok_or_else(|| FilterError::InvalidDue(v.to_string()))?),
    };
    if let Some(day) = day {
        let start = start_of_day(day);
        filter = filter.gte(Column::Due, start).lt(Column::Due, start + Duration::days(1));
    }

    Ok(filter.order_by(Column::Due, SortDirection::Asc))
}

/// Builds the GET /lists selection: newest first, capped at `limit`.
pub fn list_filter(user_id: Uuid, limit: i64) -> Filter {
    Filter::new()
        .eq(Column::UserId, user_id)
        .order_by(Column::CreatedAt, SortDirection::Desc)
        .limit(limit)
}
