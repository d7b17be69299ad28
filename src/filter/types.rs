use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Columns a filter may reference. Names are fixed so rendered SQL never
/// carries caller-supplied identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    UserId,
    ListId,
    Completed,
    Due,
    CreatedAt,
}

impl Column {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Column::Id => "\"id\"",
            Column::UserId => "\"user_id\"",
            Column::ListId => "\"list_id\"",
            Column::Completed => "\"completed\"",
            Column::Due => "\"due\"",
            Column::CreatedAt => "\"created_at\"",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => " = ",
            FilterOp::Gte => " >= ",
            FilterOp::Lt => " < ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum FilterValue {
    Uuid(Uuid),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        FilterValue::Uuid(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        FilterValue::Timestamp(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: Column,
    pub operator: FilterOp,
    pub value: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: Column,
    pub sort: SortDirection,
}

/// Records a [`Filter`](super::Filter) can be evaluated against in memory.
pub trait Filterable {
    /// Value of `column`, or `None` when the record has no value there.
    fn field(&self, column: Column) -> Option<FilterValue>;
}
