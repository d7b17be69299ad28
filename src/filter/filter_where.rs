use sqlx::{Postgres, QueryBuilder};

use super::types::{FilterCondition, FilterValue};

/// Appends ` WHERE a AND b ...` for `conditions`, binding every value.
/// Appends nothing when there are no conditions.
pub fn push_where(builder: &mut QueryBuilder<'_, Postgres>, conditions: &[FilterCondition]) {
    for (index, condition) in conditions.iter().enumerate() {
        builder.push(if index == 0 { " WHERE " } else { " AND " });
        builder.push(condition.column.as_sql());
        builder.push(condition.operator.as_sql());
        match condition.value {
            FilterValue::Uuid(v) => builder.push_bind(v),
            FilterValue::Bool(v) => builder.push_bind(v),
            FilterValue::Timestamp(v) => builder.push_bind(v),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Column, Filter};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn renders_numbered_placeholders() {
        let filter = Filter::new()
            .eq(Column::UserId, Uuid::new_v4())
            .eq(Column::Completed, false)
            .gte(Column::Due, Utc::now());

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM todos");
        push_where(&mut builder, &filter.conditions);

        assert_eq!(
            builder.sql(),
            "SELECT * FROM todos WHERE \"user_id\" = $1 AND \"completed\" = $2 AND \"due\" >= $3"
        );
    }

    #[test]
    fn empty_conditions_render_nothing() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM lists");
        push_where(&mut builder, &[]);
        assert_eq!(builder.sql(), "SELECT * FROM lists");
    }
}
