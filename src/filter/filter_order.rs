use sqlx::{Postgres, QueryBuilder};

use super::filter::Filter;
use super::filter_where::push_where;

/// Appends ` ORDER BY ...` and ` LIMIT ...` when the filter carries them.
pub fn push_order_and_limit(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    if let Some(order) = filter.order {
        builder.push(" ORDER BY ");
        builder.push(order.column.as_sql());
        builder.push(" ");
        builder.push(order.sort.to_sql());
    }
    if let Some(limit) = filter.limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
}

/// `SELECT * FROM <table>` with the full filter applied.
pub fn select_sql(table: &'static str, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT * FROM {}", table));
    push_where(&mut builder, &filter.conditions);
    push_order_and_limit(&mut builder, filter);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Column, SortDirection};
    use uuid::Uuid;

    #[test]
    fn select_with_order_and_limit() {
        let filter = Filter::new()
            .eq(Column::UserId, Uuid::new_v4())
            .order_by(Column::CreatedAt, SortDirection::Desc)
            .limit(100);
        let builder = select_sql("lists", &filter);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM lists WHERE \"user_id\" = $1 ORDER BY \"created_at\" DESC LIMIT $2"
        );
    }
}
