use std::cmp::Ordering;

use super::types::{Column, FilterCondition, FilterOp, FilterOrderInfo, FilterValue, Filterable, SortDirection};

/// Store-neutral selection: AND-ed conditions plus optional ordering and cap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<FilterCondition>,
    pub order: Option<FilterOrderInfo>,
    pub limit: Option<i64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, column: Column, operator: FilterOp, value: impl Into<FilterValue>) -> Self {
        self.conditions.push(FilterCondition {
            column,
            operator,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: Column, value: impl Into<FilterValue>) -> Self {
        self.condition(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: Column, value: impl Into<FilterValue>) -> Self {
        self.condition(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: Column, value: impl Into<FilterValue>) -> Self {
        self.condition(column, FilterOp::Lt, value)
    }

    pub fn order_by(mut self, column: Column, sort: SortDirection) -> Self {
        self.order = Some(FilterOrderInfo { column, sort });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        if limit < 0 {
            tracing::warn!("Ignoring negative limit {}", limit);
            return self;
        }
        self.limit = Some(limit);
        self
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.conditions.iter().all(|condition| {
            let Some(actual) = record.field(condition.column) else {
                return false;
            };
            match condition.operator {
                FilterOp::Eq => actual == condition.value,
                FilterOp::Gte => matches!(
                    actual.partial_cmp(&condition.value),
                    Some(Ordering::Greater | Ordering::Equal)
                ),
                FilterOp::Lt => matches!(actual.partial_cmp(&condition.value), Some(Ordering::Less)),
            }
        })
    }

    /// Selects, orders and caps `records` the way the SQL rendering would.
    pub fn apply<'a, T, I>(&self, records: I) -> Vec<T>
    where
        T: Filterable + Clone + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut selected: Vec<T> = records.into_iter().filter(|r| self.matches(*r)).cloned().collect();

        if let Some(order) = self.order {
            selected.sort_by(|a, b| {
                let ordering = match (a.field(order.column), b.field(order.column)) {
                    (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                    // Postgres puts NULLs last ascending, first descending
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                match order.sort {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Row {
        owner: Uuid,
        list: Option<Uuid>,
        rank: chrono::DateTime<Utc>,
    }

    impl Filterable for Row {
        fn field(&self, column: Column) -> Option<FilterValue> {
            match column {
                Column::UserId => Some(self.owner.into()),
                Column::ListId => self.list.map(Into::into),
                Column::Due => Some(self.rank.into()),
                _ => None,
            }
        }
    }

    #[test]
    fn conditions_are_anded() {
        let owner = Uuid::new_v4();
        let list = Uuid::new_v4();
        let now = Utc::now();
        let row = Row { owner, list: Some(list), rank: now };

        assert!(Filter::new().eq(Column::UserId, owner).matches(&row));
        assert!(!Filter::new().eq(Column::UserId, owner).eq(Column::ListId, Uuid::new_v4()).matches(&row));
        assert!(Filter::new().gte(Column::Due, now).lt(Column::Due, now + Duration::days(1)).matches(&row));
        assert!(!Filter::new().lt(Column::Due, now).matches(&row));
    }

    #[test]
    fn missing_fields_never_match() {
        let row = Row { owner: Uuid::new_v4(), list: None, rank: Utc::now() };
        assert!(!Filter::new().eq(Column::ListId, Uuid::new_v4()).matches(&row));
    }

    #[test]
    fn apply_orders_and_caps() {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let rows: Vec<Row> = (0..5)
            .map(|i| Row { owner, list: None, rank: now + Duration::minutes(i) })
            .collect();

        let picked = Filter::new()
            .eq(Column::UserId, owner)
            .order_by(Column::Due, SortDirection::Desc)
            .limit(2)
            .apply(&rows);

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].rank, now + Duration::minutes(4));
        assert_eq!(picked[1].rank, now + Duration::minutes(3));
    }
}
