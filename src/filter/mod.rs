pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod todo_query;
pub mod types;

pub use error::FilterError;
pub use filter::Filter;
pub use todo_query::{list_filter, todo_filter, TodoQuery};
pub use types::*;
