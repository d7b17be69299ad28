pub mod list;
pub mod todo;
pub mod user;

pub use list::{ListChanges, TodoList, DEFAULT_COLOR};
pub use todo::{Priority, Todo, TodoChanges};
pub use user::User;
