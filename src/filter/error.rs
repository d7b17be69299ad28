use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid listId: '{0}' is not a valid ID")]
    InvalidListId(String),

    #[error("Invalid due date: '{0}' must be MM-DD-YYYY or 'all'")]
    InvalidDue(String),

    #[error("Invalid completed flag: '{0}' must be true, false or all")]
    InvalidCompleted(String),
}

impl FilterError {
    /// Query parameter the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            FilterError::InvalidListId(_) => "listId",
            FilterError::InvalidDue(_) => "due",
            FilterError::InvalidCompleted(_) => "completed",
        }
    }
}
