//! Tagged outcome carried by observable task feeds.

use crate::repo::task_repository::TaskError;

/// Latest state of an asynchronous read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome<T> {
    /// No value has been produced yet.
    #[default]
    Loading,
    Success(T),
    Error(TaskError),
}

impl<T> Outcome<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns the payload when the read succeeded.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<T, TaskError>> for Outcome<T> {
    fn from(value: Result<T, TaskError>) -> Self {
        match value {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(err),
        }
    }
}
