//! Conversion between stored `TaskRecord` rows and domain `Task` values.

use crate::model::task::Task;
use crate::repo::task_store::{StoreError, StoreResult, TaskRecord};
use chrono::DateTime;

/// Converts a domain task into its stored shape.
///
/// Sub-millisecond precision of `creation_date` is dropped.
pub fn to_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        creation_date: task.creation_date.timestamp_millis(),
        completed: task.completed,
    }
}

/// Converts a stored row back into a domain task.
pub fn to_task(record: TaskRecord) -> StoreResult<Task> {
    let creation_date = DateTime::from_timestamp_millis(record.creation_date).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "creation_date `{}` out of range for task {}",
            record.creation_date, record.id
        ))
    })?;

    Ok(Task {
        id: record.id,
        title: record.title,
        description: record.description,
        creation_date,
        completed: record.completed,
    })
}
