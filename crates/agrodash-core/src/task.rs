//! Farm tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{FarmModule, Priority, TaskId, TaskStatus};

/// A task on the farm task board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Short description.
    pub title: String,

    /// Name of the worker in charge.
    pub assignee: String,

    /// Module the task belongs to.
    pub module: FarmModule,

    /// Due date.
    pub due_date: NaiveDate,

    pub priority: Priority,

    pub status: TaskStatus,
}

impl Task {
    /// Create a pending task with medium priority.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        assignee: impl Into<String>,
        module: FarmModule,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            assignee: assignee.into(),
            module,
            due_date,
            priority: Priority::default(),
            status: TaskStatus::default(),
        }
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the task is past due on the given day.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.due_date < today
    }
}
