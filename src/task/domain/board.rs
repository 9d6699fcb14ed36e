//! Role-scoped partitioning of task lists into display buckets.

use super::{Task, TaskId, TaskStatus, User, UserId};
use serde::{Deserialize, Serialize};

/// Whose perspective a task list is partitioned for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "user_id", rename_all = "snake_case")]
pub enum Viewer {
    /// A worker sees only tasks assigned to them.
    Worker(UserId),
    /// An admin sees tasks across all workers.
    Admin,
}

impl Viewer {
    /// Derives the viewer for an authenticated user.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        if user.is_admin() {
            Self::Admin
        } else {
            Self::Worker(user.id().clone())
        }
    }

    /// Returns whether `task` is visible to this viewer at all.
    #[must_use]
    pub fn can_see(&self, task: &Task) -> bool {
        match self {
            Self::Worker(worker_id) => task.is_assigned_to(worker_id),
            Self::Admin => true,
        }
    }
}

/// Tasks grouped into the three buckets a dashboard renders.
///
/// For workers the buckets are "To Do", "Under Review" and "Completed". For
/// admins they are outstanding assignments, the review queue and completed
/// work. Each bucket keeps the order tasks were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBoard {
    /// Pending or rejected tasks.
    pub to_do: Vec<Task>,
    /// Submitted tasks awaiting review.
    pub under_review: Vec<Task>,
    /// Approved tasks.
    pub completed: Vec<Task>,
}

impl TaskBoard {
    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_do.len() + self.under_review.len() + self.completed.len()
    }

    /// Returns whether the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds a task on the board by identifier.
    #[must_use]
    pub fn find(&self, task_id: &TaskId) -> Option<&Task> {
        self.to_do
            .iter()
            .chain(&self.under_review)
            .chain(&self.completed)
            .find(|task| task.id() == task_id)
    }
}

/// Partitions `tasks` for `viewer`, preserving input order within buckets.
///
/// Tasks the viewer cannot see are dropped.
#[must_use]
pub fn partition(tasks: impl IntoIterator<Item = Task>, viewer: &Viewer) -> TaskBoard {
    let mut board = TaskBoard::default();
    for task in tasks.into_iter().filter(|task| viewer.can_see(task)) {
        match task.status() {
            TaskStatus::Pending | TaskStatus::Rejected => board.to_do.push(task),
            TaskStatus::Submitted => board.under_review.push(task),
            TaskStatus::Approved => board.completed.push(task),
        }
    }
    board
}
