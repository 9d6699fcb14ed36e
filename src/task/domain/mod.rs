//! Domain model for the task review lifecycle.
//!
//! Covers the task aggregate and its status machine, the validated inputs
//! that drive transitions, role-scoped board partitioning and deadline
//! urgency. Nothing here performs I/O.

mod assignment;
mod board;
mod error;
mod ids;
mod review;
mod submission;
mod task;
mod urgency;
mod user;

pub use assignment::{MAX_TITLE_CHARS, TaskAssignment};
pub use board::{TaskBoard, Viewer, partition};
pub use error::{ParseRoleError, ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, UserId};
pub use review::{ReviewDecision, ReviewOutcome, ReviewRecord};
pub use submission::Submission;
pub use task::{PersistedTaskData, Task, TaskStatus};
pub use urgency::{UrgencyTier, classify, days_until};
pub use user::{Role, User, UserRef};
