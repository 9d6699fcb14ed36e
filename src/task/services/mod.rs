//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AssignTaskRequest, ReviewWorkRequest, SubmitWorkRequest, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService,
};
