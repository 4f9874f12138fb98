use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{JobSpec, TaskSpec};

/// Job and task creation on a batch service
///
/// Implementations perform exactly one remote call per method and never
/// retry. A rejected call surfaces as `AppError::Submission`.
#[async_trait]
pub trait BatchService: Send + Sync {
    /// Create a job bound to its pool
    async fn create_job(&self, job: &JobSpec) -> AppResult<()>;

    /// Add a task to an existing job
    async fn add_task(&self, job_id: &str, task: &TaskSpec) -> AppResult<()>;
}
