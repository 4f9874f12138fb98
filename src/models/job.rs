//! Batch job model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Pool the job's tasks run on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInformation {
    pub pool_id: String,
}

/// Job creation request, in the batch REST wire shape
///
/// This is also the "descriptive metadata" printed after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub id: String,
    pub pool_info: PoolInformation,
    pub uses_task_dependencies: bool,
}

impl JobSpec {
    /// Build a job with task dependency evaluation enabled
    pub fn new(id: impl Into<String>, pool_id: impl Into<String>) -> AppResult<Self> {
        let id = id.into();
        let pool_id = pool_id.into();

        if id.trim().is_empty() {
            return Err(AppError::validation("job.id", "Job id cannot be empty"));
        }
        if pool_id.trim().is_empty() {
            return Err(AppError::validation(
                "job.poolInfo.poolId",
                "Pool id cannot be empty",
            ));
        }

        Ok(Self {
            id,
            pool_info: PoolInformation { pool_id },
            uses_task_dependencies: true,
        })
    }

    pub fn pool_id(&self) -> &str {
        &self.pool_info.pool_id
    }
}

/// Generate an identifier made of `prefix` and a fresh v4 UUID
pub fn generate_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4())
}
