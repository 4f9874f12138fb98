//! Job plan: a job together with the tasks to add to it, in order

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{JobSpec, TaskSpec};

/// A job and its ordered tasks
///
/// Invariants, checked by [`JobPlan::add_task`]:
/// - task ids are unique within the job
/// - a task depends only on tasks added before it
///
/// Submitting tasks in plan order therefore never references a task the
/// service does not know yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobPlan {
    job: JobSpec,
    tasks: Vec<TaskSpec>,
}

impl JobPlan {
    pub fn new(job: JobSpec) -> Self {
        Self {
            job,
            tasks: Vec::new(),
        }
    }

    /// Append a task, enforcing the plan invariants
    pub fn add_task(&mut self, task: TaskSpec) -> AppResult<&TaskSpec> {
        if self.task(&task.id).is_some() {
            return Err(AppError::validation(
                "task.id",
                format!("Task id '{}' already exists in job '{}'", task.id, self.job.id),
            ));
        }

        if let Some(missing) = task
            .dependency_ids()
            .iter()
            .find(|dep| self.task(dep).is_none())
        {
            return Err(AppError::validation(
                "task.dependsOn",
                format!(
                    "Task '{}' depends on '{}', which is not part of job '{}'",
                    task.id, missing, self.job.id
                ),
            ));
        }

        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn job(&self) -> &JobSpec {
        &self.job
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&TaskSpec> {
        self.tasks.iter().find(|task| task.id == id)
    }
}
