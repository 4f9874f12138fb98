//! Job submitter: creates a job with a primary task and a dependent notifier task.

use std::sync::Arc;

use crate::config::inputs::{GRID_ENDPOINT_VAR, GRID_KEY_VAR};
use crate::config::{BatchConfig, SubmitInputs};
use crate::error::AppResult;
use crate::external::batch::BatchService;
use crate::models::{JobPlan, JobSpec, TaskSpec, generate_id};

/// Submits the two-task job to a batch service.
#[derive(Clone)]
pub struct JobSubmitter {
    service: Arc<dyn BatchService>,
    config: BatchConfig,
}

impl JobSubmitter {
    /// Creates a new JobSubmitter over the given batch service.
    pub fn new(service: Arc<dyn BatchService>, config: BatchConfig) -> Self {
        Self { service, config }
    }

    /// Builds the job and both tasks without contacting the service.
    pub fn plan(&self, inputs: &SubmitInputs) -> AppResult<JobPlan> {
        build_plan(&self.config, inputs)
    }

    /// Creates the job, then adds its tasks in plan order.
    ///
    /// Calls are sequential and stop at the first failure, so a rejected
    /// primary task means the notifier task is never added.
    pub async fn submit(&self, inputs: &SubmitInputs) -> AppResult<JobSpec> {
        let plan = self.plan(inputs)?;
        self.submit_plan(&plan).await?;
        Ok(plan.job().clone())
    }

    /// Submits an already built plan.
    pub async fn submit_plan(&self, plan: &JobPlan) -> AppResult<()> {
        let job = plan.job();
        tracing::info!(job_id = %job.id, pool_id = %job.pool_id(), "Creating job");
        self.service.create_job(job).await?;

        for task in plan.tasks() {
            tracing::info!(
                job_id = %job.id,
                task_id = %task.id,
                image = %task.image_name(),
                depends_on = ?task.dependency_ids(),
                "Adding task"
            );
            self.service.add_task(&job.id, task).await?;
        }

        tracing::info!(job_id = %job.id, tasks = plan.tasks().len(), "Job submitted");
        Ok(())
    }
}

/// Builds the job plan for `inputs`: a primary task and a notifier task.
///
/// The notifier task depends on the primary task and carries the event
/// endpoint and key in its environment.
pub fn build_plan(config: &BatchConfig, inputs: &SubmitInputs) -> AppResult<JobPlan> {
    let job = JobSpec::new(generate_id(&config.job_id_prefix), &inputs.pool_id)?;
    let mut plan = JobPlan::new(job);

    let primary = TaskSpec::builder(
        generate_id(&config.primary_task_id_prefix),
        &config.primary_command_line,
        inputs.image(&config.primary_image),
    )
    .build()?;
    let primary_id = plan.add_task(primary)?.id.clone();

    let notifier = TaskSpec::builder(
        generate_id(&config.notifier_task_id_prefix),
        &config.notifier_command_line,
        inputs.image(&config.notifier_image),
    )
    .depends_on(primary_id)
    .env(GRID_ENDPOINT_VAR, inputs.event_endpoint.as_str())
    .env(GRID_KEY_VAR, &inputs.event_key)
    .build()?;
    plan.add_task(notifier)?;

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateJob(JobSpec),
        AddTask(String, TaskSpec),
    }

    /// In-memory batch service that records calls
    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<Call>>,
        /// Reject the n-th `add_task` call (0-based)
        reject_task: Option<usize>,
    }

    impl RecordingService {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchService for RecordingService {
        async fn create_job(&self, job: &JobSpec) -> AppResult<()> {
            self.calls.lock().unwrap().push(Call::CreateJob(job.clone()));
            Ok(())
        }

        async fn add_task(&self, job_id: &str, task: &TaskSpec) -> AppResult<()> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls
                .iter()
                .filter(|call| matches!(call, Call::AddTask(..)))
                .count();
            calls.push(Call::AddTask(job_id.to_string(), task.clone()));

            if self.reject_task == Some(index) {
                return Err(AppError::Submission {
                    operation: "add task".to_string(),
                    status: Some(400),
                    message: "InvalidPropertyValue".to_string(),
                });
            }
            Ok(())
        }
    }

    fn inputs() -> SubmitInputs {
        SubmitInputs::new("p1", "myreg.io", "https://eg.example/api", "k1").unwrap()
    }

    fn submitter(service: Arc<RecordingService>) -> JobSubmitter {
        JobSubmitter::new(service, BatchConfig::default())
    }

    #[tokio::test]
    async fn test_submit_creates_one_job_and_two_tasks() {
        let service = Arc::new(RecordingService::default());
        let job = submitter(service.clone()).submit(&inputs()).await.unwrap();

        assert!(job.id.starts_with("test-container-job-"));
        assert_eq!(job.pool_id(), "p1");
        assert!(job.uses_task_dependencies);

        let calls = service.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], Call::CreateJob(job.clone()));

        let (Call::AddTask(job_a, primary), Call::AddTask(job_b, notifier)) =
            (&calls[1], &calls[2])
        else {
            panic!("expected two add_task calls, got {calls:?}");
        };
        assert_eq!(job_a, &job.id);
        assert_eq!(job_b, &job.id);

        assert!(primary.id.starts_with("test-container-task-"));
        assert_eq!(primary.image_name(), "myreg.io/progrium-stress");
        assert_eq!(primary.command_line, "--cpu 2 --timeout 60s");
        assert!(primary.dependency_ids().is_empty());

        assert!(notifier.id.starts_with("test-notification-task-"));
        assert_eq!(notifier.image_name(), "myreg.io/send-event");
        assert_eq!(notifier.dependency_ids(), [primary.id.clone()]);
        assert_eq!(notifier.env("GRID_ENDPOINT"), Some("https://eg.example/api"));
        assert_eq!(notifier.env("GRID_KEY"), Some("k1"));
        assert_eq!(notifier.environment_settings.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_primary_task_stops_submission() {
        let service = Arc::new(RecordingService {
            reject_task: Some(0),
            ..Default::default()
        });

        let err = submitter(service.clone())
            .submit(&inputs())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Submission { status: Some(400), .. }));

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[1], Call::AddTask(_, ref task) if task.id.starts_with("test-container-task-")));
    }

    #[test]
    fn test_plan_uses_configured_images_and_prefixes() {
        let config = BatchConfig {
            job_id_prefix: "nightly-".to_string(),
            primary_image: "worker:1.2".to_string(),
            notifier_command_line: "/bin/notify".to_string(),
            ..Default::default()
        };
        let submitter = JobSubmitter::new(Arc::new(RecordingService::default()), config);

        let plan = submitter.plan(&inputs()).unwrap();
        assert!(plan.job().id.starts_with("nightly-"));
        assert_eq!(plan.tasks()[0].image_name(), "myreg.io/worker:1.2");
        assert_eq!(plan.tasks()[1].command_line, "/bin/notify");
    }

    #[test]
    fn test_plans_get_distinct_ids() {
        let submitter = submitter(Arc::new(RecordingService::default()));
        let a = submitter.plan(&inputs()).unwrap();
        let b = submitter.plan(&inputs()).unwrap();
        assert_ne!(a.job().id, b.job().id);
        assert_ne!(a.tasks()[0].id, b.tasks()[0].id);
    }

    #[test]
    fn test_missing_input_fails_before_any_call() {
        assert!(SubmitInputs::new("p1", "", "https://eg.example/api", "k1").is_err());

        let err: AppError = SubmitInputs::new("", "myreg.io", "https://eg.example/api", "k1")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Configuration { ref key, .. } if key == "pool-name"));
    }
}
