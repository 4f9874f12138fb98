//! Submit command handler
//!
//! Builds the job plan from the command arguments and either prints it
//! (dry run) or submits it and prints the created job.

use std::sync::Arc;

use crate::config::{BatchCredentials, Settings, SubmitInputs};
use crate::error::AppResult;
use crate::external::batch::{AzureBatchClient, BatchService};
use crate::services::{JobSubmitter, build_plan};

/// Handler for the submit command
pub struct SubmitCommandHandler {
    config: Settings,
}

impl SubmitCommandHandler {
    /// Create a new submit command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the submit command
    ///
    /// Batch credentials are only read when the job is actually submitted, so
    /// a dry run works without them.
    ///
    /// # Errors
    /// - `Configuration` for missing credentials
    /// - `Submission` when the batch service rejects a call
    pub async fn execute(&self, inputs: SubmitInputs, dry_run: bool) -> AppResult<()> {
        let output = if dry_run {
            self.dry_run(&inputs)?
        } else {
            let credentials = BatchCredentials::from_env()?;
            tracing::debug!(?credentials, "Batch credentials loaded");
            let client = AzureBatchClient::new(&credentials, &self.config.batch)?;
            self.submit_with(Arc::new(client), &inputs).await?
        };

        println!("{}", output);
        Ok(())
    }

    /// Build the plan and render it as JSON without contacting the service
    pub fn dry_run(&self, inputs: &SubmitInputs) -> AppResult<String> {
        let plan = build_plan(&self.config.batch, inputs)?;
        tracing::info!(
            job_id = %plan.job().id,
            tasks = plan.tasks().len(),
            "Dry run: job not submitted"
        );
        to_pretty_json(&plan)
    }

    /// Submit through `service` and render the created job as JSON
    pub async fn submit_with(
        &self,
        service: Arc<dyn BatchService>,
        inputs: &SubmitInputs,
    ) -> AppResult<String> {
        let submitter = JobSubmitter::new(service, self.config.batch.clone());
        let job = submitter.submit(inputs).await?;
        to_pretty_json(&job)
    }
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?)
}
