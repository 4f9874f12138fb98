//! Container task model

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Container image the task runs in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContainerSettings {
    pub image_name: String,
}

/// One environment variable binding for the task process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSetting {
    pub name: String,
    pub value: String,
}

/// Tasks that must complete successfully before this one may start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDependencies {
    pub task_ids: Vec<String>,
}

/// Task creation request, in the batch REST wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub id: String,
    pub command_line: String,
    pub container_settings: TaskContainerSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_settings: Vec<EnvironmentSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<TaskDependencies>,
}

impl TaskSpec {
    pub fn builder(
        id: impl Into<String>,
        command_line: impl Into<String>,
        image_name: impl Into<String>,
    ) -> TaskSpecBuilder {
        TaskSpecBuilder {
            id: id.into(),
            command_line: command_line.into(),
            image_name: image_name.into(),
            environment: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    /// Ids of the tasks this one waits for (empty when independent)
    pub fn dependency_ids(&self) -> &[String] {
        self.depends_on
            .as_ref()
            .map(|deps| deps.task_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment_settings
            .iter()
            .find(|setting| setting.name == name)
            .map(|setting| setting.value.as_str())
    }

    pub fn image_name(&self) -> &str {
        &self.container_settings.image_name
    }
}

/// Builder validating required task fields at construction time
#[derive(Debug, Clone)]
pub struct TaskSpecBuilder {
    id: String,
    command_line: String,
    image_name: String,
    environment: Vec<EnvironmentSetting>,
    depends_on: Vec<String>,
}

impl TaskSpecBuilder {
    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push(EnvironmentSetting {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn depends_on(mut self, task_id: impl Into<String>) -> Self {
        self.depends_on.push(task_id.into());
        self
    }

    pub fn build(self) -> AppResult<TaskSpec> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("task.id", "Task id cannot be empty"));
        }
        if self.command_line.trim().is_empty() {
            return Err(AppError::validation(
                "task.commandLine",
                format!("Task '{}' has an empty command line", self.id),
            ));
        }
        if self.image_name.trim().is_empty() {
            return Err(AppError::validation(
                "task.containerSettings.imageName",
                format!("Task '{}' has no container image", self.id),
            ));
        }
        if let Some(setting) = self.environment.iter().find(|s| s.name.trim().is_empty()) {
            return Err(AppError::validation(
                "task.environmentSettings",
                format!("Environment variable with value '{}' has no name", setting.value),
            ));
        }
        if self.depends_on.iter().any(|dep| dep == &self.id) {
            return Err(AppError::validation(
                "task.dependsOn",
                format!("Task '{}' cannot depend on itself", self.id),
            ));
        }

        Ok(TaskSpec {
            id: self.id,
            command_line: self.command_line,
            container_settings: TaskContainerSettings {
                image_name: self.image_name,
            },
            environment_settings: self.environment,
            depends_on: (!self.depends_on.is_empty()).then(|| TaskDependencies {
                task_ids: self.depends_on,
            }),
        })
    }
}
