//! Typed requests exchanged with the batch service and the event endpoint

pub mod event;
pub mod job;
pub mod plan;
pub mod task;

pub use event::{JOB_FINISHED_EVENT, NotificationEvent, encode_batch, format_event_time};
pub use job::{JobSpec, PoolInformation, generate_id};
pub use plan::JobPlan;
pub use task::{EnvironmentSetting, TaskContainerSettings, TaskDependencies, TaskSpec, TaskSpecBuilder};
