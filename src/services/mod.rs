//! Service layer for the two workflows.
//!
//! Services own the workflow logic and reach remote systems only through the
//! `BatchService` and `NotificationProvider` traits.

mod job_submitter;
pub mod notifications;

pub use job_submitter::{JobSubmitter, build_plan};
pub use notifications::{CompletionNotifier, EventGridProvider, NotificationProvider};
