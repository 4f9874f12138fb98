//! Batch service access: the [`BatchService`] seam and its REST implementation

mod auth;
mod client;
mod service;

pub use auth::{SharedKeySigner, SigningRequest, format_ocp_date};
pub use client::{AzureBatchClient, BATCH_CONTENT_TYPE};
pub use service::BatchService;
