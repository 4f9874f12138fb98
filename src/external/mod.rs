//! Clients for the remote services batchflow talks to

pub mod batch;
pub mod client;
