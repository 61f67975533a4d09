//! Deployment orchestrator.
//!
//! Runs a single deployment request end-to-end as a sequential pipeline:
//! validation, encoding, sponsored submission, bounded receipt wait, and
//! event decoding. No step is retried; every failure is surfaced once with
//! the stage it occurred in, and the caller decides whether to start over.

pub mod error;
pub mod service;

pub use error::{DeployError, DeployStage};
pub use service::{CancelHandle, DeployService, DeployServiceBuilder};
