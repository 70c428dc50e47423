//! Core types, configuration, and deployment selection for the Kinesis consumer.
//!
//! This crate provides the building blocks shared by every other crate in the
//! workspace: the process-level [`ConsumerConfig`] read from the environment,
//! the [`Deployment`] choice between a LocalStack-style local endpoint and the
//! real cloud, and common AWS identifiers.

mod config;
mod deployment;
mod error;
mod types;

pub use config::{ConsumerConfig, LogFormat};
pub use deployment::Deployment;
pub use error::{ConsumerError, ConsumerResult};
pub use types::{AwsRegion, RoleArn};
