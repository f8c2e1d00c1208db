//! Core library for Gitflow.
//!
//! This crate provides the workflow engine: plugin selection, the release
//! and hotfix state machines, and recovery when a workflow fails midway.

mod engine;
mod error;
mod registry;
mod rollback;
mod workflow;

pub use engine::{Gitflow, Operation};
pub use error::{CoreError, CoreResult};
pub use registry::PluginRegistry;
pub use rollback::Rollback;
