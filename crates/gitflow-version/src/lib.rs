//! Version and branch model for Gitflow.
//!
//! This crate provides the value types shared by every other crate:
//! - [`Version`]: A `major.minor.patch[-qualifier]` project version
//! - [`Increment`]: Which component an increment touches
//! - [`BranchKind`] and [`BranchNames`]: The Gitflow branch roles and their configured names

mod branch;
mod error;
mod version;

pub use branch::{BranchKind, BranchMatch, BranchNames};
pub use error::{VersionError, VersionResult};
pub use version::{Increment, Version};
