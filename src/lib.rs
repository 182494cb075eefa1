// src/lib.rs

//! Galley Recipe Tool
//!
//! Renders package recipes from project metadata and smoke-tests the
//! resulting staged environment's command-line entry points.
//!
//! # Architecture
//!
//! - Typed rendering: metadata fields populate a record constructor,
//!   no string templating
//! - Descriptors are stateless: rendered once per build, never mutated
//! - Dependency sets are declared verbatim; resolution belongs to the
//!   external package manager
//! - Verification is fail-fast: the first non-zero exit aborts the build

pub mod metadata;
pub mod recipe;
pub mod verify;

mod error;

pub use error::{Error, Result};
