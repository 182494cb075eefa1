// src/metadata/mod.rs

//! Project metadata loading
//!
//! The metadata record is the external half of a recipe: version, homepage,
//! license, and description as declared by the project itself. It is loaded
//! from a JSON file and handed to `render()` as an explicit input, so that
//! rendering stays a pure function of its arguments.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Project metadata record consumed by recipe rendering
///
/// All fields are optional at load time. `render()` decides which fields are
/// required and fails with `Error::MissingField` naming the first absent one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project version string (e.g. "0.1.2")
    pub version: Option<String>,

    /// Project homepage URL
    pub url: Option<String>,

    /// License identifier (e.g. "MIT")
    pub license: Option<String>,

    /// One-line project description
    pub description: Option<String>,

    /// Search keywords (optional, informational)
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Project authors (optional, informational)
    #[serde(default)]
    pub authors: Vec<String>,
}

impl ProjectMetadata {
    /// Load metadata from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading project metadata from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let metadata: ProjectMetadata = serde_json::from_str(&content)?;
        Ok(metadata)
    }

    /// Get a required field, treating absent and blank values the same
    ///
    /// Returns `Error::MissingField` naming the field if it is absent or
    /// contains only whitespace.
    pub fn require(&self, field: &str) -> Result<&str> {
        let value = match field {
            "version" => self.version.as_deref(),
            "url" => self.url.as_deref(),
            "license" => self.license.as_deref(),
            "description" => self.description.as_deref(),
            _ => None,
        };

        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(Error::MissingField(field.to_string())),
        }
    }
}
