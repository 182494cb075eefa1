// src/recipe/mod.rs

//! Recipe model and dependency declarations
//!
//! A recipe has two halves:
//! - `RecipeSource`: the maintainer-edited part (name, build number, noarch
//!   flag, dependency declarations, verification commands)
//! - `RenderedRecipe`: the source joined with project metadata by `render()`
//!
//! Dependency sets are declared verbatim and returned verbatim; resolving
//! them against a package ecosystem is the external package manager's job.

pub mod render;

pub use render::{render, RenderedRecipe};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// A declared run dependency: a name with an optional version constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency package name
    pub name: String,

    /// Version constraint (e.g. ">=0.2.58"), verbatim from the declaration
    pub constraint: Option<String>,
}

impl Dependency {
    /// Parse a requirement string
    ///
    /// Format: "name" or "name >=1.2.3" (everything after the first
    /// whitespace run is the constraint).
    pub fn parse(requirement: &str) -> Result<Self> {
        let requirement = requirement.trim();
        if requirement.is_empty() {
            return Err(Error::MissingField("requirement name".to_string()));
        }

        match requirement.split_once(char::is_whitespace) {
            Some((name, constraint)) => {
                let constraint = constraint.trim();
                semver::VersionReq::parse(constraint).map_err(|e| Error::InvalidConstraint {
                    name: name.to_string(),
                    constraint: constraint.to_string(),
                    source: e,
                })?;
                Ok(Self {
                    name: name.to_string(),
                    constraint: Some(constraint.to_string()),
                })
            }
            None => Ok(Self {
                name: requirement.to_string(),
                constraint: None,
            }),
        }
    }
}

/// Host and run dependency sets, as declared
///
/// Order carries no meaning; equality is name-based and order-independent.
#[derive(Debug, Clone, Serialize)]
pub struct DependencySet {
    /// Packages needed only to build the artifact
    pub host: Vec<String>,

    /// Packages needed at execution time by the built artifact
    pub run: Vec<Dependency>,
}

impl DependencySet {
    /// Compare two sets ignoring declaration order
    pub fn equivalent(&self, other: &DependencySet) -> bool {
        let mut host_a = self.host.clone();
        let mut host_b = other.host.clone();
        host_a.sort();
        host_b.sort();

        let mut run_a = self.run.clone();
        let mut run_b = other.run.clone();
        run_a.sort_by(|a, b| a.name.cmp(&b.name));
        run_b.sort_by(|a, b| a.name.cmp(&b.name));

        host_a == host_b && run_a == run_b
    }
}

/// The maintainer-edited half of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSource {
    /// Package name, a fixed literal
    pub name: String,

    /// Rebuild counter; bumped by maintainers on rebuild without a version
    /// bump, never mutated by the tool
    #[serde(default)]
    pub build_number: u32,

    /// Asserts the artifact contains no architecture-specific binaries
    #[serde(default = "default_noarch")]
    pub noarch: bool,

    /// Names required to build (e.g. "python", "hail")
    #[serde(default)]
    pub host_requirements: Vec<String>,

    /// Requirement strings for execution time, "name" or "name >=1.2.3"
    #[serde(default)]
    pub run_requirements: Vec<String>,

    /// Verification command lines run post-build, each must succeed
    #[serde(default)]
    pub checks: Vec<String>,
}

fn default_noarch() -> bool {
    true
}

impl RecipeSource {
    /// Load a recipe source from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading recipe source from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let source: RecipeSource = serde_json::from_str(&content)?;
        Ok(source)
    }

    /// Validate the declarations and parse the run requirements
    ///
    /// Checks that the name is non-empty, dependency names are unique within
    /// each set, constraints parse, and no check command is blank.
    pub fn validate(&self) -> Result<Vec<Dependency>> {
        if self.name.trim().is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }

        let mut seen_host = HashSet::new();
        for name in &self.host_requirements {
            if !seen_host.insert(name.as_str()) {
                return Err(Error::DuplicateDependency(name.clone()));
            }
        }

        let mut run = Vec::with_capacity(self.run_requirements.len());
        let mut seen_run = HashSet::new();
        for requirement in &self.run_requirements {
            let dep = Dependency::parse(requirement)?;
            if !seen_run.insert(dep.name.clone()) {
                return Err(Error::DuplicateDependency(dep.name));
            }
            run.push(dep);
        }

        for command in &self.checks {
            if command.trim().is_empty() {
                return Err(Error::EmptyCommand);
            }
        }

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint_calling_source() -> RecipeSource {
        RecipeSource {
            name: "joint-calling".to_string(),
            build_number: 0,
            noarch: true,
            host_requirements: vec!["python".to_string(), "hail".to_string()],
            run_requirements: vec![
                "python".to_string(),
                "hail >=0.2.58".to_string(),
                "click".to_string(),
                "pandas".to_string(),
            ],
            checks: vec![
                "sample_qc.py --version".to_string(),
                "combine_gvcfs.py --version".to_string(),
                "mt_to_vcf.py --version".to_string(),
            ],
        }
    }

    #[test]
    fn test_parse_bare_dependency() {
        let dep = Dependency::parse("click").unwrap();
        assert_eq!(dep.name, "click");
        assert!(dep.constraint.is_none());
    }

    #[test]
    fn test_parse_constrained_dependency() {
        let dep = Dependency::parse("hail >=0.2.58").unwrap();
        assert_eq!(dep.name, "hail");
        assert_eq!(dep.constraint.as_deref(), Some(">=0.2.58"));
    }

    #[test]
    fn test_parse_invalid_constraint() {
        let result = Dependency::parse("hail not-a-constraint");
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidConstraint { name, .. } if name == "hail"
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_source() {
        let source = joint_calling_source();
        let run = source.validate().unwrap();
        assert_eq!(run.len(), 4);
        assert_eq!(run[1].name, "hail");
    }

    #[test]
    fn test_validate_rejects_duplicate_run_dependency() {
        let mut source = joint_calling_source();
        source.run_requirements.push("click >=7".to_string());
        let err = source.validate().unwrap_err();
        assert!(matches!(err, Error::DuplicateDependency(name) if name == "click"));
    }

    #[test]
    fn test_validate_rejects_duplicate_host_dependency() {
        let mut source = joint_calling_source();
        source.host_requirements.push("python".to_string());
        let err = source.validate().unwrap_err();
        assert!(matches!(err, Error::DuplicateDependency(name) if name == "python"));
    }

    #[test]
    fn test_validate_rejects_blank_check() {
        let mut source = joint_calling_source();
        source.checks.push("   ".to_string());
        assert!(matches!(source.validate().unwrap_err(), Error::EmptyCommand));
    }

    #[test]
    fn test_dependency_sets_order_independent() {
        let a = DependencySet {
            host: vec!["python".to_string(), "hail".to_string()],
            run: vec![
                Dependency::parse("click").unwrap(),
                Dependency::parse("pandas").unwrap(),
            ],
        };
        let b = DependencySet {
            host: vec!["hail".to_string(), "python".to_string()],
            run: vec![
                Dependency::parse("pandas").unwrap(),
                Dependency::parse("click").unwrap(),
            ],
        };
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_dependency_set_serializes_to_json() {
        let sets = DependencySet {
            host: vec!["python".to_string()],
            run: vec![Dependency::parse("hail >=0.2.58").unwrap()],
        };

        let json: serde_json::Value = serde_json::to_value(&sets).unwrap();
        assert_eq!(json["host"][0], "python");
        assert_eq!(json["run"][0]["name"], "hail");
        assert_eq!(json["run"][0]["constraint"], ">=0.2.58");
    }

    #[test]
    fn test_noarch_defaults_to_true() {
        let source: RecipeSource = serde_json::from_str(r#"{"name": "joint-calling"}"#).unwrap();
        assert!(source.noarch);
        assert_eq!(source.build_number, 0);
    }
}
