// src/recipe/render.rs

//! Recipe rendering
//!
//! `render()` joins a recipe source with a project metadata record into a
//! `RenderedRecipe`. Population is typed field-by-field rather than string
//! templating, so a missing metadata field fails up front with an error
//! naming the field. Rendering is a pure function of its inputs: the same
//! source and metadata always produce the same descriptor and digest.

use super::{Dependency, DependencySet, RecipeSource};
use crate::error::{Error, Result};
use crate::metadata::ProjectMetadata;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Metadata fields a recipe render requires
const REQUIRED_FIELDS: [&str; 4] = ["version", "url", "license", "description"];

/// A fully rendered recipe descriptor
///
/// Created once per build invocation and never mutated afterwards. The
/// serialized form of this struct is the only persisted layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderedRecipe {
    /// Package name, copied from the source literal
    pub name: String,

    /// Package version, taken from project metadata
    pub version: String,

    /// License identifier
    pub license: String,

    /// Project homepage URL
    pub homepage: String,

    /// One-line summary
    pub summary: String,

    /// Search keywords, carried through when the metadata supplies them
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Project authors, carried through when the metadata supplies them
    #[serde(default)]
    pub authors: Vec<String>,

    /// Rebuild counter
    pub build_number: u32,

    /// True when the artifact carries no architecture-specific binaries
    pub noarch: bool,

    /// Packages required to build
    pub host_requirements: Vec<String>,

    /// Packages required at execution time
    pub run_requirements: Vec<Dependency>,

    /// Post-build verification command lines
    pub checks: Vec<String>,
}

impl RenderedRecipe {
    /// Load a rendered recipe from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading rendered recipe from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let recipe: RenderedRecipe = serde_json::from_str(&content)?;
        Ok(recipe)
    }

    /// Write the rendered recipe as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Wrote rendered recipe to: {}", path.display());
        Ok(())
    }

    /// Return the declared dependency sets verbatim
    ///
    /// No resolution happens here; that is delegated to the external
    /// package manager.
    pub fn dependency_sets(&self) -> DependencySet {
        DependencySet {
            host: self.host_requirements.clone(),
            run: self.run_requirements.clone(),
        }
    }

    /// SHA-256 digest of the canonical serialization, hex-encoded
    ///
    /// Identical inputs render to identical digests, which makes render
    /// idempotency checkable from the outside.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Render a recipe source against a project metadata record
///
/// Fails with `Error::MissingField` if any of the required metadata fields
/// (version, url, license, description) is absent or blank, and with
/// `Error::InvalidVersion` if the version is not a semver version.
pub fn render(source: &RecipeSource, metadata: &ProjectMetadata) -> Result<RenderedRecipe> {
    let run_requirements = source.validate()?;

    for field in REQUIRED_FIELDS {
        metadata.require(field)?;
    }

    let version = metadata.require("version")?;
    semver::Version::parse(version).map_err(|e| Error::InvalidVersion {
        value: version.to_string(),
        source: e,
    })?;

    let recipe = RenderedRecipe {
        name: source.name.clone(),
        version: version.to_string(),
        license: metadata.require("license")?.to_string(),
        homepage: metadata.require("url")?.to_string(),
        summary: metadata.require("description")?.to_string(),
        keywords: metadata.keywords.clone(),
        authors: metadata.authors.clone(),
        build_number: source.build_number,
        noarch: source.noarch,
        host_requirements: source.host_requirements.clone(),
        run_requirements,
        checks: source.checks.clone(),
    };

    info!(
        "Rendered recipe: {} version {} (build {}, {} host deps, {} run deps, {} checks)",
        recipe.name,
        recipe.version,
        recipe.build_number,
        recipe.host_requirements.len(),
        recipe.run_requirements.len(),
        recipe.checks.len()
    );

    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RecipeSource {
        RecipeSource {
            name: "joint-calling".to_string(),
            build_number: 0,
            noarch: true,
            host_requirements: vec!["python".to_string(), "hail".to_string()],
            run_requirements: vec!["click".to_string(), "hail >=0.2.58".to_string()],
            checks: vec!["sample_qc.py --version".to_string()],
        }
    }

    fn metadata() -> ProjectMetadata {
        ProjectMetadata {
            version: Some("1.2.0".to_string()),
            url: Some("https://github.com/populationgenomics/joint-calling".to_string()),
            license: Some("MIT".to_string()),
            description: Some("Pipeline for joint calling".to_string()),
            keywords: vec!["bioinformatics".to_string()],
            authors: Vec::new(),
        }
    }

    #[test]
    fn test_render_populates_all_fields() {
        let recipe = render(&source(), &metadata()).unwrap();
        assert_eq!(recipe.name, "joint-calling");
        assert_eq!(recipe.version, "1.2.0");
        assert_eq!(recipe.build_number, 0);
        assert_eq!(recipe.license, "MIT");
        assert!(recipe.noarch);
        assert_eq!(recipe.run_requirements[1].constraint.as_deref(), Some(">=0.2.58"));
    }

    #[test]
    fn test_render_fails_naming_missing_field() {
        for field in REQUIRED_FIELDS {
            let mut meta = metadata();
            match field {
                "version" => meta.version = None,
                "url" => meta.url = None,
                "license" => meta.license = None,
                "description" => meta.description = None,
                _ => unreachable!(),
            }
            let err = render(&source(), &meta).unwrap_err();
            assert!(
                matches!(&err, Error::MissingField(f) if f == field),
                "expected MissingField({field}), got {err:?}"
            );
        }
    }

    #[test]
    fn test_render_carries_optional_metadata_through() {
        let mut meta = metadata();
        meta.authors = vec!["Population Genomics".to_string()];

        let recipe = render(&source(), &meta).unwrap();
        assert_eq!(recipe.keywords, vec!["bioinformatics"]);
        assert_eq!(recipe.authors, vec!["Population Genomics"]);

        // Round-trips through the persisted form as well
        let json = serde_json::to_string(&recipe).unwrap();
        let loaded: RenderedRecipe = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.authors, vec!["Population Genomics"]);
    }

    #[test]
    fn test_render_rejects_non_semver_version() {
        let mut meta = metadata();
        meta.version = Some("not.a.version".to_string());
        let err = render(&source(), &meta).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
    }

    #[test]
    fn test_render_is_idempotent() {
        let first = render(&source(), &metadata()).unwrap();
        let second = render(&source(), &metadata()).unwrap();
        assert_eq!(first.digest().unwrap(), second.digest().unwrap());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("rendered/joint-calling.json");

        let recipe = render(&source(), &metadata()).unwrap();
        recipe.save(&path).unwrap();

        let loaded = RenderedRecipe::load(&path).unwrap();
        assert_eq!(loaded.digest().unwrap(), recipe.digest().unwrap());
        assert_eq!(loaded.version, "1.2.0");
    }

    #[test]
    fn test_dependency_sets_returned_verbatim() {
        let recipe = render(&source(), &metadata()).unwrap();
        let sets = recipe.dependency_sets();
        assert_eq!(sets.host, vec!["python", "hail"]);
        assert_eq!(sets.run.len(), 2);
        assert_eq!(sets.run[0].name, "click");
    }
}
