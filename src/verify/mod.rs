// src/verify/mod.rs

//! Post-build smoke verification
//!
//! Runs each of a rendered recipe's check commands against a staged
//! environment. This is a smoke test, not a resilience mechanism: commands
//! run sequentially, the first non-zero exit fails the build, and nothing
//! is retried. A command that cannot be found resolves to exit code 127,
//! matching shell convention.

use crate::error::{Error, Result};
use crate::recipe::RenderedRecipe;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Exit code reported when a command is absent from the staged environment
const EXIT_NOT_FOUND: i32 = 127;

/// The filesystem state produced by a build, against which verification runs
#[derive(Debug, Clone)]
pub struct StagedEnvironment {
    root: PathBuf,
}

impl StagedEnvironment {
    /// Open a staged environment rooted at the given directory
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::StagedEnvNotFound(root.display().to_string()));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the staged entry points
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Resolve a program name against the staged bin directory
    ///
    /// Falls back to the bare name (ambient PATH lookup) when the staged
    /// copy does not exist; the spawn itself then decides whether the
    /// command is missing.
    fn resolve(&self, program: &str) -> PathBuf {
        let staged = self.bin_dir().join(program);
        if staged.is_file() {
            staged
        } else {
            PathBuf::from(program)
        }
    }
}

/// Outcome of a single verification command
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    /// The command line as declared in the recipe
    pub command: String,

    /// Process exit code (0 = success)
    pub exit_code: i32,

    /// First line of standard output, by convention the version string
    pub version: Option<String>,
}

/// Report for a full verification run
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Recipe name the run verified
    pub recipe: String,

    /// RFC 3339 timestamps bracketing the run
    pub started_at: String,
    pub finished_at: String,

    /// Per-command outcomes, in execution order
    pub results: Vec<CommandResult>,
}

/// Run every check command of a rendered recipe against a staged environment
///
/// Succeeds only if each command exits 0. Fails fast with
/// `Error::VerificationFailed { command, exit_code }` on the first non-zero
/// exit; later commands are not executed.
pub fn verify(recipe: &RenderedRecipe, staged: &StagedEnvironment) -> Result<VerificationReport> {
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut results = Vec::with_capacity(recipe.checks.len());

    for command_line in &recipe.checks {
        let result = run_check(command_line, staged)?;
        if result.exit_code != 0 {
            return Err(Error::VerificationFailed {
                command: command_line.clone(),
                exit_code: result.exit_code,
            });
        }
        debug!(
            "Check passed: '{}' ({})",
            command_line,
            result.version.as_deref().unwrap_or("no output")
        );
        results.push(result);
    }

    let finished_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    info!(
        "Verification passed: {} ({} checks)",
        recipe.name,
        results.len()
    );

    Ok(VerificationReport {
        recipe: recipe.name.clone(),
        started_at,
        finished_at,
        results,
    })
}

/// Run a single check command, mapping a missing program to exit 127
fn run_check(command_line: &str, staged: &StagedEnvironment) -> Result<CommandResult> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or(Error::EmptyCommand)?;
    let args: Vec<&str> = parts.collect();

    let resolved = staged.resolve(program);
    debug!("Running check: {} {}", resolved.display(), args.join(" "));

    let output = match Command::new(&resolved)
        .args(&args)
        .env("PATH", checked_path(staged))
        .output()
    {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CommandResult {
                command: command_line.to_string(),
                exit_code: EXIT_NOT_FOUND,
                version: None,
            });
        }
        Err(e) => return Err(Error::Io(e)),
    };

    // Signal-terminated processes have no exit code; report -1
    let exit_code = output.status.code().unwrap_or(-1);
    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty());

    Ok(CommandResult {
        command: command_line.to_string(),
        exit_code,
        version,
    })
}

/// PATH for check processes: staged bin first, ambient PATH after
fn checked_path(staged: &StagedEnvironment) -> String {
    match std::env::var("PATH") {
        Ok(path) => format!("{}:{}", staged.bin_dir().display(), path),
        Err(_) => staged.bin_dir().display().to_string(),
    }
}
