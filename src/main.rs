// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use galley::metadata::ProjectMetadata;
use galley::recipe::{render, RecipeSource, RenderedRecipe};
use galley::verify::{verify, StagedEnvironment};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author, version, about = "Recipe renderer and post-build smoke verifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a recipe from project metadata
    Render {
        /// Path to the recipe source JSON
        #[arg(short, long)]
        recipe: PathBuf,
        /// Path to the project metadata JSON
        #[arg(short, long)]
        metadata: PathBuf,
        /// Where to write the rendered descriptor
        #[arg(short, long)]
        out: PathBuf,
    },
    /// List the declared dependency sets of a rendered recipe
    Deps {
        /// Path to the rendered descriptor JSON
        #[arg(short, long)]
        recipe: PathBuf,
        /// Show only host (build-time) dependencies
        #[arg(long, conflicts_with = "run_only")]
        host_only: bool,
        /// Show only run (execution-time) dependencies
        #[arg(long)]
        run_only: bool,
        /// Emit the dependency sets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the smoke checks of a rendered recipe against a staged environment
    Verify {
        /// Path to the rendered descriptor JSON
        #[arg(short, long)]
        recipe: PathBuf,
        /// Staged environment root directory
        #[arg(short, long)]
        staged: PathBuf,
        /// Emit the verification report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render and verify in one pass (the full build invocation)
    Check {
        /// Path to the recipe source JSON
        #[arg(short, long)]
        recipe: PathBuf,
        /// Path to the project metadata JSON
        #[arg(short, long)]
        metadata: PathBuf,
        /// Staged environment root directory
        #[arg(short, long)]
        staged: PathBuf,
        /// Emit the verification report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}

/// Print one dependency set in `name [constraint]` lines
fn print_deps(recipe: &RenderedRecipe, host_only: bool, run_only: bool) {
    let sets = recipe.dependency_sets();

    if !run_only {
        println!("Host dependencies ({}):", sets.host.len());
        for name in &sets.host {
            println!("  {}", name);
        }
    }

    if !host_only {
        println!("Run dependencies ({}):", sets.run.len());
        for dep in &sets.run {
            match &dep.constraint {
                Some(constraint) => println!("  {} {}", dep.name, constraint),
                None => println!("  {}", dep.name),
            }
        }
    }
}

/// Run verification and report the outcome per check
fn run_verify(recipe: &RenderedRecipe, staged_path: &Path, json: bool) -> Result<()> {
    let staged = StagedEnvironment::open(staged_path)?;
    let report = verify(recipe, &staged)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Verification passed: {} ({} checks)", report.recipe, report.results.len());
    for result in &report.results {
        println!(
            "  {} -> {}",
            result.command,
            result.version.as_deref().unwrap_or("(no output)")
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            recipe,
            metadata,
            out,
        }) => {
            info!("Rendering recipe: {}", recipe.display());

            let source = RecipeSource::load(&recipe)?;
            let meta = ProjectMetadata::load(&metadata)?;
            let rendered = render(&source, &meta)?;
            rendered.save(&out)?;

            println!("Rendered recipe: {} version {}", rendered.name, rendered.version);
            println!("  Build number: {}", rendered.build_number);
            println!("  Noarch: {}", rendered.noarch);
            println!("  Digest: sha256:{}", rendered.digest()?);

            Ok(())
        }
        Some(Commands::Deps {
            recipe,
            host_only,
            run_only,
            json,
        }) => {
            let rendered = RenderedRecipe::load(&recipe)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rendered.dependency_sets())?);
            } else {
                print_deps(&rendered, host_only, run_only);
            }
            Ok(())
        }
        Some(Commands::Verify {
            recipe,
            staged,
            json,
        }) => {
            info!("Verifying recipe: {}", recipe.display());

            let rendered = RenderedRecipe::load(&recipe)?;
            run_verify(&rendered, &staged, json)
        }
        Some(Commands::Check {
            recipe,
            metadata,
            staged,
            json,
        }) => {
            info!("Checking recipe: {}", recipe.display());

            let source = RecipeSource::load(&recipe)?;
            let meta = ProjectMetadata::load(&metadata)?;
            let rendered = render(&source, &meta)?;

            if !json {
                println!(
                    "Rendered recipe: {} version {} (digest sha256:{})",
                    rendered.name,
                    rendered.version,
                    rendered.digest()?
                );
            }

            run_verify(&rendered, &staged, json)
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Galley Recipe Tool v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'galley --help' for usage information");
            Ok(())
        }
    }
}
