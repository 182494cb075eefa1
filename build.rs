// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("galley")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Galley Contributors")
        .about("Recipe renderer and post-build smoke verifier")
        .subcommand_required(false)
        .subcommand(
            Command::new("render")
                .about("Render a recipe from project metadata")
                .arg(
                    Arg::new("recipe")
                        .short('r')
                        .long("recipe")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the recipe source JSON"),
                )
                .arg(
                    Arg::new("metadata")
                        .short('m')
                        .long("metadata")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the project metadata JSON"),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .value_name("PATH")
                        .required(true)
                        .help("Where to write the rendered descriptor"),
                ),
        )
        .subcommand(
            Command::new("deps")
                .about("List the declared dependency sets of a rendered recipe")
                .arg(
                    Arg::new("recipe")
                        .short('r')
                        .long("recipe")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the rendered descriptor JSON"),
                )
                .arg(
                    Arg::new("host_only")
                        .long("host-only")
                        .action(clap::ArgAction::SetTrue)
                        .help("Show only host (build-time) dependencies"),
                )
                .arg(
                    Arg::new("run_only")
                        .long("run-only")
                        .action(clap::ArgAction::SetTrue)
                        .help("Show only run (execution-time) dependencies"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Emit the dependency sets as JSON"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Run the smoke checks of a rendered recipe against a staged environment")
                .arg(
                    Arg::new("recipe")
                        .short('r')
                        .long("recipe")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the rendered descriptor JSON"),
                )
                .arg(
                    Arg::new("staged")
                        .short('s')
                        .long("staged")
                        .value_name("DIR")
                        .required(true)
                        .help("Staged environment root directory"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Emit the verification report as JSON"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Render and verify in one pass (the full build invocation)")
                .arg(
                    Arg::new("recipe")
                        .short('r')
                        .long("recipe")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the recipe source JSON"),
                )
                .arg(
                    Arg::new("metadata")
                        .short('m')
                        .long("metadata")
                        .value_name("PATH")
                        .required(true)
                        .help("Path to the project metadata JSON"),
                )
                .arg(
                    Arg::new("staged")
                        .short('s')
                        .long("staged")
                        .value_name("DIR")
                        .required(true)
                        .help("Staged environment root directory"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Emit the verification report as JSON"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("galley.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
