use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use radix_router::config::{build_router, load_config, ConfigError};
use radix_router::http::Action;
use radix_router::routing::{Lookup, Router};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect and exercise radix-router route tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config and build its route table
    Check { config: PathBuf },
    /// List every registered route as METHOD PATTERN
    Routes { config: PathBuf },
    /// Print the node layout of each method's tree
    Tree {
        config: PathBuf,
        /// Only this method's tree
        #[arg(short, long)]
        method: Option<String>,
    },
    /// Resolve one request and print the outcome as JSON
    Match {
        config: PathBuf,
        method: String,
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Check { config } => {
            let router = load(&config)?;
            println!(
                "ok: {} routes across {} methods",
                router.route_count(),
                router.methods().count()
            );
        }
        Commands::Routes { config } => {
            let router = load(&config)?;
            for method in router.methods() {
                if let Some(tree) = router.tree(method) {
                    for pattern in tree.routes() {
                        println!("{method:<8} {pattern}");
                    }
                }
            }
        }
        Commands::Tree { config, method } => {
            let router = load(&config)?;
            let methods: Vec<&str> = match method.as_deref() {
                Some(m) => vec![m],
                None => router.methods().collect(),
            };
            for method in methods {
                match router.tree(method) {
                    Some(tree) => {
                        println!("== {method} ({} routes, {} nodes)", tree.len(), tree.node_count());
                        print!("{}", tree.dump());
                    }
                    None => println!("== {method} (no routes)"),
                }
            }
        }
        Commands::Match { config, method, path } => {
            let router = load(&config)?;
            let outcome = describe(&router, &method, &path);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Router<Action>, ConfigError> {
    let config = load_config(path)?;
    build_router(&config)
}

fn describe(router: &Router<Action>, method: &str, path: &str) -> Value {
    match router.find(method, path) {
        Lookup::Found(m) => json!({
            "status": "found",
            "pattern": m.pattern,
            "params": m.params,
            "handlers": m.handlers,
        }),
        Lookup::NotFound => json!({ "status": "not_found", "code": 404 }),
        Lookup::MethodNotAllowed => json!({ "status": "method_not_allowed", "code": 405 }),
    }
}
