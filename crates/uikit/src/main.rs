//! uikit CLI - add UI components and their dependencies to a project

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uikit_core::tui::AddArgs;
use uikit_core::{
    ComponentResolver, InstallOptions, PackageManager, RegistryLoader, RegistrySource,
};

#[derive(Parser, Debug)]
#[command(name = "uikit")]
#[command(about = "CLI for adding uikit components and their dependencies to a project")]
#[command(version)]
pub struct Args {
    /// Registry document to use instead of the bundled one (also: UIKIT_REGISTRY)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add components (and their dependencies) to your project
    Add(CliAddArgs),
    /// List all available components
    List,
    /// Search components by name or description
    Search {
        /// Case-insensitive text to look for
        query: String,
    },
    /// Show details, dependencies and files of a component
    Info {
        name: String,
    },
    /// List shared utility snippets
    Utils,
    /// Show registry statistics
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a registry document (for CI use)
    Validate {
        /// Registry file to validate (defaults to the active registry)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the lint report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug, Default)]
pub struct CliAddArgs {
    /// Component names to add
    pub components: Vec<String>,

    /// Project directory to install into
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Overwrite existing files
    #[arg(short, long)]
    pub overwrite: bool,

    /// Skip installing npm packages
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Package manager to use (npm, pnpm, yarn, bun); detected from lockfiles by default
    #[arg(long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliAddArgs> for AddArgs {
    fn from(args: CliAddArgs) -> Self {
        AddArgs {
            components: args.components,
            options: InstallOptions {
                cwd: args.cwd,
                overwrite: args.overwrite,
                skip_install: args.skip_install,
                yes: args.yes,
                package_manager: args.package_manager,
            },
        }
    }
}

/// `--registry` wins over UIKIT_REGISTRY, which wins over the bundled registry
fn registry_source(flag: Option<PathBuf>) -> RegistrySource {
    match flag {
        Some(path) => RegistrySource::file(path),
        None => RegistrySource::from_env(),
    }
}

async fn run_add(resolver: &ComponentResolver, args: AddArgs) -> Result<()> {
    let result = uikit_core::run(resolver, args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init(args.verbose)?;

    let source = registry_source(args.registry);
    tracing::debug!(source = %source.describe(), "using registry");
    let resolver = ComponentResolver::new(RegistryLoader::new(source.clone()));

    match args.command {
        Some(Command::Add(add_args)) => run_add(&resolver, add_args.into()).await,
        Some(Command::List) => commands::list(&resolver).await,
        Some(Command::Search { query }) => commands::search(&resolver, &query).await,
        Some(Command::Info { name }) => commands::info(&resolver, &name).await,
        Some(Command::Utils) => commands::utils(&resolver).await,
        Some(Command::Stats { json }) => commands::stats(&resolver, json).await,
        Some(Command::Validate { file, json }) => {
            let target = file.map(RegistrySource::file).unwrap_or(source);
            commands::validate(&target, json).await
        }
        None => {
            // No subcommand provided, default to add behavior (interactive mode)
            run_add(&resolver, AddArgs::default()).await
        }
    }
}
