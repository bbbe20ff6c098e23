//! Charm-style CLI prompts using cliclack

use crate::install::{self, InstallOptions, InstallReport, PackageManager};
use crate::registry::{ComponentResolver, Resolution};
use anyhow::Result;
use std::path::Path;

/// CLI arguments for the add command
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    /// Component names to add; prompts for a selection when empty
    pub components: Vec<String>,

    pub options: InstallOptions,
}

/// Add components to a project with interactive prompts
pub async fn run(resolver: &ComponentResolver, args: AddArgs) -> Result<()> {
    cliclack::intro("uikit add")?;

    // Step 1: Pick components
    let names = select_components(resolver, &args).await?;

    // Step 2: Resolve dependencies, files and packages
    let resolution = resolve(resolver, &names).await?;
    report_graph_problems(resolver, &resolution).await?;

    // Step 3: Decide how to treat files that already exist
    let target_dir = args.options.target_dir()?;
    let overwrite = confirm_overwrite(&target_dir, &resolution, &args.options).await?;

    // Step 4: Write files
    let report = write_files(&target_dir, &resolution, overwrite).await?;

    // Step 5: Install npm packages
    install_packages(&target_dir, &resolution, &args.options).await?;

    print_summary(&resolution, &report)?;

    Ok(())
}

async fn select_components(resolver: &ComponentResolver, args: &AddArgs) -> Result<Vec<String>> {
    if !args.components.is_empty() {
        return Ok(args.components.clone());
    }

    if args.options.yes {
        anyhow::bail!("No components specified. Pass component names when using --yes.");
    }

    let components = resolver.loader().get_all_components().await?;
    if components.is_empty() {
        anyhow::bail!("The registry has no components.");
    }

    let mut multi = cliclack::multiselect("Which components would you like to add?");
    for (name, component) in &components {
        multi = multi.item(name.clone(), name, &component.metadata.description);
    }

    let selected: Vec<String> = multi.required(true).interact()?;
    Ok(selected)
}

async fn resolve(resolver: &ComponentResolver, names: &[String]) -> Result<Resolution> {
    let spinner = cliclack::spinner();
    spinner.start("Resolving dependencies...");

    let resolution = resolver.resolve(names).await?;

    if !resolution.unknown.is_empty() {
        spinner.stop("Failed to resolve components");
        let available = resolver.loader().get_component_names().await?.join(", ");
        anyhow::bail!(
            "Component(s) not found: {}. Available components: {}",
            resolution.unknown.join(", "),
            available
        );
    }

    spinner.stop(format!(
        "Resolved {} component(s), {} file(s)",
        resolution.requested.len() + resolution.dependencies.len(),
        resolution.files.len()
    ));

    if !resolution.dependencies.is_empty() {
        cliclack::log::info(format!(
            "Also adding dependencies: {}",
            resolution.dependencies.join(", ")
        ))?;
    }

    Ok(resolution)
}

/// Cycles and dangling references are not fatal; surface them as warnings
async fn report_graph_problems(resolver: &ComponentResolver, resolution: &Resolution) -> Result<()> {
    for name in resolution.requested.iter().chain(&resolution.dependencies) {
        let validation = resolver.validate_component_dependencies(name).await?;
        if !validation.valid {
            cliclack::log::warning(format!(
                "{} depends on missing component(s): {}",
                name,
                validation.missing.join(", ")
            ))?;
        }
    }

    for name in &resolution.requested {
        if resolver.has_circular_dependencies(name).await? {
            cliclack::log::warning(format!("{} has a circular dependency chain", name))?;
        }
    }

    Ok(())
}

async fn confirm_overwrite(
    target_dir: &Path,
    resolution: &Resolution,
    options: &InstallOptions,
) -> Result<bool> {
    if options.overwrite {
        return Ok(true);
    }

    let existing = install::existing_files(target_dir, &resolution.files).await?;
    if existing.is_empty() {
        return Ok(false);
    }

    cliclack::log::warning(format!(
        "{} file(s) already exist:\n{}",
        existing.len(),
        existing.join("\n")
    ))?;

    // Keep existing files in non-interactive mode
    if options.yes {
        cliclack::log::info("Keeping existing files (pass --overwrite to replace them)")?;
        return Ok(false);
    }

    let overwrite: bool = cliclack::confirm("Overwrite existing files?")
        .initial_value(false)
        .interact()?;
    Ok(overwrite)
}

async fn write_files(
    target_dir: &Path,
    resolution: &Resolution,
    overwrite: bool,
) -> Result<InstallReport> {
    let spinner = cliclack::spinner();
    spinner.start("Writing files...");

    let report = match install::install_files(target_dir, &resolution.files, overwrite).await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop("Failed to write files");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Wrote {} file(s) to {}",
        report.written.len(),
        target_dir.display()
    ));

    if !report.skipped.is_empty() {
        cliclack::log::warning(format!("Skipped {} existing file(s)", report.skipped.len()))?;
    }

    Ok(report)
}

async fn install_packages(
    target_dir: &Path,
    resolution: &Resolution,
    options: &InstallOptions,
) -> Result<()> {
    if resolution.npm_dependencies.is_empty() {
        return Ok(());
    }

    let package_manager = options
        .package_manager
        .unwrap_or_else(|| PackageManager::detect(target_dir));
    let cmd = package_manager.install_command(&resolution.npm_dependencies);

    if options.skip_install {
        cliclack::log::info(format!("Skipped package install. Run it yourself:\n{}", cmd))?;
        return Ok(());
    }

    if !package_manager.is_available() {
        cliclack::log::warning(format!(
            "{} was not found in PATH. Install the packages manually:\n{}",
            package_manager, cmd
        ))?;
        return Ok(());
    }

    match package_manager
        .install(target_dir, &resolution.npm_dependencies)
        .await
    {
        Ok(()) => {
            cliclack::log::success(format!(
                "Installed {} package(s) with {}",
                resolution.npm_dependencies.len(),
                package_manager
            ))?;
            Ok(())
        }
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Component files were written, but package installation failed.");
        }
    }
}

fn print_summary(resolution: &Resolution, report: &InstallReport) -> Result<()> {
    println!();
    println!("  Added components");
    println!();

    for name in resolution.requested.iter().chain(&resolution.dependencies) {
        println!("  -  {}", name);
    }

    if !report.written.is_empty() {
        println!();
        for path in &report.written {
            println!("     {}", path);
        }
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}
