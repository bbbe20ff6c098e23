//! Read-only registry commands: listing, search, inspection and linting

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use uikit_core::registry::{
    lint_registry, parse_document, LintReport, Popularity, RegistrySource, RegistryStats,
};
use uikit_core::ComponentResolver;

/// Width of the name column in listings
const NAME_WIDTH: usize = 16;

fn print_component_line(name: &str, description: &str) {
    println!("  {:<width$} {}", name.green(), description.dimmed(), width = NAME_WIDTH);
}

pub async fn list(resolver: &ComponentResolver) -> Result<()> {
    let components = resolver.loader().get_all_components().await?;

    println!(
        "{}",
        format!("{} component(s) available", components.len())
            .cyan()
            .bold()
    );
    println!();
    for (name, component) in &components {
        print_component_line(name, &component.metadata.description);
    }
    Ok(())
}

pub async fn search(resolver: &ComponentResolver, query: &str) -> Result<()> {
    let results = resolver.search_components(query).await?;

    if results.is_empty() {
        println!("{} No components match '{}'", "->".blue(), query);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} result(s) for '{}'", results.len(), query)
            .cyan()
            .bold()
    );
    println!();
    for result in &results {
        print_component_line(&result.name, &result.component.metadata.description);
    }
    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        println!("  {:<14} {}", label.bold(), "none".dimmed());
    } else {
        println!("  {:<14} {}", label.bold(), items.join(", "));
    }
}

pub async fn info(resolver: &ComponentResolver, name: &str) -> Result<()> {
    let Some(component) = resolver.loader().get_component(name).await? else {
        let available = resolver.loader().get_component_names().await?.join(", ");
        anyhow::bail!(
            "Component '{}' not found. Available components: {}",
            name,
            available
        );
    };

    let metadata = &component.metadata;
    println!("{} {}", metadata.name.cyan().bold(), format!("({})", name).dimmed());
    println!("  {}", metadata.description);
    println!();

    print_list("Depends on", &metadata.dependencies);
    print_list(
        "All deps",
        &resolver.get_component_dependencies(name).await?,
    );
    print_list("Used by", &resolver.get_component_dependents(name).await?);
    print_list("Packages", &resolver.get_all_npm_dependencies(name).await?);

    let files: Vec<String> = resolver
        .get_all_component_files(name)
        .await?
        .into_iter()
        .map(|f| format!("{} ({})", f.path, f.file_type))
        .collect();
    println!();
    println!("  {}", "Files".bold());
    for file in &files {
        println!("    {} {}", "->".blue(), file);
    }

    let validation = resolver.validate_component_dependencies(name).await?;
    if !validation.valid {
        println!();
        println!(
            "  {} missing component(s): {}",
            "Warning:".yellow(),
            validation.missing.join(", ")
        );
    }
    if resolver.has_circular_dependencies(name).await? {
        println!("  {} circular dependency chain detected", "Warning:".yellow());
    }

    if !component.examples.is_empty() {
        println!();
        println!("  {}", "Examples".bold());
        for example in &component.examples {
            for line in example.lines() {
                println!("    {}", line);
            }
            println!();
        }
    }

    Ok(())
}

pub async fn utils(resolver: &ComponentResolver) -> Result<()> {
    let utils = resolver.loader().get_utils().await?;

    println!("{}", format!("{} util(s)", utils.len()).cyan().bold());
    println!();
    for (name, util) in &utils {
        print_component_line(name, &util.description);
        println!("  {:<width$} {}", "", util.path, width = NAME_WIDTH);
    }
    Ok(())
}

/// Number of entries shown under "Most depended on"
const TOP_DEPENDED_ON: usize = 5;

/// `stats --json` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput<'a> {
    #[serde(flatten)]
    stats: &'a RegistryStats,
    most_depended_on: Vec<&'a Popularity>,
}

fn most_depended_on(popular: &[Popularity]) -> Vec<&Popularity> {
    popular
        .iter()
        .filter(|p| p.dependents > 0)
        .take(TOP_DEPENDED_ON)
        .collect()
}

pub async fn stats(resolver: &ComponentResolver, json: bool) -> Result<()> {
    let stats = resolver.get_registry_stats().await?;
    let popular = resolver.get_components_by_popularity().await?;
    let depended_on = most_depended_on(&popular);

    if json {
        let output = StatsOutput {
            stats: &stats,
            most_depended_on: depended_on,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Registry stats".cyan().bold());
    println!();
    println!("  {:<28} {}", "Components", stats.total_components);
    println!("  {:<28} {}", "Utils", stats.total_utils);
    println!(
        "  {:<28} {}",
        "Components with dependencies", stats.components_with_dependencies
    );
    println!(
        "  {:<28} {:.2}",
        "Average dependencies", stats.average_dependencies
    );

    if !depended_on.is_empty() {
        println!();
        println!("  {}", "Most depended on".bold());
        for entry in depended_on {
            println!("    {} {} ({})", "->".blue(), entry.name, entry.dependents);
        }
    }
    Ok(())
}

fn fail_on_errors(report: &LintReport) -> Result<()> {
    if !report.errors.is_empty() {
        anyhow::bail!(
            "Registry validation failed with {} error(s)",
            report.errors.len()
        );
    }
    Ok(())
}

/// Lint a registry document. Structural errors fail; npm findings only warn.
pub async fn validate(source: &RegistrySource, json: bool) -> Result<()> {
    let content = source
        .read()
        .await
        .with_context(|| format!("Failed to read {}", source.describe()))?;
    let document = parse_document(&content, source.format(), &source.describe())?;
    let report = lint_registry(&document);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return fail_on_errors(&report);
    }

    println!(
        "{}",
        format!("Validating {}...", source.describe()).cyan().bold()
    );
    println!();

    for error in &report.errors {
        eprintln!("  {} {}", "error:".red(), error);
    }
    for warning in &report.warnings {
        eprintln!("  {} {}", "warning:".yellow(), warning);
    }

    if !report.errors.is_empty() {
        println!();
    }
    fail_on_errors(&report)?;

    if report.is_clean() {
        println!("{} registry is valid", "Done:".green().bold());
    } else {
        println!();
        println!(
            "{} registry is valid with {} warning(s)",
            "Done:".green().bold(),
            report.warnings.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_json_shape() {
        let stats = RegistryStats {
            total_components: 3,
            total_utils: 1,
            components_with_dependencies: 2,
            average_dependencies: 0.67,
        };
        let popular = vec![
            Popularity {
                name: "button".to_string(),
                dependents: 2,
            },
            Popularity {
                name: "label".to_string(),
                dependents: 0,
            },
        ];
        let output = StatsOutput {
            stats: &stats,
            most_depended_on: most_depended_on(&popular),
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "totalComponents": 3,
                "totalUtils": 1,
                "componentsWithDependencies": 2,
                "averageDependencies": 0.67,
                "mostDependedOn": [{"name": "button", "dependents": 2}]
            })
        );
    }

    #[test]
    fn test_lint_errors_fail_validation() {
        let mut report = LintReport::default();
        report.warnings.push("Dialog: imports \"clsx\"".to_string());
        assert!(fail_on_errors(&report).is_ok());

        report.errors.push("utils is required".to_string());
        let err = fail_on_errors(&report).unwrap_err();
        assert_eq!(err.to_string(), "Registry validation failed with 1 error(s)");
    }
}
