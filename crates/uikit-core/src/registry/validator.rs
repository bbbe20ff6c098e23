//! Standalone registry validation for CI and publishing checks
//!
//! Unlike the loader, these functions never fail: they walk the whole
//! document and return every problem found as a readable string, each
//! prefixed with the component or file path it concerns.

use super::schema::{self, Violation, COMPONENT_FILE, COMPONENT_METADATA};
use super::types::{Registry, RegistryComponent};
use serde::Serialize;
use serde_json::Value;

/// Result of a structural validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl From<Vec<Violation>> for ValidationResult {
    fn from(violations: Vec<Violation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            errors: violations.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Validate a single component file. `context` names where the file lives.
pub fn validate_component_file(file: &Value, context: &str) -> ValidationResult {
    let mut violations: Vec<Violation> = Vec::new();
    let _ = schema::walk(file, &COMPONENT_FILE, context, &mut violations);
    violations.into()
}

pub fn validate_component_metadata(metadata: &Value, context: &str) -> ValidationResult {
    let mut violations: Vec<Violation> = Vec::new();
    let _ = schema::walk(metadata, &COMPONENT_METADATA, context, &mut violations);
    violations.into()
}

/// Validate one registry component, including metadata and primary file
pub fn validate_registry_component(name: &str, component: &Value) -> Vec<String> {
    let mut violations: Vec<Violation> = Vec::new();
    let _ = schema::walk_component(
        component,
        &schema::join("components", name),
        &mut violations,
    );
    violations.iter().map(ToString::to_string).collect()
}

/// Validate a whole registry document, reporting every structural error
pub fn validate_registry(document: &Value) -> ValidationResult {
    let mut violations: Vec<Violation> = Vec::new();
    let _ = schema::walk_registry(document, &mut violations);
    violations.into()
}

/// How an [`ImportRule`] decides whether a package is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageMatch {
    /// Exactly this package name must be declared
    Exact,
    /// Any package under this scope prefix satisfies the rule
    Scope,
}

/// A textual import marker and the package it implies
#[derive(Debug, Clone, Copy)]
pub struct ImportRule {
    pub specifier: &'static str,
    pub matching: PackageMatch,
}

impl ImportRule {
    const fn exact(specifier: &'static str) -> Self {
        Self {
            specifier,
            matching: PackageMatch::Exact,
        }
    }

    const fn scope(specifier: &'static str) -> Self {
        Self {
            specifier,
            matching: PackageMatch::Scope,
        }
    }

    /// Whether the source text imports this module. Matches only quoted
    /// specifiers (`'clsx'`, `"clsx/lite"`, `"@radix-ui/...`).
    fn appears_in(&self, content: &str) -> bool {
        ['"', '\''].iter().any(|quote| match self.matching {
            PackageMatch::Scope => content.contains(&format!("{}{}", quote, self.specifier)),
            PackageMatch::Exact => {
                content.contains(&format!("{q}{}{q}", self.specifier, q = quote))
                    || content.contains(&format!("{}{}/", quote, self.specifier))
            }
        })
    }

    fn is_declared(&self, packages: &[String]) -> bool {
        packages.iter().any(|p| match self.matching {
            PackageMatch::Exact => p == self.specifier,
            PackageMatch::Scope => p.starts_with(self.specifier),
        })
    }

    fn display(&self) -> String {
        match self.matching {
            PackageMatch::Exact => self.specifier.to_string(),
            PackageMatch::Scope => format!("{}*", self.specifier),
        }
    }
}

/// Known import markers checked against `npmDependencies`.
///
/// Heuristic only: imports written any other way (dynamic `import()`,
/// re-exports through local files, packages not listed here) go unnoticed.
pub const IMPORT_RULES: &[ImportRule] = &[
    ImportRule::scope("@radix-ui/"),
    ImportRule::scope("@hookform/"),
    ImportRule::exact("class-variance-authority"),
    ImportRule::exact("clsx"),
    ImportRule::exact("tailwind-merge"),
    ImportRule::exact("lucide-react"),
    ImportRule::exact("react-hook-form"),
    ImportRule::exact("zod"),
    ImportRule::exact("cmdk"),
    ImportRule::exact("date-fns"),
];

/// Warn about imports in the primary file that have no declared npm package
pub fn validate_npm_dependencies(component: &RegistryComponent) -> Vec<String> {
    let content = &component.component.content;
    let declared = &component.metadata.npm_dependencies;

    IMPORT_RULES
        .iter()
        .filter(|rule| rule.appears_in(content) && !rule.is_declared(declared))
        .map(|rule| {
            format!(
                "{}: imports \"{}\" but no matching package is listed in npmDependencies",
                component.metadata.name,
                rule.display()
            )
        })
        .collect()
}

/// Structural errors plus npm heuristic warnings for a whole document
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Run structural validation, then npm heuristics when the structure is sound.
/// Missing dependency references are reported as warnings.
pub fn lint_registry(document: &Value) -> LintReport {
    let structure = validate_registry(document);
    if !structure.is_valid {
        return LintReport {
            errors: structure.errors,
            warnings: Vec::new(),
        };
    }

    let registry: Registry = match serde_json::from_value(document.clone()) {
        Ok(registry) => registry,
        Err(e) => {
            return LintReport {
                errors: vec![format!("registry could not be read: {}", e)],
                warnings: Vec::new(),
            }
        }
    };

    let mut warnings = Vec::new();
    for (name, component) in &registry.components {
        for dep in &component.metadata.dependencies {
            if !registry.components.contains_key(dep) {
                warnings.push(format!(
                    "components.{}: depends on unknown component \"{}\"",
                    name, dep
                ));
            }
        }
        warnings.extend(validate_npm_dependencies(component));
    }

    LintReport {
        errors: Vec::new(),
        warnings,
    }
}
