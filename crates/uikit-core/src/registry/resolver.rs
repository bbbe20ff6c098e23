//! Dependency resolution over a loaded registry
//!
//! Every operation loads (or reuses) the cached registry from its
//! [`RegistryLoader`] and derives new collections from it. Missing or cyclic
//! references are reported as data; the only errors returned are the
//! loader's own.

use super::graph::DependencyGraph;
use super::loader::RegistryLoader;
use super::types::{ComponentFile, RegistryComponent};
use crate::error::Result;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;

/// A component matched by [`ComponentResolver::search_components`]
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub name: String,
    pub component: RegistryComponent,
}

/// Outcome of checking a component's direct dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyValidation {
    pub valid: bool,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_components: usize,
    pub total_utils: usize,
    pub components_with_dependencies: usize,
    /// Mean direct-dependency count, rounded to two decimals
    pub average_dependencies: f64,
}

/// A component and how many components depend on it directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popularity {
    pub name: String,
    pub dependents: usize,
}

/// Everything needed to install a set of requested components
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Requested names that exist in the registry, in request order
    pub requested: Vec<String>,
    /// Requested names that do not exist
    pub unknown: Vec<String>,
    /// Transitive dependencies not themselves requested, in discovery order
    pub dependencies: Vec<String>,
    /// Files to write, deduplicated by path (first occurrence wins)
    pub files: Vec<ComponentFile>,
    pub npm_dependencies: Vec<String>,
}

/// Append files whose path has not been seen yet
fn push_unique_files(
    files: &mut Vec<ComponentFile>,
    seen: &mut HashSet<String>,
    component: &RegistryComponent,
) {
    for file in component.install_files() {
        if seen.insert(file.path.clone()) {
            files.push(file);
        }
    }
}

/// Dependency resolver backed by a [`RegistryLoader`]
pub struct ComponentResolver {
    loader: RegistryLoader,
}

impl ComponentResolver {
    pub fn new(loader: RegistryLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &RegistryLoader {
        &self.loader
    }

    /// Case-insensitive substring match against the key or the description.
    /// An empty query matches every component.
    pub async fn search_components(&self, query: &str) -> Result<Vec<SearchResult>> {
        let registry = self.loader.load_registry().await?;
        let needle = query.to_lowercase();

        Ok(registry
            .components
            .iter()
            .filter(|(name, component)| {
                name.to_lowercase().contains(&needle)
                    || component
                        .metadata
                        .description
                        .to_lowercase()
                        .contains(&needle)
            })
            .map(|(name, component)| SearchResult {
                name: name.clone(),
                component: component.clone(),
            })
            .collect())
    }

    /// Components that list `name` as a direct dependency
    pub async fn get_component_dependents(&self, name: &str) -> Result<Vec<String>> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);
        Ok(graph.dependents(name).into_iter().map(String::from).collect())
    }

    /// Transitive dependencies of `name`, excluding `name` itself.
    /// Empty when `name` is not in the registry.
    pub async fn get_component_dependencies(&self, name: &str) -> Result<Vec<String>> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);
        Ok(graph
            .transitive_dependencies(name)
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Union of npm packages for `name` and its transitive dependencies
    pub async fn get_all_npm_dependencies(&self, name: &str) -> Result<Vec<String>> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);

        let mut packages = IndexSet::new();
        let nodes = std::iter::once(name).chain(graph.transitive_dependencies(name));
        for node in nodes {
            if let Some(component) = registry.components.get(node) {
                packages.extend(component.metadata.npm_dependencies.iter().cloned());
            }
        }
        Ok(packages.into_iter().collect())
    }

    /// Files for `name` and its transitive dependencies, deduplicated by path
    pub async fn get_all_component_files(&self, name: &str) -> Result<Vec<ComponentFile>> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);

        let mut files = Vec::new();
        let mut seen = HashSet::new();
        let nodes = std::iter::once(name).chain(graph.transitive_dependencies(name));
        for node in nodes {
            if let Some(component) = registry.components.get(node) {
                push_unique_files(&mut files, &mut seen, component);
            }
        }
        Ok(files)
    }

    /// Check the direct dependencies of `name` against the registry.
    /// Transitive dependencies are not checked.
    pub async fn validate_component_dependencies(&self, name: &str) -> Result<DependencyValidation> {
        let registry = self.loader.load_registry().await?;
        let Some(component) = registry.components.get(name) else {
            return Ok(DependencyValidation {
                valid: false,
                missing: vec![name.to_string()],
            });
        };

        let missing: Vec<String> = component
            .metadata
            .dependencies
            .iter()
            .filter(|dep| !registry.components.contains_key(dep.as_str()))
            .cloned()
            .collect();

        Ok(DependencyValidation {
            valid: missing.is_empty(),
            missing,
        })
    }

    pub async fn get_registry_stats(&self) -> Result<RegistryStats> {
        let registry = self.loader.load_registry().await?;
        let total_components = registry.components.len();
        let total_dependencies: usize = registry
            .components
            .values()
            .map(|c| c.metadata.dependencies.len())
            .sum();
        let components_with_dependencies = registry
            .components
            .values()
            .filter(|c| !c.metadata.dependencies.is_empty())
            .count();

        let average_dependencies = if total_components == 0 {
            0.0
        } else {
            let average = total_dependencies as f64 / total_components as f64;
            (average * 100.0).round() / 100.0
        };

        Ok(RegistryStats {
            total_components,
            total_utils: registry.utils.len(),
            components_with_dependencies,
            average_dependencies,
        })
    }

    /// Components ranked by direct-dependent count, most depended-on first.
    /// Ties keep registry order.
    pub async fn get_components_by_popularity(&self) -> Result<Vec<Popularity>> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);

        let mut ranked: Vec<Popularity> = registry
            .components
            .keys()
            .map(|name| Popularity {
                name: name.clone(),
                dependents: graph.dependents(name).len(),
            })
            .collect();
        ranked.sort_by(|a, b| b.dependents.cmp(&a.dependents));
        Ok(ranked)
    }

    pub async fn has_circular_dependencies(&self, name: &str) -> Result<bool> {
        let registry = self.loader.load_registry().await?;
        Ok(DependencyGraph::new(&registry).has_cycle_from(name))
    }

    /// Resolve several requested components at once for installation
    pub async fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Resolution> {
        let registry = self.loader.load_registry().await?;
        let graph = DependencyGraph::new(&registry);

        let mut resolution = Resolution::default();
        let mut requested = IndexSet::new();
        for name in names.iter().map(AsRef::as_ref) {
            if graph.contains(name) {
                requested.insert(name);
            } else if !resolution.unknown.iter().any(|u| u == name) {
                resolution.unknown.push(name.to_string());
            }
        }

        let mut dependencies = IndexSet::new();
        for name in &requested {
            for dep in graph.transitive_dependencies(name) {
                if !requested.contains(dep) {
                    dependencies.insert(dep);
                }
            }
        }

        let mut seen = HashSet::new();
        let mut packages = IndexSet::new();
        for node in requested.iter().chain(dependencies.iter()) {
            if let Some(component) = registry.components.get(*node) {
                push_unique_files(&mut resolution.files, &mut seen, component);
                packages.extend(component.metadata.npm_dependencies.iter().cloned());
            }
        }

        resolution.requested = requested.into_iter().map(String::from).collect();
        resolution.dependencies = dependencies.into_iter().map(String::from).collect();
        resolution.npm_dependencies = packages.into_iter().collect();
        Ok(resolution)
    }

    /// Invalidate the loader's cached registry
    pub async fn clear_cache(&self) {
        self.loader.clear_cache().await;
    }
}

impl From<RegistryLoader> for ComponentResolver {
    fn from(loader: RegistryLoader) -> Self {
        Self::new(loader)
    }
}
