//! Registry loading from a file on disk or the bundled document
//!
//! The loader parses the backing document into an untyped value, runs the
//! fail-fast schema walk over it, then converts it into a typed [`Registry`].
//! The result is cached per loader instance until [`RegistryLoader::clear_cache`].

use super::schema::{self, FirstViolation};
use super::types::{ComponentMetadata, Registry, RegistryComponent, UtilEntry};
use crate::error::{RegistryError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// Environment variable overriding the registry location
pub const REGISTRY_ENV: &str = "UIKIT_REGISTRY";

/// Registry shipped with the binary
const BUNDLED_REGISTRY: &str = include_str!("../../registry/registry.json");

/// Syntax of a registry document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension; anything that is not YAML is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Registry source - either a file on disk or the bundled document
#[derive(Debug, Clone)]
pub enum RegistrySource {
    File(PathBuf),
    Bundled,
}

impl RegistrySource {
    /// Use the file named by `UIKIT_REGISTRY` if set, otherwise the bundled registry
    pub fn from_env() -> Self {
        match std::env::var_os(REGISTRY_ENV) {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Bundled,
        }
    }

    /// Create a file source from a path
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Human-readable name for messages
    pub fn describe(&self) -> String {
        match self {
            RegistrySource::File(path) => path.display().to_string(),
            RegistrySource::Bundled => "bundled registry".to_string(),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        match self {
            RegistrySource::File(path) => DocumentFormat::from_path(path),
            RegistrySource::Bundled => DocumentFormat::Json,
        }
    }

    /// Read the raw document text
    pub async fn read(&self) -> Result<String> {
        match self {
            RegistrySource::File(path) => match fs::read_to_string(path).await {
                Ok(content) => Ok(content),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(RegistryError::NotFound { path: path.clone() })
                }
                Err(source) => Err(RegistryError::Io {
                    path: path.clone(),
                    source,
                }),
            },
            RegistrySource::Bundled => Ok(BUNDLED_REGISTRY.to_string()),
        }
    }
}

/// Parse a registry document into an untyped value without validating it
pub fn parse_document(content: &str, format: DocumentFormat, source_name: &str) -> Result<Value> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str::<Value>(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| RegistryError::InvalidFormat {
        source_name: source_name.to_string(),
        message,
    })
}

/// Validate a parsed document and convert it into a [`Registry`]. Fails on the first violation.
pub fn registry_from_value(document: Value) -> Result<Registry> {
    let mut first = FirstViolation::default();
    let _ = schema::walk_registry(&document, &mut first);
    if let Some(violation) = first.0 {
        return Err(RegistryError::invalid_project(violation.to_string()));
    }

    serde_json::from_value(document).map_err(|e| RegistryError::invalid_project(e.to_string()))
}

/// Registry loader - reads, validates and caches the registry from one source
pub struct RegistryLoader {
    source: RegistrySource,
    cache: Mutex<Option<Arc<Registry>>>,
}

impl RegistryLoader {
    pub fn new(source: RegistrySource) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Loader over the registry shipped with the binary
    pub fn bundled() -> Self {
        Self::new(RegistrySource::Bundled)
    }

    /// Loader over the source selected by `UIKIT_REGISTRY`
    pub fn from_env() -> Self {
        Self::new(RegistrySource::from_env())
    }

    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// Load the registry, reading the source only when nothing is cached
    pub async fn load_registry(&self) -> Result<Arc<Registry>> {
        // Held across the read so concurrent first loads share one read
        let mut cache = self.cache.lock().await;
        if let Some(registry) = cache.as_ref() {
            tracing::debug!(source = %self.source.describe(), "registry cache hit");
            return Ok(Arc::clone(registry));
        }

        tracing::debug!(source = %self.source.describe(), "reading registry");
        let content = self.source.read().await?;
        let document = parse_document(&content, self.source.format(), &self.source.describe())?;
        let registry = Arc::new(registry_from_value(document)?);
        tracing::debug!(
            components = registry.components.len(),
            utils = registry.utils.len(),
            "registry loaded"
        );

        *cache = Some(Arc::clone(&registry));
        Ok(registry)
    }

    /// Look up a component by its registry key
    pub async fn get_component(&self, name: &str) -> Result<Option<RegistryComponent>> {
        let registry = self.load_registry().await?;
        Ok(registry.components.get(name).cloned())
    }

    /// All component keys in document order
    pub async fn get_component_names(&self) -> Result<Vec<String>> {
        let registry = self.load_registry().await?;
        Ok(registry.components.keys().cloned().collect())
    }

    pub async fn get_component_metadata(&self, name: &str) -> Result<Option<ComponentMetadata>> {
        let registry = self.load_registry().await?;
        Ok(registry.components.get(name).map(|c| c.metadata.clone()))
    }

    pub async fn get_all_components(&self) -> Result<IndexMap<String, RegistryComponent>> {
        let registry = self.load_registry().await?;
        Ok(registry.components.clone())
    }

    pub async fn get_utils(&self) -> Result<IndexMap<String, UtilEntry>> {
        let registry = self.load_registry().await?;
        Ok(registry.utils.clone())
    }

    /// Drop the cached registry; the next access re-reads and re-validates the source
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.lock().await;
        if cache.take().is_some() {
            tracing::debug!(source = %self.source.describe(), "registry cache cleared");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn valid_document() -> Value {
        json!({
            "components": {
                "button": {
                    "metadata": {
                        "name": "Button",
                        "description": "A clickable button",
                        "dependencies": [],
                        "files": [],
                        "npmDependencies": ["clsx"]
                    },
                    "component": {
                        "path": "components/ui/button.tsx",
                        "content": "export function Button() {}"
                    }
                }
            },
            "utils": {
                "cn": {
                    "path": "lib/utils.ts",
                    "content": "export function cn() {}",
                    "description": "Class name merger"
                }
            }
        })
    }

    fn write_registry(dir: &TempDir, document: &Value) -> PathBuf {
        let path = dir.path().join("registry.json");
        std::fs::write(&path, document.to_string()).unwrap();
        path
    }

    async fn load_error(document: Value) -> RegistryError {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &document);
        RegistryLoader::new(RegistrySource::file(path))
            .load_registry()
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_load_valid_registry() {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &valid_document());
        let loader = RegistryLoader::new(RegistrySource::file(path));

        let registry = loader.load_registry().await.unwrap();
        assert_eq!(registry.components.len(), 1);
        assert_eq!(registry.utils["cn"].path, "lib/utils.ts");
        assert_eq!(loader.get_component_names().await.unwrap(), vec!["button"]);
        assert!(loader.get_component("missing").await.unwrap().is_none());
        assert_eq!(
            loader
                .get_component_metadata("button")
                .await
                .unwrap()
                .unwrap()
                .name,
            "Button"
        );
    }

    #[tokio::test]
    async fn test_second_load_uses_cache() {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &valid_document());
        let loader = RegistryLoader::new(RegistrySource::file(path.clone()));

        let first = loader.load_registry().await.unwrap();
        // A re-read would now fail to parse
        std::fs::write(&path, "not json").unwrap();
        let second = loader.load_registry().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_share_one_read() {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &valid_document());
        let loader = RegistryLoader::new(RegistrySource::file(path));

        let (first, second) = tokio::join!(loader.load_registry(), loader.load_registry());
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    }

    #[tokio::test]
    async fn test_clear_cache_rereads_source() {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &valid_document());
        let loader = RegistryLoader::new(RegistrySource::file(path.clone()));
        loader.load_registry().await.unwrap();

        let mut changed = valid_document();
        changed["components"]["button"]["metadata"]["description"] = json!("Changed");
        std::fs::write(&path, changed.to_string()).unwrap();

        let cached = loader.get_component_metadata("button").await.unwrap().unwrap();
        assert_eq!(cached.description, "A clickable button");

        loader.clear_cache().await;
        let reloaded = loader.get_component_metadata("button").await.unwrap().unwrap();
        assert_eq!(reloaded.description, "Changed");
    }

    #[tokio::test]
    async fn test_loaders_do_not_share_cache() {
        let dir = TempDir::new().unwrap();
        let path = write_registry(&dir, &valid_document());
        let a = RegistryLoader::new(RegistrySource::file(path.clone()));
        let b = RegistryLoader::new(RegistrySource::file(path.clone()));

        a.load_registry().await.unwrap();
        std::fs::write(&path, "{").unwrap();

        assert!(a.load_registry().await.is_ok());
        assert!(matches!(
            b.load_registry().await,
            Err(RegistryError::InvalidFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = RegistryLoader::new(RegistrySource::file(dir.path().join("nope.json")));
        assert!(matches!(
            loader.load_registry().await,
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unparseable_file_is_invalid_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.json");
        std::fs::write(&path, "{ \"components\": ").unwrap();
        let loader = RegistryLoader::new(RegistrySource::file(path));
        assert!(matches!(
            loader.load_registry().await,
            Err(RegistryError::InvalidFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_yaml_registry_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.yaml");
        let yaml = serde_yaml::to_string(&valid_document()).unwrap();
        std::fs::write(&path, yaml).unwrap();

        let loader = RegistryLoader::new(RegistrySource::file(path));
        let registry = loader.load_registry().await.unwrap();
        assert!(registry.components.contains_key("button"));
    }

    #[tokio::test]
    async fn test_missing_top_level_maps_rejected() {
        let mut document = valid_document();
        document.as_object_mut().unwrap().remove("components");
        let err = load_error(document).await;
        assert!(err.is_invalid_project());
        assert!(err.to_string().contains("components is required"));

        let mut document = valid_document();
        document.as_object_mut().unwrap().remove("utils");
        assert!(load_error(document).await.is_invalid_project());
    }

    #[tokio::test]
    async fn test_component_without_metadata_rejected() {
        let mut document = valid_document();
        document["components"]["button"]
            .as_object_mut()
            .unwrap()
            .remove("metadata");
        let err = load_error(document).await;
        assert!(err.is_invalid_project());
        assert!(err
            .to_string()
            .contains("components.button.metadata is required"));
    }

    #[tokio::test]
    async fn test_file_with_unknown_type_rejected() {
        let mut document = valid_document();
        document["components"]["button"]["metadata"]["files"] = json!([
            {"path": "hooks/use-x.ts", "content": "", "type": "hook"}
        ]);
        let err = load_error(document).await;
        assert!(err.is_invalid_project());
        assert!(err
            .to_string()
            .contains("components.button.metadata.files[0].type"));
    }

    #[tokio::test]
    async fn test_util_without_description_rejected() {
        let mut document = valid_document();
        document["utils"]["cn"]
            .as_object_mut()
            .unwrap()
            .remove("description");
        let err = load_error(document).await;
        assert!(err.is_invalid_project());
        assert!(err.to_string().contains("utils.cn.description is required"));
    }

    #[tokio::test]
    async fn test_empty_primary_content_rejected() {
        let mut document = valid_document();
        document["components"]["button"]["component"]["content"] = json!("");
        assert!(load_error(document).await.is_invalid_project());
    }

    #[tokio::test]
    async fn test_bundled_registry_loads() {
        let loader = RegistryLoader::bundled();
        let registry = loader.load_registry().await.unwrap();
        assert!(!registry.components.is_empty());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("r.YML")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("r.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("registry")),
            DocumentFormat::Json
        );
    }
}
