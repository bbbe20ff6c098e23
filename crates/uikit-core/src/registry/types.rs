//! Registry document types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of source a component file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Component,
    Utility,
    Type,
}

impl FileType {
    /// Literal values accepted in the registry document
    pub const ALLOWED: &'static [&'static str] = &["component", "utility", "type"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Component => "component",
            FileType::Utility => "utility",
            FileType::Type => "type",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single installable file. Identity is `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFile {
    /// Install path relative to the project root
    pub path: String,

    /// Raw source text
    pub content: String,

    #[serde(rename = "type")]
    pub file_type: FileType,
}

/// Descriptive metadata and dependency declarations for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    /// Display name
    pub name: String,

    pub description: String,

    /// Names of other registry components this one needs, in declaration order
    pub dependencies: Vec<String>,

    /// Additional files shipped with the component
    pub files: Vec<ComponentFile>,

    /// External package names imported by the component source
    pub npm_dependencies: Vec<String>,
}

/// The primary source file of a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryFile {
    pub path: String,
    pub content: String,
}

/// A registry entry, keyed by its canonical name in [`Registry::components`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryComponent {
    pub metadata: ComponentMetadata,

    pub component: PrimaryFile,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub utils: Vec<ComponentFile>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<ComponentFile>,

    /// Free-text usage snippets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl RegistryComponent {
    /// The primary file as an installable [`ComponentFile`]
    pub fn primary_file(&self) -> ComponentFile {
        ComponentFile {
            path: self.component.path.clone(),
            content: self.component.content.clone(),
            file_type: FileType::Component,
        }
    }

    /// Every file this component installs, in install order:
    /// primary file, then utils, then types, then metadata files.
    /// Paths are not deduplicated here.
    pub fn install_files(&self) -> Vec<ComponentFile> {
        let mut files = Vec::with_capacity(
            1 + self.utils.len() + self.types.len() + self.metadata.files.len(),
        );
        files.push(self.primary_file());
        files.extend(self.utils.iter().cloned());
        files.extend(self.types.iter().cloned());
        files.extend(self.metadata.files.iter().cloned());
        files
    }
}

/// Registry-wide helper snippet; not part of dependency resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilEntry {
    pub path: String,
    pub content: String,
    pub description: String,
}

/// The whole registry document. Maps keep the document's insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub components: IndexMap<String, RegistryComponent>,
    pub utils: IndexMap<String, UtilEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, file_type: FileType) -> ComponentFile {
        ComponentFile {
            path: path.to_string(),
            content: String::new(),
            file_type,
        }
    }

    #[test]
    fn test_file_type_parses_lowercase_literals() {
        let parsed: Vec<FileType> =
            serde_json::from_str(r#"["component", "utility", "type"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![FileType::Component, FileType::Utility, FileType::Type]
        );
        assert!(serde_json::from_str::<FileType>(r#""hook""#).is_err());
    }

    #[test]
    fn test_metadata_uses_camel_case_keys() {
        let metadata: ComponentMetadata = serde_json::from_str(
            r#"{
                "name": "Button",
                "description": "A button",
                "dependencies": [],
                "files": [],
                "npmDependencies": ["clsx"]
            }"#,
        )
        .unwrap();
        assert_eq!(metadata.npm_dependencies, vec!["clsx"]);
    }

    #[test]
    fn test_install_files_order() {
        let component = RegistryComponent {
            metadata: ComponentMetadata {
                name: "Dialog".to_string(),
                description: "A dialog".to_string(),
                dependencies: vec!["button".to_string()],
                files: vec![file("components/ui/dialog.css", FileType::Component)],
                npm_dependencies: vec![],
            },
            component: PrimaryFile {
                path: "components/ui/dialog.tsx".to_string(),
                content: "export {}".to_string(),
            },
            utils: vec![file("lib/utils.ts", FileType::Utility)],
            types: vec![file("types/dialog.ts", FileType::Type)],
            examples: vec![],
        };

        let paths: Vec<_> = component
            .install_files()
            .into_iter()
            .map(|f| f.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "components/ui/dialog.tsx",
                "lib/utils.ts",
                "types/dialog.ts",
                "components/ui/dialog.css",
            ]
        );
    }
}
