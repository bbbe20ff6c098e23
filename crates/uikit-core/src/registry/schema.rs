//! Declarative shape of the registry document
//!
//! The loader and the standalone validator both walk the same [`Shape`]
//! description over an untyped [`serde_json::Value`]. They differ only in
//! the [`ViolationSink`] they pass: the loader stops at the first violation,
//! the validator collects all of them.

use super::types::FileType;
use serde_json::Value;
use std::fmt;
use std::ops::ControlFlow;

/// Expected shape of a value in the document
#[derive(Debug)]
pub enum Shape {
    /// Anything is accepted
    Any,
    String,
    /// A string that is not blank
    NonEmptyString,
    /// A string drawn from a fixed set of literals
    Enum(&'static [&'static str]),
    Array(&'static Shape),
    /// An object with known fields; unknown fields are ignored
    Object(&'static [Field]),
    /// An object used as a mapping from arbitrary keys to values of one shape
    Map(&'static Shape),
}

/// A named field of an [`Shape::Object`]
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: false,
        }
    }
}

pub static COMPONENT_FILE: Shape = Shape::Object(&[
    Field::required("path", Shape::String),
    Field::required("content", Shape::String),
    Field::required("type", Shape::Enum(FileType::ALLOWED)),
]);

pub static COMPONENT_METADATA: Shape = Shape::Object(&[
    Field::required("name", Shape::NonEmptyString),
    Field::required("description", Shape::NonEmptyString),
    Field::required("dependencies", Shape::Array(&Shape::String)),
    Field::required("files", Shape::Array(&COMPONENT_FILE)),
    Field::required("npmDependencies", Shape::Array(&Shape::String)),
]);

pub static PRIMARY_FILE: Shape = Shape::Object(&[
    Field::required("path", Shape::NonEmptyString),
    Field::required("content", Shape::NonEmptyString),
]);

pub static REGISTRY_COMPONENT: Shape = Shape::Object(&[
    Field::required("metadata", Shape::Object(&[])),
    Field::required("component", Shape::Object(&[])),
    Field::optional("utils", Shape::Array(&COMPONENT_FILE)),
    Field::optional("types", Shape::Array(&COMPONENT_FILE)),
    Field::optional("examples", Shape::Array(&Shape::String)),
]);

pub static UTIL_ENTRY: Shape = Shape::Object(&[
    Field::required("path", Shape::String),
    Field::required("content", Shape::String),
    Field::required("description", Shape::String),
]);

pub static REGISTRY: Shape = Shape::Object(&[
    Field::required("components", Shape::Map(&Shape::Any)),
    Field::required("utils", Shape::Map(&UTIL_ENTRY)),
]);

/// A single structural problem, located by a dotted breadcrumb path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "registry {}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

/// Receives violations as the walk finds them
pub trait ViolationSink {
    /// Record a violation. Returning `Break` stops the walk.
    fn report(&mut self, violation: Violation) -> ControlFlow<()>;
}

/// Keeps the first violation and stops
#[derive(Debug, Default)]
pub struct FirstViolation(pub Option<Violation>);

impl ViolationSink for FirstViolation {
    fn report(&mut self, violation: Violation) -> ControlFlow<()> {
        self.0 = Some(violation);
        ControlFlow::Break(())
    }
}

impl ViolationSink for Vec<Violation> {
    fn report(&mut self, violation: Violation) -> ControlFlow<()> {
        self.push(violation);
        ControlFlow::Continue(())
    }
}

/// Append a field name to a breadcrumb path
pub fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_string(),
        message: message.into(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Walk `value` against `shape`, reporting every mismatch to `sink`
pub fn walk<S: ViolationSink>(
    value: &Value,
    shape: &Shape,
    path: &str,
    sink: &mut S,
) -> ControlFlow<()> {
    match shape {
        Shape::Any => ControlFlow::Continue(()),
        Shape::String => match value {
            Value::String(_) => ControlFlow::Continue(()),
            other => sink.report(violation(
                path,
                format!("must be a string (got {})", type_name(other)),
            )),
        },
        Shape::NonEmptyString => match value {
            Value::String(s) if !s.trim().is_empty() => ControlFlow::Continue(()),
            Value::String(_) => sink.report(violation(path, "must not be empty")),
            other => sink.report(violation(
                path,
                format!("must be a non-empty string (got {})", type_name(other)),
            )),
        },
        Shape::Enum(allowed) => match value {
            Value::String(s) if allowed.contains(&s.as_str()) => ControlFlow::Continue(()),
            Value::String(s) => sink.report(violation(
                path,
                format!("must be one of {} (got \"{}\")", allowed.join(", "), s),
            )),
            other => sink.report(violation(
                path,
                format!(
                    "must be one of {} (got {})",
                    allowed.join(", "),
                    type_name(other)
                ),
            )),
        },
        Shape::Array(item) => match value {
            Value::Array(items) => {
                for (i, element) in items.iter().enumerate() {
                    walk(element, item, &format!("{}[{}]", path, i), sink)?;
                }
                ControlFlow::Continue(())
            }
            other => sink.report(violation(
                path,
                format!("must be an array (got {})", type_name(other)),
            )),
        },
        Shape::Object(fields) => match value {
            Value::Object(map) => {
                for field in fields.iter() {
                    let field_path = join(path, field.name);
                    match map.get(field.name) {
                        Some(child) => walk(child, &field.shape, &field_path, sink)?,
                        None if field.required => {
                            sink.report(violation(&field_path, "is required"))?
                        }
                        None => {}
                    }
                }
                ControlFlow::Continue(())
            }
            other => sink.report(violation(
                path,
                format!("must be an object (got {})", type_name(other)),
            )),
        },
        Shape::Map(entry) => match value {
            Value::Object(map) => {
                for (key, child) in map {
                    walk(child, entry, &join(path, key), sink)?;
                }
                ControlFlow::Continue(())
            }
            other => sink.report(violation(
                path,
                format!("must be an object (got {})", type_name(other)),
            )),
        },
    }
}

/// Walk a single registry component, including its nested metadata and
/// primary file. `path` is the component's breadcrumb, e.g. `components.button`.
pub fn walk_component<S: ViolationSink>(
    value: &Value,
    path: &str,
    sink: &mut S,
) -> ControlFlow<()> {
    walk(value, &REGISTRY_COMPONENT, path, sink)?;
    if let Some(metadata) = value.get("metadata").filter(|m| m.is_object()) {
        walk(metadata, &COMPONENT_METADATA, &join(path, "metadata"), sink)?;
    }
    if let Some(component) = value.get("component").filter(|c| c.is_object()) {
        walk(component, &PRIMARY_FILE, &join(path, "component"), sink)?;
    }
    ControlFlow::Continue(())
}

/// Walk a whole registry document: the root shape, then every component
pub fn walk_registry<S: ViolationSink>(document: &Value, sink: &mut S) -> ControlFlow<()> {
    walk(document, &REGISTRY, "", sink)?;
    if let Some(components) = document.get("components").and_then(Value::as_object) {
        for (name, component) in components {
            walk_component(component, &join("components", name), sink)?;
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(value: &Value, shape: &Shape) -> Vec<String> {
        let mut found: Vec<Violation> = Vec::new();
        let _ = walk(value, shape, "file", &mut found);
        found.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_valid_file_has_no_violations() {
        let value = json!({"path": "a.tsx", "content": "", "type": "utility"});
        assert!(collect(&value, &COMPONENT_FILE).is_empty());
    }

    #[test]
    fn test_reports_missing_and_enum_fields() {
        let value = json!({"path": "a.tsx", "type": "hook"});
        let errors = collect(&value, &COMPONENT_FILE);
        assert_eq!(
            errors,
            vec![
                "file.content is required",
                "file.type must be one of component, utility, type (got \"hook\")",
            ]
        );
    }

    #[test]
    fn test_first_violation_stops_walk() {
        let value = json!({"type": 3});
        let mut first = FirstViolation::default();
        let flow = walk(&value, &COMPONENT_FILE, "file", &mut first);
        assert!(flow.is_break());
        assert_eq!(first.0.unwrap().to_string(), "file.path is required");
    }

    #[test]
    fn test_array_elements_get_indexed_paths() {
        let value = json!(["clsx", 4]);
        let mut found: Vec<Violation> = Vec::new();
        let _ = walk(&value, &Shape::Array(&Shape::String), "deps", &mut found);
        assert_eq!(found[0].to_string(), "deps[1] must be a string (got number)");
    }

    #[test]
    fn test_root_must_be_object() {
        let mut found: Vec<Violation> = Vec::new();
        let _ = walk_registry(&json!([]), &mut found);
        assert_eq!(found[0].to_string(), "registry must be an object (got array)");
    }

    #[test]
    fn test_component_walk_descends_into_metadata() {
        let value = json!({
            "metadata": {"name": "", "description": "d", "dependencies": [], "files": {}, "npmDependencies": []},
            "component": {"path": "x.tsx", "content": "x"}
        });
        let mut found: Vec<Violation> = Vec::new();
        let _ = walk_component(&value, "components.x", &mut found);
        let errors: Vec<_> = found.iter().map(ToString::to_string).collect();
        assert_eq!(
            errors,
            vec![
                "components.x.metadata.name must not be empty",
                "components.x.metadata.files must be an array (got object)",
            ]
        );
    }
}
