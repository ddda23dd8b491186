//! Template descriptor types

use crate::error::{Result, ScaffoldError};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Component, Path};

/// Token standing in for the project name inside payloads
pub const PROJECT_NAME_TOKEN: &str = "{{projectName}}";

/// Token standing in for the secret; doubles as the example value when no
/// secret is supplied
pub const SECRET_TOKEN: &str = "sk-your-api-key-here";

/// A named substitution point inside a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Placeholder {
    ProjectName,
    Secret,
}

impl Placeholder {
    /// Literal text replaced in the payload
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::ProjectName => PROJECT_NAME_TOKEN,
            Placeholder::Secret => SECRET_TOKEN,
        }
    }
}

/// How an entry is turned into bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    /// Serialized as pretty-printed JSON
    Structured,
    /// Written verbatim after substitution
    Text,
}

#[derive(Debug, Clone)]
pub enum Payload {
    Structured(serde_json::Value),
    Text(&'static str),
}

/// One file of a template
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub relative_path: &'static str,
    pub payload: Payload,
    /// Placeholders present in the payload; only these are substituted
    pub placeholders: &'static [Placeholder],
}

impl TemplateEntry {
    pub fn structured(
        relative_path: &'static str,
        value: serde_json::Value,
        placeholders: &'static [Placeholder],
    ) -> Self {
        Self {
            relative_path,
            payload: Payload::Structured(value),
            placeholders,
        }
    }

    pub fn text(
        relative_path: &'static str,
        content: &'static str,
        placeholders: &'static [Placeholder],
    ) -> Self {
        Self {
            relative_path,
            payload: Payload::Text(content),
            placeholders,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self.payload {
            Payload::Structured(_) => EntryKind::Structured,
            Payload::Text(_) => EntryKind::Text,
        }
    }

    pub fn has_placeholder(&self, placeholder: Placeholder) -> bool {
        self.placeholders.contains(&placeholder)
    }
}

/// The ordered file set of one template variant
#[derive(Debug, Clone)]
pub struct TemplateDescriptor {
    /// Variant identifier (e.g. `default`)
    pub name: &'static str,

    /// Description of what the template provides
    pub description: &'static str,

    /// Structured file whose `name` field carries the project name
    pub metadata_file: &'static str,

    /// Text file holding the secret
    pub secret_file: &'static str,

    entries: Vec<TemplateEntry>,
}

impl TemplateDescriptor {
    /// Build a descriptor, rejecting duplicate or escaping paths
    pub fn new(
        name: &'static str,
        description: &'static str,
        metadata_file: &'static str,
        secret_file: &'static str,
        entries: Vec<TemplateEntry>,
    ) -> Result<Self> {
        let descriptor = Self {
            name,
            description,
            metadata_file,
            secret_file,
            entries,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Entries in write order
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn entry(&self, relative_path: &str) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|e| e.relative_path == relative_path)
    }

    /// Check that every path is unique and stays inside the project root
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            check_relative_path(entry.relative_path)?;
            if !seen.insert(entry.relative_path) {
                return Err(ScaffoldError::DuplicateTemplatePath(
                    entry.relative_path.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Reject empty, absolute, and parent-traversing paths
pub fn check_relative_path(relative_path: &str) -> Result<()> {
    let path = Path::new(relative_path);
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return Err(ScaffoldError::InvalidTemplatePath(relative_path.to_string()));
    }
    if components.all(|c| matches!(c, Component::Normal(_))) {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidTemplatePath(relative_path.to_string()))
    }
}
