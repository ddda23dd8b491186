//! Template materialization: writes a descriptor's entries under a project root

use crate::error::{Result, ScaffoldError};
use crate::project::ProjectSpec;
use crate::templates::manifest::{
    check_relative_path, Payload, Placeholder, TemplateDescriptor, TemplateEntry,
};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// A file written by [`materialize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterializedFile {
    pub relative_path: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Write every entry of `descriptor` under the project root, in descriptor order
///
/// Stops at the first failure. Files already written stay on disk.
pub async fn materialize(
    descriptor: &TemplateDescriptor,
    spec: &ProjectSpec,
) -> Result<Vec<MaterializedFile>> {
    let root = spec.root_path();
    fs::create_dir_all(root)
        .await
        .map_err(|e| ScaffoldError::io(root, e))?;

    let mut written = Vec::with_capacity(descriptor.entries().len());

    for entry in descriptor.entries() {
        check_relative_path(entry.relative_path)?;
        let target_path = root.join(entry.relative_path);

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScaffoldError::io(parent, e))?;
        }

        let content = render_entry(entry, spec).map_err(|source| ScaffoldError::Metadata {
            path: target_path.clone(),
            source,
        })?;
        fs::write(&target_path, content.as_bytes())
            .await
            .map_err(|e| ScaffoldError::io(&target_path, e))?;

        debug!(path = %target_path.display(), bytes = content.len(), "wrote template file");
        written.push(MaterializedFile {
            relative_path: entry.relative_path.to_string(),
            path: target_path,
            bytes: content.len(),
        });
    }

    Ok(written)
}

/// Resolve an entry's placeholders and produce its file content
pub fn render_entry(entry: &TemplateEntry, spec: &ProjectSpec) -> serde_json::Result<String> {
    match &entry.payload {
        Payload::Text(text) => Ok(substitute(text, entry.placeholders, spec)),
        Payload::Structured(value) => {
            let mut value = value.clone();
            substitute_value(&mut value, entry.placeholders, spec);
            to_pretty_json(&value)
        }
    }
}

/// Serialize with a 2-space indent and a trailing newline
pub(crate) fn to_pretty_json(value: &serde_json::Value) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// The value a placeholder resolves to; `None` leaves the token in place
fn resolve(placeholder: Placeholder, spec: &ProjectSpec) -> Option<&str> {
    match placeholder {
        Placeholder::ProjectName => Some(spec.name()),
        Placeholder::Secret => spec.secret(),
    }
}

fn substitute(text: &str, placeholders: &[Placeholder], spec: &ProjectSpec) -> String {
    let mut out = text.to_string();
    for placeholder in placeholders {
        if let Some(value) = resolve(*placeholder, spec) {
            out = out.replace(placeholder.token(), value);
        }
    }
    out
}

fn substitute_value(
    value: &mut serde_json::Value,
    placeholders: &[Placeholder],
    spec: &ProjectSpec,
) {
    match value {
        serde_json::Value::String(s) => *s = substitute(s, placeholders, spec),
        serde_json::Value::Array(items) => items
            .iter_mut()
            .for_each(|item| substitute_value(item, placeholders, spec)),
        serde_json::Value::Object(map) => map
            .values_mut()
            .for_each(|item| substitute_value(item, placeholders, spec)),
        _ => {}
    }
}
