//! Post-materialization patches to the metadata and secret files

use crate::error::{Result, ScaffoldError};
use crate::templates::copier::to_pretty_json;
use crate::templates::manifest::SECRET_TOKEN;
use serde::de::Error as _;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Overwrite the `name` field of the structured metadata file
pub async fn patch_project_name(root: &Path, metadata_file: &str, name: &str) -> Result<()> {
    let path = root.join(metadata_file);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| ScaffoldError::io(&path, e))?;

    let mut value: serde_json::Value =
        serde_json::from_str(&content).map_err(|source| ScaffoldError::Metadata {
            path: path.clone(),
            source,
        })?;
    let object = value.as_object_mut().ok_or_else(|| ScaffoldError::Metadata {
        path: path.clone(),
        source: serde_json::Error::custom("expected a JSON object"),
    })?;
    object.insert(
        "name".to_string(),
        serde_json::Value::String(name.to_string()),
    );

    let rendered = to_pretty_json(&value).map_err(|source| ScaffoldError::Metadata {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, rendered)
        .await
        .map_err(|e| ScaffoldError::io(&path, e))
}

/// Replace the secret placeholder in the secret file
///
/// Returns whether the file was rewritten. A missing secret, a missing file,
/// or a file without the placeholder is not an error.
pub async fn patch_secret(root: &Path, secret_file: &str, secret: Option<&str>) -> Result<bool> {
    let Some(secret) = secret else {
        return Ok(false);
    };

    let path = root.join(secret_file);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(ScaffoldError::io(&path, e)),
    };

    if !content.contains(SECRET_TOKEN) {
        return Ok(false);
    }

    fs::write(&path, content.replace(SECRET_TOKEN, secret))
        .await
        .map_err(|e| ScaffoldError::io(&path, e))?;
    Ok(true)
}
