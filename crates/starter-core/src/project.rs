//! The per-run project description

use crate::error::{Result, ScaffoldError};
use crate::validate::{validate, NameCheck};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Validated inputs for one scaffolding run
#[derive(Clone, Serialize)]
pub struct ProjectSpec {
    name: String,
    root_path: PathBuf,
    #[serde(skip)]
    secret: Option<String>,
}

impl ProjectSpec {
    /// Build a spec, rejecting names that fail validation
    pub fn new(
        name: impl Into<String>,
        root_path: impl Into<PathBuf>,
        secret: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        if let NameCheck::Invalid(violations) = validate(&name) {
            return Err(ScaffoldError::InvalidName { name, violations });
        }
        // Surrounding whitespace is paste residue; anything else would split
        // the `.env` line
        let secret = secret
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if secret
            .as_deref()
            .is_some_and(|s| s.chars().any(char::is_control))
        {
            return Err(ScaffoldError::InvalidSecret);
        }
        Ok(Self {
            name,
            root_path: root_path.into(),
            secret,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}

// Keeps the secret out of logs
impl fmt::Debug for ProjectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectSpec")
            .field("name", &self.name)
            .field("root_path", &self.root_path)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
