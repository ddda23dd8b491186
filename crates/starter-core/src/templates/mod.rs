//! Template descriptors, materialization, and metadata patching
//!
//! This module provides:
//! - Template descriptor types (TemplateDescriptor, TemplateEntry, Placeholder)
//! - The built-in template catalog
//! - Materialization of a descriptor into files on disk
//! - Post-materialization patches for the metadata and secret files

pub mod catalog;
pub mod copier;
pub mod manifest;
pub mod metadata;

pub use catalog::{available_templates, descriptor_for, DEFAULT_TEMPLATE};
pub use copier::{materialize, MaterializedFile};
pub use manifest::{EntryKind, Payload, Placeholder, TemplateDescriptor, TemplateEntry};
pub use metadata::{patch_project_name, patch_secret};
