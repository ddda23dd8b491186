//! Starter Core - Scaffolding and dependency provisioning for starter apps
//!
//! This library materializes a fixed template into a new project directory,
//! patches its metadata, and then tries a fixed sequence of installation
//! strategies until one succeeds. Binaries supply branding through
//! [`ProductConfig`] and console interaction through the [`ui`] traits.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Name validation, template materialization,
//!   metadata patches, the install strategy runner
//! - **Layer 2: Workflow Orchestration** - [`Scaffolder`] sequences a run and
//!   returns a [`RunReport`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use starter_core::{ScaffoldRequest, Scaffolder};
//! use starter_core::ui::{NoPrompt, SilentReporter};
//!
//! let request = ScaffoldRequest {
//!     name: Some("my-app".to_string()),
//!     install: false,
//!     ..ScaffoldRequest::default()
//! };
//! let report = Scaffolder::new(&SilentReporter, &NoPrompt).run(request).await;
//! std::process::exit(report.exit_code());
//! ```

pub mod error;
pub mod install;
pub mod orchestrator;
pub mod product;
pub mod project;
pub mod templates;
pub mod ui;
pub mod validate;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::{FatalKind, ScaffoldError};
pub use install::{AttemptResult, InstallOutcome, InstallationStrategy, StrategyRunner};
pub use orchestrator::{Outcome, RunReport, ScaffoldRequest, Scaffolder};
pub use product::ProductConfig;
pub use project::ProjectSpec;
pub use templates::{materialize, MaterializedFile, TemplateDescriptor, DEFAULT_TEMPLATE};
pub use validate::{validate, NameCheck};

#[cfg(feature = "tui")]
pub use tui::run;
