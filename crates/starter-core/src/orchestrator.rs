//! Sequencing of a scaffolding run and its terminal report
//!
//! A run moves through: name resolved, directory checked, materialized,
//! metadata patched, then install attempted or skipped. Only the name and
//! directory steps consult the user; only installation retries.

use crate::error::{FatalKind, Result, ScaffoldError};
use crate::install::{AttemptResult, InstallationStrategy, StrategyRunner, STRATEGY_TABLE};
use crate::project::ProjectSpec;
use crate::templates::{
    available_templates, descriptor_for, materialize, patch_project_name, patch_secret,
    MaterializedFile, Placeholder, TemplateDescriptor, DEFAULT_TEMPLATE,
};
use crate::ui::{Prompter, Reporter};
use crate::validate::{validate, NameCheck};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// What the caller wants built
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    /// Project name; asked for when absent
    pub name: Option<String>,
    pub secret: Option<String>,
    /// Template variant identifier
    pub template: String,
    /// Whether to attempt dependency installation
    pub install: bool,
    /// Directory the project folder is created in
    pub parent_dir: PathBuf,
    /// Ask for the secret when none was supplied
    pub prompt_for_secret: bool,
}

impl Default for ScaffoldRequest {
    fn default() -> Self {
        Self {
            name: None,
            secret: None,
            template: DEFAULT_TEMPLATE.to_string(),
            install: true,
            parent_dir: PathBuf::from("."),
            prompt_for_secret: false,
        }
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Project created and dependencies installed
    Success,
    /// Project created; the user must install dependencies themselves
    ManualStepsRequired,
    Fatal(FatalKind),
}

/// Everything the presentation layer needs to describe a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: Outcome,
    pub project: Option<ProjectSpec>,
    pub files: Vec<MaterializedFile>,
    pub winning_strategy: Option<&'static str>,
    /// Empty unless installation was attempted
    pub attempts: Vec<AttemptResult>,
    /// Message for fatal outcomes
    pub error: Option<String>,
}

impl RunReport {
    fn fatal(
        err: &ScaffoldError,
        project: Option<ProjectSpec>,
        files: Vec<MaterializedFile>,
    ) -> Self {
        Self {
            outcome: Outcome::Fatal(err.fatal_kind()),
            project,
            files,
            winning_strategy: None,
            attempts: Vec::new(),
            error: Some(err.to_string()),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.outcome, Outcome::Fatal(_))
    }

    /// Process exit code: 1 for fatal outcomes, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            1
        } else {
            0
        }
    }

    /// Whether installation ran and every strategy failed
    pub fn install_exhausted(&self) -> bool {
        self.outcome == Outcome::ManualStepsRequired && !self.attempts.is_empty()
    }
}

/// Resolves a template variant name to its descriptor
pub type Catalog = fn(&str) -> Option<&'static TemplateDescriptor>;

/// Drives one scaffolding run through its injected capabilities
///
/// Every fatal outcome is reported through [`Reporter::fail`] exactly once,
/// so front ends need not repeat [`RunReport::error`].
pub struct Scaffolder<'a> {
    reporter: &'a dyn Reporter,
    prompter: &'a dyn Prompter,
    runner: StrategyRunner,
    strategies: &'a [InstallationStrategy],
    catalog: Catalog,
}

impl<'a> Scaffolder<'a> {
    pub fn new(reporter: &'a dyn Reporter, prompter: &'a dyn Prompter) -> Self {
        Self {
            reporter,
            prompter,
            runner: StrategyRunner::default(),
            strategies: STRATEGY_TABLE,
            catalog: descriptor_for,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_runner(mut self, runner: StrategyRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_strategies(mut self, strategies: &'a [InstallationStrategy]) -> Self {
        self.strategies = strategies;
        self
    }

    /// Run every step and summarize the result; never panics on user input
    pub async fn run(&self, request: ScaffoldRequest) -> RunReport {
        let descriptor = match lookup_template(self.catalog, &request.template) {
            Ok(descriptor) => descriptor,
            Err(err) => return self.abort(&err, None, Vec::new()),
        };

        // Rejections were reported as they happened
        let name = match self.resolve_name(request.name.as_deref()) {
            Ok(name) => name,
            Err(err) => return RunReport::fatal(&err, None, Vec::new()),
        };

        let root = request.parent_dir.join(&name);
        let root = std::path::absolute(&root).unwrap_or(root);
        // Dangling symlinks count as taken
        if std::fs::symlink_metadata(&root).is_ok() {
            let err = ScaffoldError::AlreadyExists(root);
            return self.abort(&err, None, Vec::new());
        }

        let secret = request.secret.clone().or_else(|| {
            if request.prompt_for_secret {
                self.prompter
                    .ask("API key (leave blank to add it later)", true)
            } else {
                None
            }
        });

        let spec = match ProjectSpec::new(name, root, secret) {
            Ok(spec) => spec,
            Err(err) => return self.abort(&err, None, Vec::new()),
        };
        info!(project = ?spec, template = descriptor.name, "scaffolding project");

        self.reporter.start("Creating project...");
        let files = match materialize(descriptor, &spec).await {
            Ok(files) => files,
            Err(err) => return self.abort(&err, Some(spec), Vec::new()),
        };

        if let Err(err) = self.patch_metadata(descriptor, &spec).await {
            return self.abort(&err, Some(spec), files);
        }
        self.reporter.succeed(&format!(
            "Created {} files in {}",
            files.len(),
            spec.root_path().display()
        ));

        if !request.install {
            info!("installation skipped");
            return RunReport {
                outcome: Outcome::ManualStepsRequired,
                project: Some(spec),
                files,
                winning_strategy: None,
                attempts: Vec::new(),
                error: None,
            };
        }

        let install = self
            .runner
            .run(self.strategies, spec.root_path(), self.reporter)
            .await;
        let (outcome, winning_strategy) = match install.succeeded_strategy() {
            Some(strategy) => (Outcome::Success, Some(strategy.label)),
            None => {
                info!("all installation strategies failed");
                (Outcome::ManualStepsRequired, None)
            }
        };

        RunReport {
            outcome,
            project: Some(spec),
            files,
            winning_strategy,
            attempts: install.into_attempts(),
            error: None,
        }
    }

    fn abort(
        &self,
        err: &ScaffoldError,
        project: Option<ProjectSpec>,
        files: Vec<MaterializedFile>,
    ) -> RunReport {
        self.reporter.fail(&err.to_string());
        RunReport::fatal(err, project, files)
    }

    /// Use the supplied name or ask until a valid one arrives
    ///
    /// Each rejection is reported once; the returned error is never reported
    /// again.
    fn resolve_name(&self, supplied: Option<&str>) -> Result<String> {
        let mut candidate = match supplied {
            Some(name) => name.to_string(),
            None => match self.prompter.ask("Project name", false) {
                Some(answer) => answer.trim().to_string(),
                None => {
                    let err = ScaffoldError::InvalidName {
                        name: String::new(),
                        violations: vec!["name length must be greater than zero".to_string()],
                    };
                    self.reporter.fail(&err.to_string());
                    return Err(err);
                }
            },
        };

        loop {
            match validate(&candidate) {
                NameCheck::Valid => return Ok(candidate),
                NameCheck::Invalid(violations) => {
                    self.reporter.fail(&format!(
                        "Invalid project name '{}': {}",
                        candidate,
                        violations.join("; ")
                    ));
                    candidate = self.ask_name(candidate, violations)?;
                }
            }
        }
    }

    fn ask_name(&self, last: String, violations: Vec<String>) -> Result<String> {
        self.prompter
            .ask("Project name", false)
            .map(|answer| answer.trim().to_string())
            .ok_or(ScaffoldError::InvalidName {
                name: last,
                violations,
            })
    }

    /// Name patch is required; secret patch failures are absorbed
    async fn patch_metadata(
        &self,
        descriptor: &TemplateDescriptor,
        spec: &ProjectSpec,
    ) -> Result<()> {
        patch_project_name(spec.root_path(), descriptor.metadata_file, spec.name()).await?;

        // Materialization already resolved the secret where the entry declares it
        let pending_secret = match descriptor.entry(descriptor.secret_file) {
            Some(entry) if entry.has_placeholder(Placeholder::Secret) => None,
            _ => spec.secret(),
        };
        if let Err(err) =
            patch_secret(spec.root_path(), descriptor.secret_file, pending_secret).await
        {
            warn!(error = %err, "could not write secret file");
        }
        Ok(())
    }
}

fn lookup_template(catalog: Catalog, variant: &str) -> Result<&'static TemplateDescriptor> {
    catalog(variant).ok_or_else(|| ScaffoldError::UnknownTemplate {
        name: variant.to_string(),
        available: available_templates()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
