//! Charm-style CLI prompts using cliclack

use crate::install::AttemptOutcome;
use crate::orchestrator::{Outcome, RunReport, ScaffoldRequest, Scaffolder};
use crate::product::ProductConfig;
use crate::templates::DEFAULT_TEMPLATE;
use crate::ui::{NoPrompt, Prompter, Reporter};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Mutex;

/// CLI arguments for the create command
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Project name (asked for when absent)
    pub name: Option<String>,

    /// Template variant to use
    pub template: String,

    /// Directory the project folder is created in
    pub directory: Option<PathBuf>,

    /// Secret written into the generated project
    pub api_key: Option<String>,

    /// Skip automatic dependency installation
    pub no_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl Default for CreateArgs {
    fn default() -> Self {
        Self {
            name: None,
            template: DEFAULT_TEMPLATE.to_string(),
            directory: None,
            api_key: None,
            no_install: false,
            yes: false,
        }
    }
}

/// Reporter that renders each step as a cliclack spinner
#[derive(Default)]
pub struct SpinnerReporter {
    spinner: Mutex<Option<cliclack::ProgressBar>>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Option<cliclack::ProgressBar> {
        self.spinner.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Reporter for SpinnerReporter {
    fn start(&self, message: &str) {
        if let Some(previous) = self.take() {
            previous.stop("");
        }
        let spinner = cliclack::spinner();
        spinner.start(message);
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(spinner);
        }
    }

    fn succeed(&self, message: &str) {
        match self.take() {
            Some(spinner) => spinner.stop(message),
            None => {
                let _ = cliclack::log::success(message);
            }
        }
    }

    fn fail(&self, message: &str) {
        match self.take() {
            Some(spinner) => spinner.error(message),
            None => {
                let _ = cliclack::log::error(message);
            }
        }
    }
}

/// Prompter backed by cliclack text input
#[derive(Debug, Clone, Copy, Default)]
pub struct CliPrompter;

impl Prompter for CliPrompter {
    fn ask(&self, message: &str, optional: bool) -> Option<String> {
        let input = cliclack::input(message);
        let mut input = if optional {
            input.required(false)
        } else {
            input.placeholder("my-ai-app")
        };
        // Esc / Ctrl+C surface as errors; treat them as no answer
        input.interact::<String>().ok()
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs) -> Result<RunReport> {
    cliclack::intro(config.display_name())?;

    let parent_dir = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    if args.no_install {
        cliclack::log::info("Skipping dependency installation")?;
    }

    let request = ScaffoldRequest {
        name: args.name.clone(),
        secret: args.api_key.clone(),
        template: args.template.clone(),
        install: !args.no_install,
        parent_dir,
        prompt_for_secret: !args.yes && args.api_key.is_none(),
    };

    let reporter = SpinnerReporter::new();
    let cli_prompter = CliPrompter;
    let prompter: &dyn Prompter = if args.yes { &NoPrompt } else { &cli_prompter };

    let report = Scaffolder::new(&reporter, prompter).run(request).await;

    match report.outcome {
        Outcome::Fatal(_) => {
            // The reporter already showed the error itself
            cliclack::outro_cancel("Setup failed.")?;
            return Ok(report);
        }
        Outcome::Success => {
            if let Some(label) = report.winning_strategy {
                cliclack::log::success(format!("Dependencies ready via {}", label))?;
            }
        }
        Outcome::ManualStepsRequired => {
            if report.install_exhausted() {
                print_attempts(&report)?;
            }
        }
    }

    print_next_steps(config, &report)?;

    Ok(report)
}

/// Summarize every failed install attempt
fn print_attempts(report: &RunReport) -> Result<()> {
    cliclack::log::warning("Automatic installation failed. Finish the setup by hand.")?;
    for attempt in &report.attempts {
        let line = match &attempt.outcome {
            AttemptOutcome::Success => format!("{} {}", "ok".green(), attempt.strategy.label),
            AttemptOutcome::Failure(failure) => format!(
                "{} {} ({:.1}s): {}",
                "x".red(),
                attempt.strategy.label,
                attempt.elapsed.as_secs_f32(),
                failure
            ),
        };
        cliclack::log::remark(line)?;
    }
    Ok(())
}

fn print_next_steps<C: ProductConfig>(config: &C, report: &RunReport) -> Result<()> {
    let steps = config.next_steps(report);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    println!();
    println!("  Docs: {}", config.docs_url().cyan());

    cliclack::outro("Happy coding!")?;

    Ok(())
}
