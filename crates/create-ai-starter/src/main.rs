//! create-ai-starter - Project scaffolding for AI chat starter apps

use anyhow::Result;
use clap::Parser;
use starter_core::tui::CreateArgs;
use starter_core::{ProductConfig, DEFAULT_TEMPLATE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log output (e.g. `STARTER_LOG=debug`)
const LOG_ENV: &str = "STARTER_LOG";

/// AI starter product configuration
#[derive(Clone)]
pub struct AiStarterConfig;

impl ProductConfig for AiStarterConfig {
    fn name(&self) -> &'static str {
        "create-ai-starter"
    }

    fn display_name(&self) -> &'static str {
        "AI Starter"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding AI chat starter apps"
    }

    fn docs_url(&self) -> &'static str {
        "https://platform.openai.com/docs"
    }

    fn secret_env_var(&self) -> &'static str {
        "OPENAI_API_KEY"
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-ai-starter")]
#[command(about = "CLI for scaffolding AI chat starter apps")]
#[command(version)]
pub struct Args {
    /// Project name (prompted for if omitted)
    pub name: Option<String>,

    /// Template variant to use
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Directory to create the project in (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// API key to write into the project's .env
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Skip automatic dependency installation
    #[arg(long = "no-install")]
    pub no_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            name: args.name,
            template: args.template,
            directory: args.directory,
            api_key: args.api_key,
            no_install: args.no_install,
            yes: args.yes,
        }
    }
}

/// Structured logs go to stderr and are off unless requested
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        starter_core::install::abort_active_command();
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let config = AiStarterConfig;

    let result = starter_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    let report = result?;
    if report.exit_code() != 0 {
        std::process::exit(report.exit_code());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["create-ai-starter"]);
        assert!(args.name.is_none());
        assert_eq!(args.template, "default");
        assert!(!args.no_install);
        assert!(!args.yes);
    }

    #[test]
    fn test_full_invocation_maps_to_create_args() {
        let args = Args::parse_from([
            "create-ai-starter",
            "my-app",
            "--template",
            "default",
            "--no-install",
            "--api-key",
            "sk-test-123",
            "-d",
            "/tmp",
            "-y",
        ]);
        let create: CreateArgs = args.into();
        assert_eq!(create.name.as_deref(), Some("my-app"));
        assert_eq!(create.api_key.as_deref(), Some("sk-test-123"));
        assert_eq!(create.directory, Some(PathBuf::from("/tmp")));
        assert!(create.no_install);
        assert!(create.yes);
    }
}
