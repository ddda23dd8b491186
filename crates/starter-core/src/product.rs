//! Product configuration trait for CLI binaries
//!
//! This trait defines what a binary supplies to brand the scaffolding run and
//! to describe what the user should do once the project exists.

use crate::orchestrator::{Outcome, RunReport};

/// Configuration trait for CLI products built on this engine
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Environment variable the generated app reads its secret from
    fn secret_env_var(&self) -> &'static str;

    /// Generate the "next steps" instructions after a non-fatal run
    fn next_steps(&self, report: &RunReport) -> Vec<String> {
        let mut steps = Vec::new();
        let Some(project) = &report.project else {
            return steps;
        };

        // Step 1: cd to directory if not current
        let current = std::env::current_dir().ok();
        if current.as_deref() != Some(project.root_path()) {
            steps.push(format!("cd {}", project.root_path().display()));
        }

        // Step 2: Install dependencies unless a strategy already did
        if report.outcome != Outcome::Success {
            steps.push("npm install".to_string());
        }

        // Step 3: Provide the key
        if !project.has_secret() {
            steps.push(format!("Add your key to .env as {}", self.secret_env_var()));
        }

        // Step 4: Start dev server
        steps.push("npm run dev".to_string());

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectSpec;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "test"
        }
        fn display_name(&self) -> &'static str {
            "Test"
        }
        fn cli_description(&self) -> &'static str {
            "test product"
        }
        fn docs_url(&self) -> &'static str {
            "https://example.com/docs"
        }
        fn secret_env_var(&self) -> &'static str {
            "TEST_API_KEY"
        }
    }

    fn report(outcome: Outcome, secret: Option<&str>) -> RunReport {
        RunReport {
            outcome,
            project: Some(
                ProjectSpec::new("my-app", "/nowhere/my-app", secret.map(str::to_string)).unwrap(),
            ),
            files: Vec::new(),
            winning_strategy: None,
            attempts: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn test_manual_steps_include_install_and_key() {
        let steps = TestConfig.next_steps(&report(Outcome::ManualStepsRequired, None));
        assert_eq!(
            steps,
            [
                "cd /nowhere/my-app",
                "npm install",
                "Add your key to .env as TEST_API_KEY",
                "npm run dev"
            ]
        );
    }

    #[test]
    fn test_successful_install_with_secret_skips_those_steps() {
        let steps = TestConfig.next_steps(&report(Outcome::Success, Some("sk-1")));
        assert_eq!(steps, ["cd /nowhere/my-app", "npm run dev"]);
    }

    #[test]
    fn test_no_project_no_steps() {
        let mut r = report(Outcome::ManualStepsRequired, None);
        r.project = None;
        assert!(TestConfig.next_steps(&r).is_empty());
    }
}
