//! Executes installation strategies in order until one succeeds

use super::strategy::InstallationStrategy;
use crate::ui::Reporter;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::process::Command as TokioCommand;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

/// Upper bound for a single command (2 minutes)
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Pause between a failed strategy and the next one
pub const STRATEGY_BACKOFF: Duration = Duration::from_secs(1);

/// Why a command did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    /// The command ran longer than the runner's timeout and was killed
    Timeout,
    /// The command exited unsuccessfully; `code` is `None` when killed by a signal
    Exit { code: Option<i32>, detail: String },
    /// The command could not be started or awaited
    Spawn(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timeout"),
            FailureReason::Exit { code, detail } => {
                match code {
                    Some(code) => write!(f, "exit code {}", code)?,
                    None => write!(f, "terminated by signal")?,
                }
                if !detail.is_empty() {
                    write!(f, ": {}", detail)?;
                }
                Ok(())
            }
            FailureReason::Spawn(err) => write!(f, "failed to start: {}", err),
        }
    }
}

/// A failed command within a strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFailure {
    pub command: String,
    pub reason: FailureReason,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.command, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttemptOutcome {
    Success,
    Failure(CommandFailure),
}

/// Record of one strategy that was actually tried
#[derive(Debug, Clone, Serialize)]
pub struct AttemptResult {
    pub strategy: InstallationStrategy,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success)
    }
}

/// Aggregate result of a runner pass
#[derive(Debug, Clone, Serialize)]
pub enum InstallOutcome {
    Succeeded {
        strategy: InstallationStrategy,
        attempts: Vec<AttemptResult>,
    },
    AllFailed {
        attempts: Vec<AttemptResult>,
    },
}

impl InstallOutcome {
    pub fn succeeded_strategy(&self) -> Option<&InstallationStrategy> {
        match self {
            InstallOutcome::Succeeded { strategy, .. } => Some(strategy),
            InstallOutcome::AllFailed { .. } => None,
        }
    }

    pub fn attempts(&self) -> &[AttemptResult] {
        match self {
            InstallOutcome::Succeeded { attempts, .. } | InstallOutcome::AllFailed { attempts } => {
                attempts
            }
        }
    }

    pub fn into_attempts(self) -> Vec<AttemptResult> {
        match self {
            InstallOutcome::Succeeded { attempts, .. } | InstallOutcome::AllFailed { attempts } => {
                attempts
            }
        }
    }
}

/// Runs a strategy table against a project directory
#[derive(Debug, Clone)]
pub struct StrategyRunner {
    command_timeout: Duration,
    backoff: Duration,
}

impl Default for StrategyRunner {
    fn default() -> Self {
        Self {
            command_timeout: COMMAND_TIMEOUT,
            backoff: STRATEGY_BACKOFF,
        }
    }
}

impl StrategyRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Try each strategy in table order, stopping at the first success
    pub async fn run(
        &self,
        table: &[InstallationStrategy],
        cwd: &Path,
        reporter: &dyn Reporter,
    ) -> InstallOutcome {
        let mut attempts = Vec::with_capacity(table.len());

        for (idx, strategy) in table.iter().enumerate() {
            reporter.start(&format!(
                "Installing dependencies ({}/{}: {})",
                idx + 1,
                table.len(),
                strategy.label
            ));
            let started = Instant::now();
            let result = self.run_strategy(strategy, cwd).await;
            let elapsed = started.elapsed();

            match result {
                Ok(()) => {
                    info!(strategy = strategy.label, ?elapsed, "installation succeeded");
                    reporter.succeed(&format!("Dependencies installed ({})", strategy.label));
                    attempts.push(AttemptResult {
                        strategy: *strategy,
                        outcome: AttemptOutcome::Success,
                        elapsed,
                    });
                    return InstallOutcome::Succeeded {
                        strategy: *strategy,
                        attempts,
                    };
                }
                Err(failure) => {
                    info!(
                        strategy = strategy.label,
                        %failure,
                        ?elapsed,
                        "installation strategy failed"
                    );
                    reporter.fail(&format!("{} failed: {}", strategy.label, failure));
                    attempts.push(AttemptResult {
                        strategy: *strategy,
                        outcome: AttemptOutcome::Failure(failure),
                        elapsed,
                    });
                }
            }

            if idx + 1 < table.len() && !self.backoff.is_zero() {
                sleep(self.backoff).await;
            }
        }

        InstallOutcome::AllFailed { attempts }
    }

    /// Run a strategy's commands as a chain; the first failure ends it
    async fn run_strategy(
        &self,
        strategy: &InstallationStrategy,
        cwd: &Path,
    ) -> Result<(), CommandFailure> {
        for command in strategy.commands {
            run_command(command, cwd, self.command_timeout).await?;
        }
        Ok(())
    }
}

/// Run one shell command in `cwd`, killing it if it outlives `limit`
pub async fn run_command(command: &str, cwd: &Path, limit: Duration) -> Result<(), CommandFailure> {
    let failure = |reason| CommandFailure {
        command: command.to_string(),
        reason,
    };

    debug!(command, cwd = %cwd.display(), "spawning");
    let child = shell(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| failure(FailureReason::Spawn(e.to_string())))?;

    let pid = child.id();
    let _active = pid.map(ActiveCommand::track);
    let wait = child.wait_with_output();
    tokio::pin!(wait);

    // The child is still unreaped here, so its pid names its process group
    let output = match timeout(limit, wait.as_mut()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(failure(FailureReason::Spawn(e.to_string()))),
        Err(_) => {
            debug!(command, "timed out after {}s", limit.as_secs_f32());
            if let Some(pid) = pid {
                kill_tree(pid);
            }
            return Err(failure(FailureReason::Timeout));
        }
    };

    debug!(command, status = %output.status, "finished");
    if output.status.success() {
        return Ok(());
    }

    let detail = last_line(&output.stderr)
        .or_else(|| last_line(&output.stdout))
        .unwrap_or_default();
    Err(failure(FailureReason::Exit {
        code: output.status.code(),
        detail,
    }))
}

#[cfg(not(windows))]
fn shell(command: &str) -> TokioCommand {
    let mut cmd = TokioCommand::new("sh");
    cmd.arg("-c").arg(command);
    // Own group so a timeout can take down everything the command started
    cmd.process_group(0);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> TokioCommand {
    let mut cmd = TokioCommand::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

/// Pid of the command currently running, 0 when idle
static ACTIVE_PID: AtomicU32 = AtomicU32::new(0);

/// Marks a command as running until dropped
struct ActiveCommand;

impl ActiveCommand {
    fn track(pid: u32) -> Self {
        ACTIVE_PID.store(pid, Ordering::SeqCst);
        ActiveCommand
    }
}

impl Drop for ActiveCommand {
    fn drop(&mut self) {
        ACTIVE_PID.store(0, Ordering::SeqCst);
    }
}

/// Kill the running install command and its children, if any
///
/// Commands run in their own process group, so a terminal Ctrl+C does not
/// reach them; interrupt handlers call this before exiting.
pub fn abort_active_command() {
    let pid = ACTIVE_PID.swap(0, Ordering::SeqCst);
    if pid != 0 {
        kill_tree(pid);
    }
}

/// Kill a command together with every process it spawned
#[cfg(not(windows))]
fn kill_tree(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: killpg takes plain integers and touches no memory of ours
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(pgid, error = %std::io::Error::last_os_error(), "killpg failed");
    }
}

#[cfg(windows)]
fn kill_tree(pid: u32) {
    let status = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = status {
        debug!(pid, error = %e, "taskkill failed");
    }
}

/// Last non-empty line of captured output
fn last_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReporter {
        events: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn start(&self, message: &str) {
            self.events.borrow_mut().push(format!("start {}", message));
        }
        fn succeed(&self, message: &str) {
            self.events.borrow_mut().push(format!("succeed {}", message));
        }
        fn fail(&self, message: &str) {
            self.events.borrow_mut().push(format!("fail {}", message));
        }
    }

    fn strategy(label: &'static str, commands: &'static [&'static str]) -> InstallationStrategy {
        InstallationStrategy {
            label,
            commands,
            rationale: "test",
        }
    }

    fn runner() -> StrategyRunner {
        StrategyRunner::new()
            .with_backoff(Duration::ZERO)
            .with_command_timeout(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_stops_at_first_success() {
        let tmp = tempfile::tempdir().unwrap();
        let table = [
            strategy("first", &["false"]),
            strategy("second", &["true"]),
            strategy("third", &["touch third-ran"]),
        ];
        let reporter = RecordingReporter::default();

        let outcome = runner().run(&table, tmp.path(), &reporter).await;

        assert_eq!(outcome.succeeded_strategy().map(|s| s.label), Some("second"));
        let attempts = outcome.attempts();
        assert_eq!(attempts.len(), 2);
        assert!(matches!(attempts[0].outcome, AttemptOutcome::Failure(_)));
        assert_eq!(attempts[0].strategy.label, "first");
        assert!(attempts[1].is_success());
        assert!(!tmp.path().join("third-ran").exists());

        let events = reporter.events.borrow();
        assert_eq!(events.len(), 4);
        assert!(events[0].starts_with("start Installing dependencies (1/3: first)"));
        assert!(events[1].starts_with("fail first failed"));
        assert!(events[3].starts_with("succeed Dependencies installed (second)"));
    }

    #[tokio::test]
    async fn test_all_failed_logs_every_strategy_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let table = [
            strategy("a", &["false"]),
            strategy("b", &["exit 2"]),
            strategy("c", &["true", "false"]),
        ];

        let outcome = runner().run(&table, tmp.path(), &crate::ui::SilentReporter).await;

        assert!(outcome.succeeded_strategy().is_none());
        let labels: Vec<_> = outcome.attempts().iter().map(|a| a.strategy.label).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert!(outcome.attempts().iter().all(|a| !a.is_success()));
    }

    #[tokio::test]
    async fn test_empty_table_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = runner().run(&[], tmp.path(), &crate::ui::SilentReporter).await;
        assert!(matches!(
            outcome,
            InstallOutcome::AllFailed { ref attempts } if attempts.is_empty()
        ));
    }

    #[tokio::test]
    async fn test_failed_command_aborts_rest_of_strategy() {
        let tmp = tempfile::tempdir().unwrap();
        let table = [
            strategy("broken", &["touch one", "false", "touch two"]),
            strategy("whole", &["touch three", "touch four"]),
        ];

        let outcome = runner().run(&table, tmp.path(), &crate::ui::SilentReporter).await;

        assert_eq!(outcome.succeeded_strategy().map(|s| s.label), Some("whole"));
        assert!(tmp.path().join("one").exists());
        assert!(!tmp.path().join("two").exists());
        assert!(tmp.path().join("three").exists());
        assert!(tmp.path().join("four").exists());
        match &outcome.attempts()[0].outcome {
            AttemptOutcome::Failure(failure) => assert_eq!(failure.command, "false"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_commands_run_in_project_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("package.json"), "{}").unwrap();
        let table = [strategy("check", &["test -f package.json"])];

        let outcome = runner().run(&table, tmp.path(), &crate::ui::SilentReporter).await;

        assert!(outcome.succeeded_strategy().is_some());
    }

    #[tokio::test]
    async fn test_exit_code_and_stderr_captured() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_command("echo boom >&2; exit 3", tmp.path(), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(
            err.reason,
            FailureReason::Exit {
                code: Some(3),
                detail: "boom".to_string()
            }
        );
        assert_eq!(err.to_string(), "`echo boom >&2; exit 3`: exit code 3: boom");
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let tmp = tempfile::tempdir().unwrap();
        let started = Instant::now();
        let err = run_command("sleep 5", tmp.path(), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err.reason, FailureReason::Timeout);
        assert_eq!(err.reason.to_string(), "timeout");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_kills_background_children() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_command(
            "(sleep 1; touch leaked) & wait",
            tmp.path(),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();
        assert_eq!(err.reason, FailureReason::Timeout);

        sleep(Duration::from_millis(1500)).await;
        assert!(!tmp.path().join("leaked").exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_spawn_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_command("true", &tmp.path().join("missing"), Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err.reason, FailureReason::Spawn(_)));
    }

    #[tokio::test]
    async fn test_backoff_between_failed_strategies() {
        let tmp = tempfile::tempdir().unwrap();
        let table = [strategy("a", &["false"]), strategy("b", &["false"])];
        let runner = runner().with_backoff(Duration::from_millis(100));

        let started = Instant::now();
        let outcome = runner.run(&table, tmp.path(), &crate::ui::SilentReporter).await;

        assert_eq!(outcome.attempts().len(), 2);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
