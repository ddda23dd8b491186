//! Dependency installation with ordered fallback strategies
//!
//! This module provides:
//! - The fixed strategy table (plain install through forced install)
//! - A runner that tries strategies in order and records each attempt

pub mod runner;
pub mod strategy;

pub use runner::{
    abort_active_command, run_command, AttemptOutcome, AttemptResult, CommandFailure,
    FailureReason, InstallOutcome, StrategyRunner, COMMAND_TIMEOUT, STRATEGY_BACKOFF,
};
pub use strategy::{InstallationStrategy, STRATEGY_TABLE};
