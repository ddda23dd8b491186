//! The ordered table of dependency installation strategies

use serde::Serialize;

/// One named way of installing dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallationStrategy {
    pub label: &'static str,
    /// Run in order; the first failure ends the strategy
    pub commands: &'static [&'static str],
    pub rationale: &'static str,
}

#[cfg(not(windows))]
const REMOVE_INSTALL_STATE: &str = "rm -rf node_modules package-lock.json";

#[cfg(windows)]
const REMOVE_INSTALL_STATE: &str = "if exist node_modules rmdir /s /q node_modules \
     & if exist package-lock.json del /f /q package-lock.json";

/// Strategies in order of increasing invasiveness
pub static STRATEGY_TABLE: &[InstallationStrategy] = &[
    InstallationStrategy {
        label: "npm install",
        commands: &["npm install"],
        rationale: "Plain install; succeeds on a healthy toolchain",
    },
    InstallationStrategy {
        label: "cache clean",
        commands: &["npm cache clean --force", "npm install"],
        rationale: "A corrupted npm cache is the most common cause of install failures",
    },
    InstallationStrategy {
        label: "registry reset",
        commands: &[
            "npm config set registry https://registry.npmjs.org/",
            "npm install",
        ],
        rationale: "A stale or unreachable custom registry blocks package downloads",
    },
    InstallationStrategy {
        label: "clean reinstall",
        commands: &[REMOVE_INSTALL_STATE, "npm install"],
        rationale: "Half-installed node_modules or a stale lockfile can wedge the resolver",
    },
    InstallationStrategy {
        label: "legacy peer deps",
        commands: &["npm install --legacy-peer-deps"],
        rationale: "Peer dependency conflicts are tolerated by the legacy resolver",
    },
    InstallationStrategy {
        label: "force install",
        commands: &["npm install --force"],
        rationale: "Last resort: ignore conflicts and fetch everything again",
    },
];
