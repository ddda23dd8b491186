//! Project name validation
//!
//! Names become both the project directory and the `name` field of the
//! generated `package.json`, so they follow npm's rules for new packages.

/// Longest name npm accepts
const MAX_NAME_LENGTH: usize = 214;

/// Names npm refuses outright
const BLOCKED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

/// Node.js core module names, which would shadow the builtin
const CORE_MODULES: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Outcome of checking a candidate name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    Valid,
    /// Every rule the candidate breaks, in rule order
    Invalid(Vec<String>),
}

impl NameCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, NameCheck::Valid)
    }

    pub fn violations(&self) -> &[String] {
        match self {
            NameCheck::Valid => &[],
            NameCheck::Invalid(violations) => violations,
        }
    }
}

/// Check a candidate project name against npm's package naming rules
pub fn validate(candidate: &str) -> NameCheck {
    let mut violations = Vec::new();

    if candidate.is_empty() {
        violations.push("name length must be greater than zero".to_string());
        return NameCheck::Invalid(violations);
    }

    if candidate.starts_with('.') {
        violations.push("name cannot start with a period".to_string());
    }
    if candidate.starts_with('_') {
        violations.push("name cannot start with an underscore".to_string());
    }
    if candidate.trim() != candidate {
        violations.push("name cannot contain leading or trailing spaces".to_string());
    }

    let lowered = candidate.to_lowercase();
    if BLOCKED_NAMES.contains(&lowered.as_str()) {
        violations.push(format!("{} is a blocklisted name", candidate));
    }
    if CORE_MODULES.contains(&lowered.as_str()) {
        violations.push(format!("{} is a core module name", candidate));
    }

    if candidate.chars().count() > MAX_NAME_LENGTH {
        violations.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if lowered != candidate {
        violations.push("name can no longer contain capital letters".to_string());
    }
    if candidate.contains(['~', '\'', '!', '(', ')', '*']) {
        violations.push(
            "name can no longer contain special characters (\"~'!()*\")".to_string(),
        );
    }
    if !candidate.chars().all(is_url_safe) {
        violations.push("name can only contain URL-friendly characters".to_string());
    }

    if violations.is_empty() {
        NameCheck::Valid
    } else {
        NameCheck::Invalid(violations)
    }
}

/// Characters that survive URI component encoding unchanged
fn is_url_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}
