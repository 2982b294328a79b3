//! Default settings
//!
//! The default rule set denies everything, then re-includes the
//! directories and files worth tracking, then excludes scratch areas
//! that may live inside them.

/// Rules that ship with a fresh workspace.
const DEFAULT_GLOBAL_RULES: &[&str] = &[
    "# 1. ignore everything by default",
    "**",
    "# 2. re-include tracked directories",
    "!agents/",
    "!agents/**",
    "!commands/",
    "!commands/**",
    "!plugins/",
    "!plugins/**",
    "!skills/",
    "!skills/**",
    "!prompts/",
    "!prompts/**",
    "# 3. re-include tracked files",
    "!auth.json",
    "!settings.json",
    "!config.toml",
    "!CLAUDE.md",
    "# 4. always ignore logs, caches and working directories",
    "**/*.log",
    "**/.DS_Store",
    "**/Thumbs.db",
    "**/tmp/",
    "**/bin/",
    "**/todos/",
    "**/backup/",
    "**/cache/",
    "**/debug/",
    "**/downloads/",
    "**/file-history/",
    "**/ide/",
    "**/plans/",
    "**/projects/",
    "**/session-env/",
    "**/shell-snapshots/",
    "**/statsig/",
    "**/telemetry/",
];

/// The default global ignore rules, in order.
pub fn default_global_rules() -> Vec<String> {
    DEFAULT_GLOBAL_RULES.iter().map(|r| r.to_string()).collect()
}
