//! Gitignore-style path filtering
//!
//! Rules are evaluated in order and the last matching rule decides whether
//! a path is included. A rule prefixed with `!` re-includes what earlier
//! rules excluded. A path that no rule matches is included.
//!
//! Matching follows gitignore conventions:
//!
//! - a rule without a `/` (other than a trailing one) matches at any depth
//! - a rule with a leading or interior `/` is anchored at the tree root
//! - a trailing `/` restricts the rule to directories
//! - a rule matching a directory also matches everything beneath it
//!
//! The last point makes `["**", "!foo/"]` include `foo/bar.txt`. Like git,
//! a file cannot be re-included once a walker has skipped its parent.

use ccm_meta::IgnoreRuleSet;
use globset::{GlobBuilder, GlobMatcher};

use crate::{Error, Result};

#[derive(Debug, Clone)]
struct Rule {
    glob: GlobMatcher,
    negated: bool,
    dir_only: bool,
}

impl Rule {
    /// Parse one rule line. Blank lines and comments yield `None`.
    fn parse(raw: &str) -> Result<Option<Self>> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let body = match body.strip_prefix('\\') {
            Some(rest) if rest.starts_with('!') || rest.starts_with('#') => rest,
            _ => body,
        };
        let (dir_only, body) = match body.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        let anchored = body.contains('/');
        let body = body.strip_prefix('/').unwrap_or(body);
        if body.is_empty() {
            return Ok(None);
        }

        let pattern = if anchored || body.starts_with("**") {
            body.to_string()
        } else {
            format!("**/{body}")
        };

        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| Error::InvalidRule {
                rule: raw.to_string(),
                message: e.kind().to_string(),
            })?
            .compile_matcher();

        Ok(Some(Self {
            glob,
            negated,
            dir_only,
        }))
    }

    fn matches(&self, path: &str, is_dir: bool) -> bool {
        let ancestor_matches = path
            .match_indices('/')
            .any(|(idx, _)| self.glob.is_match(&path[..idx]));
        if ancestor_matches {
            return true;
        }
        (is_dir || !self.dir_only) && self.glob.is_match(path)
    }
}

/// Compiled, ordered ignore rules for one CLI.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    rules: Vec<Rule>,
}

impl PatternMatcher {
    /// Compile global rules followed by per-CLI rules.
    pub fn compile<G, P>(global: &[G], per_cli: &[P]) -> Result<Self>
    where
        G: AsRef<str>,
        P: AsRef<str>,
    {
        let lines = global
            .iter()
            .map(AsRef::as_ref)
            .chain(per_cli.iter().map(AsRef::as_ref));

        let mut rules = Vec::new();
        for line in lines {
            if let Some(rule) = Rule::parse(line)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    /// Compile the rules that apply to `cli_key` from a settings rule set.
    pub fn for_cli(cli_key: &str, rule_set: &IgnoreRuleSet) -> Result<Self> {
        Self::compile(rule_set.global.as_slice(), rule_set.per_cli_rules(cli_key))
    }

    /// A matcher that includes every path.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Number of effective rules (comments and blanks excluded).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `relative_path` is included. `\` is accepted as a separator.
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        let path = normalize(relative_path);
        if path.is_empty() {
            return true;
        }

        let mut included = true;
        for rule in &self.rules {
            if rule.matches(&path, is_dir) {
                included = rule.negated;
            }
        }
        included
    }

    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        !self.matches(relative_path, is_dir)
    }
}

fn normalize(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}
