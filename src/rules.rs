//! Rename rules and the content rewriter that applies them.
//!
//! All rules are compiled into one alternation so each position of a file is
//! matched at most once. A replacement can therefore never be picked up again
//! by another rule, whatever order the rules were declared in.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use regex::bytes::{Captures, Regex};

use crate::error::{Error, Result};
use crate::tree::{is_binary, VirtualTree};

/// What a placeholder token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Package,
    JniPackage,
    CodeIdentifier,
    DisplayName,
    Port,
    Version,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RuleKind::Package => "package",
            RuleKind::JniPackage => "jni package",
            RuleKind::CodeIdentifier => "code identifier",
            RuleKind::DisplayName => "display name",
            RuleKind::Port => "port",
            RuleKind::Version => "version",
        };
        write!(f, "{}", name)
    }
}

/// Replaces every literal occurrence of `token` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    pub kind: RuleKind,
    pub token: String,
    pub replacement: String,
}

/// Ordered collection of rename rules.
///
/// Rules are kept in the order package, JNI package, code identifier, display name,
/// port, version regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<RenameRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Empty tokens and identity rules are ignored.
    ///
    /// # Errors
    /// * `Error::ConfigError` if another rule already uses the same token with a
    ///   different replacement
    pub fn add<T: Into<String>, R: Into<String>>(
        &mut self,
        kind: RuleKind,
        token: T,
        replacement: R,
    ) -> Result<()> {
        let token = token.into();
        let replacement = replacement.into();
        if token.is_empty() || token == replacement {
            debug!("Skipping {} rule for '{}'", kind, token);
            return Ok(());
        }
        if let Some(existing) = self.rules.iter().find(|r| r.token == token) {
            if existing.replacement != replacement {
                return Err(Error::ConfigError(format!(
                    "placeholder '{}' is used by both the {} and the {} rule",
                    token, existing.kind, kind
                )));
            }
            return Ok(());
        }
        self.rules.push(RenameRule { kind, token, replacement });
        self.rules.sort_by_key(|rule| rule.kind as u8);
        Ok(())
    }

    pub fn rules(&self) -> &[RenameRule] {
        &self.rules
    }

    pub fn get(&self, kind: RuleKind) -> Option<&RenameRule> {
        self.rules.iter().find(|rule| rule.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Logs a warning for every replacement that contains another rule's token.
    ///
    /// Such values are left alone by the single-pass rewriter, but the generated
    /// project will still contain the placeholder text.
    pub fn warn_on_overlaps(&self) {
        for rule in &self.rules {
            for other in &self.rules {
                if rule.replacement.contains(&other.token) {
                    warn!(
                        "{} value '{}' contains the {} placeholder '{}'",
                        rule.kind, rule.replacement, other.kind, other.token
                    );
                }
            }
        }
    }
}

/// Counters reported by [`ContentRewriter::rewrite_tree`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    pub files_changed: usize,
    pub substitutions: usize,
    pub binaries_skipped: usize,
}

/// Applies a [`RuleSet`] to file contents in one pass.
pub struct ContentRewriter {
    pattern: Option<Regex>,
    replacements: HashMap<Vec<u8>, Vec<u8>>,
}

impl ContentRewriter {
    /// Compiles the rules into a single alternation, longest token first so that
    /// a token that contains another one wins at the same position.
    pub fn new(rules: &RuleSet) -> Result<Self> {
        let mut ordered: Vec<&RenameRule> = rules.rules().iter().collect();
        ordered.sort_by(|a, b| b.token.len().cmp(&a.token.len()));

        let pattern = if ordered.is_empty() {
            None
        } else {
            let alternation = ordered
                .iter()
                .map(|rule| regex::escape(&rule.token))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        let replacements = ordered
            .iter()
            .map(|rule| (rule.token.as_bytes().to_vec(), rule.replacement.as_bytes().to_vec()))
            .collect();

        Ok(Self { pattern, replacements })
    }

    /// Rewrites `contents`, returning the new bytes and the number of substitutions,
    /// or `None` when nothing matched.
    pub fn rewrite(&self, contents: &[u8]) -> Option<(Vec<u8>, usize)> {
        let pattern = self.pattern.as_ref()?;
        let count = pattern.find_iter(contents).count();
        if count == 0 {
            return None;
        }
        let rewritten = pattern.replace_all(contents, |caps: &Captures| {
            self.replacements.get(&caps[0]).cloned().unwrap_or_else(|| caps[0].to_vec())
        });
        Some((rewritten.into_owned(), count))
    }

    /// Rewrites a single string.
    pub fn rewrite_str(&self, text: &str) -> String {
        match self.rewrite(text.as_bytes()) {
            Some((bytes, _)) => String::from_utf8(bytes).unwrap_or_else(|_| text.to_string()),
            None => text.to_string(),
        }
    }

    /// Rewrites every text file of `tree`. Binary files are left untouched.
    pub fn rewrite_tree(&self, tree: &mut VirtualTree) -> RewriteStats {
        let mut stats = RewriteStats::default();
        for (path, contents) in tree.files_mut() {
            if is_binary(Path::new(path), contents) {
                debug!("Not rewriting binary file '{}'", path.display());
                stats.binaries_skipped += 1;
                continue;
            }
            if let Some((rewritten, count)) = self.rewrite(contents) {
                debug!("Rewrote {} placeholder(s) in '{}'", count, path.display());
                *contents = rewritten;
                stats.files_changed += 1;
                stats.substitutions += count;
            }
        }
        stats
    }
}
