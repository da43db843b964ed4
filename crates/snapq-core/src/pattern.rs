//! Simple glob matching for snapshot, repository and policy names.
//!
//! Only `*` is a wildcard. Every other character, including the ones glob
//! would normally treat as meta characters, matches literally.

use glob::Pattern;

use crate::errors::{ExError, ExErrorKind, Result};

/// Selects every snapshot or repository
pub const ALL_PATTERN: &str = "_all";

/// Selects the snapshots currently being written
pub const CURRENT_SNAPSHOT: &str = "_current";

/// Matches snapshots that were not created by a policy
pub const NO_POLICY_PATTERN: &str = "_none";

/// Whether `s` contains a wildcard
pub fn is_simple_match_pattern(s: &str) -> bool {
    s.contains('*')
}

/// Empty list, a lone `_all`, or a lone `*`
pub fn is_match_all(patterns: &[String]) -> bool {
    match patterns {
        [] => true,
        [only] => only.eq_ignore_ascii_case(ALL_PATTERN) || only == "*",
        _ => false,
    }
}

/// `true` for a lone `_current` token
pub fn is_current_only(patterns: &[String]) -> bool {
    matches!(patterns, [only] if only.eq_ignore_ascii_case(CURRENT_SNAPSHOT))
}

/// Split a token list into include and exclude patterns.
///
/// A `-pattern` token is an exclusion only once a wildcard token has been
/// seen earlier in the list; before that it is a literal include. Tokens for
/// which `marks_broad_match` returns true also enable exclusions.
pub fn split_includes_excludes<'a>(
    tokens: &'a [String],
    marks_broad_match: impl Fn(&str) -> bool,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();
    let mut seen_wildcard = false;
    for token in tokens {
        if seen_wildcard && token.len() > 1 && token.starts_with('-') {
            excludes.push(&token[1..]);
        } else {
            if is_simple_match_pattern(token) || marks_broad_match(token) {
                seen_wildcard = true;
            }
            includes.push(token.as_str());
        }
    }
    (includes, excludes)
}

/// A compiled set of `*` patterns
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile the given patterns
    ///
    /// # Errors
    ///
    /// `InvalidInput` if glob rejects a pattern (not expected after escaping).
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(&to_glob(p.as_ref())).map_err(|e| {
                    ExError::new(ExErrorKind::InvalidInput)
                        .with_op("pattern_compile")
                        .with_message(format!("invalid pattern '{}': {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Matches if any pattern matches; an empty set matches nothing
    pub fn is_match(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Escape everything but `*` and collapse runs of `*`, which glob would
/// otherwise read as a recursive `**`.
fn to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut last_was_star = false;
    for (i, piece) in pattern.split('*').enumerate() {
        if i > 0 && !last_was_star {
            out.push('*');
        }
        last_was_star = piece.is_empty() && i > 0;
        if !piece.is_empty() {
            out.push_str(&Pattern::escape(piece));
        }
    }
    out
}
