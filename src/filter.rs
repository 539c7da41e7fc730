use std::borrow::Cow;

use regex::{Regex, RegexBuilder};

use crate::entry::EntryKind;
use crate::error::ListError;

// ---------------------------------------------------------------------------
// TypeMask
// ---------------------------------------------------------------------------

/// The set of entry kinds eligible for inclusion.
///
/// An empty mask means "all kinds" — the unfiltered default.
///
/// # Example
///
/// ```rust
/// use dirlist::{EntryKind, TypeMask};
///
/// let mask = TypeMask::only(EntryKind::Regular).and(EntryKind::Symlink);
/// assert!(mask.contains(EntryKind::Regular));
/// assert!(!mask.contains(EntryKind::Directory));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeMask(u8);

impl TypeMask {
    /// The empty mask: every kind is eligible.
    pub fn all() -> Self {
        Self(0)
    }

    /// A mask containing exactly one kind.
    pub fn only(kind: EntryKind) -> Self {
        Self(bit(kind))
    }

    /// This mask with one more kind added.
    pub fn and(self, kind: EntryKind) -> Self {
        Self(self.0 | bit(kind))
    }

    /// Whether `kind` passes this mask.
    pub fn contains(self, kind: EntryKind) -> bool {
        self.0 == 0 || self.0 & bit(kind) != 0
    }
}

fn bit(kind: EntryKind) -> u8 {
    1 << kind as u8
}

// ---------------------------------------------------------------------------
// Name matching
// ---------------------------------------------------------------------------

/// Decides whether an entry's base name is a match.
///
/// The built-in implementation compiles the builder's pattern with the
/// `regex` crate; implement this to plug in custom matching logic —
/// globs, substring search, fuzzy matching, or anything else. Matchers
/// only ever see the base name, never the full path.
pub trait NameMatcher {
    /// Returns `true` if an entry with this base name should be included.
    fn is_match(&self, name: &str) -> bool;
}

/// Which pattern language the builder's pattern string is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternDialect {
    /// Full regular-expression syntax.
    #[default]
    Extended,

    /// POSIX-basic style: `+ ? | ( ) { }` match literally, and their
    /// backslash-escaped forms act as operators.
    Basic,
}

pub(crate) struct RegexMatcher(Regex);

impl NameMatcher for RegexMatcher {
    fn is_match(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

pub(crate) fn compile_pattern(
    pattern: &str,
    dialect: PatternDialect,
    case_sensitive: bool,
) -> Result<RegexMatcher, ListError> {
    let source = match dialect {
        PatternDialect::Extended => Cow::Borrowed(pattern),
        PatternDialect::Basic => Cow::Owned(basic_to_extended(pattern)),
    };

    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map(RegexMatcher)
        .map_err(|e| ListError::Pattern {
            pattern: pattern.to_owned(),
            source: e,
        })
}

/// Rewrite a basic-dialect pattern into extended syntax: the operators
/// that basic treats as ordinary characters get escaped, and the escaped
/// grouping/interval forms (`\(`, `\)`, `\{`, `\}`) lose their backslash.
fn basic_to_extended(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next @ ('(' | ')' | '{' | '}')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '+' | '?' | '|' | '(' | ')' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The combined inclusion test: type mask plus optional name pattern.
pub(crate) struct Filter {
    types: TypeMask,
    matcher: Option<Box<dyn NameMatcher>>,
}

impl Filter {
    pub(crate) fn new(types: TypeMask, matcher: Option<Box<dyn NameMatcher>>) -> Self {
        Self { types, matcher }
    }

    /// Whether an entry belongs in the result list. The pattern is applied
    /// to the base name only, never the full path.
    pub(crate) fn includes(&self, kind: EntryKind, name: &str) -> bool {
        self.types.contains(kind)
            && self.matcher.as_ref().map_or(true, |m| m.is_match(name))
    }
}

/// Whether an entry is eligible for descent. Independent of inclusion: a
/// directory can be walked without being listed, and nothing that isn't a
/// directory is ever walked.
pub(crate) fn descends(kind: EntryKind, depth_remaining: Option<usize>) -> bool {
    kind == EntryKind::Directory && depth_remaining != Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_admits_everything() {
        let f = Filter::new(TypeMask::all(), None);
        assert!(f.includes(EntryKind::Regular, "a"));
        assert!(f.includes(EntryKind::Directory, "a"));
        assert!(f.includes(EntryKind::Socket, "a"));
    }

    #[test]
    fn mask_restricts_kinds() {
        let f = Filter::new(TypeMask::only(EntryKind::Regular), None);
        assert!(f.includes(EntryKind::Regular, "a"));
        assert!(!f.includes(EntryKind::Directory, "a"));
    }

    #[test]
    fn pattern_applies_to_name() {
        let m = compile_pattern(r"\.txt$", PatternDialect::Extended, false).unwrap();
        let f = Filter::new(TypeMask::all(), Some(Box::new(m)));
        assert!(f.includes(EntryKind::Regular, "notes.txt"));
        assert!(f.includes(EntryKind::Regular, "NOTES.TXT"));
        assert!(!f.includes(EntryKind::Regular, "notes.md"));
    }

    #[test]
    fn case_sensitive_pattern() {
        let m = compile_pattern(r"\.txt$", PatternDialect::Extended, true).unwrap();
        assert!(m.is_match("notes.txt"));
        assert!(!m.is_match("NOTES.TXT"));
    }

    #[test]
    fn basic_dialect_takes_operators_literally() {
        let m = compile_pattern("a+b", PatternDialect::Basic, true).unwrap();
        assert!(m.is_match("a+b"));
        assert!(!m.is_match("aab"));

        let extended = compile_pattern("^a+b$", PatternDialect::Extended, true).unwrap();
        assert!(extended.is_match("aab"));
    }

    #[test]
    fn basic_dialect_escaped_parens_group() {
        let m = compile_pattern(r"\(ab\)\{2\}", PatternDialect::Basic, true).unwrap();
        assert!(m.is_match("abab"));
        assert!(!m.is_match("ab"));
    }

    #[test]
    fn malformed_pattern_is_reported() {
        assert!(compile_pattern("[", PatternDialect::Extended, false).is_err());
    }

    #[test]
    fn descent_needs_directory_and_depth() {
        assert!(descends(EntryKind::Directory, None));
        assert!(descends(EntryKind::Directory, Some(3)));
        assert!(!descends(EntryKind::Directory, Some(0)));
        assert!(!descends(EntryKind::Regular, None));
        assert!(!descends(EntryKind::Symlink, Some(3)));
    }
}
