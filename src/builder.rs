use std::fs;
use std::time::Instant;

use crate::compare::SortMethod;
use crate::engine::{walk, AncestryStack, WalkContext, WalkOptions};
use crate::entry::Identity;
use crate::error::ListError;
use crate::filter::{compile_pattern, Filter, NameMatcher, PatternDialect, TypeMask};
use crate::list::{FileList, WalkStats, DEFAULT_MAX_LIST_SIZE};
use crate::path::clean_dir;

// ---------------------------------------------------------------------------
// ListBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and building a file list.
///
/// Created via [`dirlist::list()`](crate::list()). Configure with chained
/// builder methods, then call [`run()`](ListBuilder::run) to walk the tree.
///
/// # Example
///
/// ```rust,ignore
/// let files = dirlist::list("/var/log")
///     .types(TypeMask::only(EntryKind::Regular))
///     .pattern(r"\.log$")
///     .max_depth(2)
///     .sort(SortMethod::Natural)
///     .run()?;
/// ```
pub struct ListBuilder {
    root:             String,
    types:            TypeMask,
    pattern:          Option<String>,
    matcher:          Option<Box<dyn NameMatcher>>,
    dialect:          PatternDialect,
    case_sensitive:   bool,
    depth:            Option<usize>,
    follow_symlinks:  bool,
    trailing_slash:   bool,
    same_file_system: bool,
    sort:             SortMethod,
    max_entries:      usize,
}

impl ListBuilder {
    pub(crate) fn new(root: String) -> Self {
        Self {
            root,
            types:            TypeMask::all(),
            pattern:          None,
            matcher:          None,
            dialect:          PatternDialect::default(),
            case_sensitive:   false,
            depth:            None,
            follow_symlinks:  false,
            trailing_slash:   false,
            same_file_system: false,
            sort:             SortMethod::None,
            max_entries:      DEFAULT_MAX_LIST_SIZE,
        }
    }

    // ── Filtering ─────────────────────────────────────────────────────────

    /// Restrict results to these entry kinds. The empty mask (the
    /// default) admits every kind.
    pub fn types(mut self, types: TypeMask) -> Self {
        self.types = types;
        self
    }

    /// Keep only entries whose base name matches this pattern. The
    /// pattern is compiled when [`run()`](ListBuilder::run) starts, before
    /// anything is walked; it never sees the rest of the path.
    ///
    /// For custom matching logic, use `.with_matcher()` instead.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set a custom name matcher.
    ///
    /// Any type implementing [`NameMatcher`] is accepted — globs,
    /// substring search, extension sets, anything that can judge a base
    /// name. Takes precedence over `.pattern()`.
    pub fn with_matcher(mut self, m: impl NameMatcher + 'static) -> Self {
        self.matcher = Some(Box::new(m));
        self
    }

    /// Which pattern language `.pattern()` is written in. Extended by
    /// default.
    pub fn dialect(mut self, dialect: PatternDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Match the pattern case-sensitively. Off by default.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Descend at most `levels` below the start directory. `0` lists the
    /// start directory's own entries without recursing. Unlimited by
    /// default.
    pub fn max_depth(mut self, levels: usize) -> Self {
        self.depth = Some(levels);
        self
    }

    /// Resolve symlinks to their targets, descending into symlinked
    /// directories. Cycle detection keeps self-referential trees finite.
    /// Off by default: symlinks are reported as symlinks and never
    /// entered.
    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.follow_symlinks = yes;
        self
    }

    /// Suffix listed directories with a `/`. Off by default.
    pub fn trailing_slash(mut self, yes: bool) -> Self {
        self.trailing_slash = yes;
        self
    }

    /// Don't descend into directories on a different device than the
    /// start directory (mount points). Off by default.
    pub fn same_file_system(mut self, yes: bool) -> Self {
        self.same_file_system = yes;
        self
    }

    // ── Output ────────────────────────────────────────────────────────────

    /// How the finished list is ordered. `SortMethod::None` (the default)
    /// leaves entries in enumeration order.
    pub fn sort(mut self, method: SortMethod) -> Self {
        self.sort = method;
        self
    }

    /// Hard ceiling on the list's length. When the walk produces more
    /// eligible entries than this, the result is truncated — see
    /// [`FileList::is_truncated`] — rather than failing.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Walk the tree and return the list.
    ///
    /// # Errors
    ///
    /// Fails for a malformed pattern (before anything is walked), a
    /// missing or non-directory start path, or an I/O error other than
    /// permission-denied while enumerating. Recoverable conditions —
    /// unreadable subdirectories, entries that vanish mid-walk, the entry
    /// ceiling — never fail the call; they show up as omitted entries and
    /// in [`FileList::stats`].
    pub fn run(self) -> Result<FileList, ListError> {
        let root = clean_dir(&self.root).ok_or(ListError::InvalidRoot(self.root))?;

        let matcher = match (self.matcher, &self.pattern) {
            (Some(m), _) => Some(m),
            (None, Some(p)) => {
                let compiled = compile_pattern(p, self.dialect, self.case_sensitive)?;
                Some(Box::new(compiled) as Box<dyn NameMatcher>)
            }
            (None, None) => None,
        };
        let filter = Filter::new(self.types, matcher);

        let metadata = fs::metadata(&root).map_err(|e| ListError::Io {
            path: root.clone(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(ListError::InvalidRoot(root));
        }

        let options = WalkOptions {
            follow_symlinks:  self.follow_symlinks,
            trailing_slash:   self.trailing_slash,
            same_file_system: self.same_file_system,
        };

        // The root's own identity goes on the stack first, so a link back
        // to the root is caught like any other cycle.
        let mut ancestry = AncestryStack::new();
        ancestry.push(Identity::of(&metadata));

        let mut list = FileList::with_limit(self.max_entries);
        let mut ctx = WalkContext {
            filter: &filter,
            options: &options,
            list: &mut list,
            ancestry,
            stats: WalkStats::default(),
        };

        let started = Instant::now();
        walk(&mut ctx, &root, self.depth)?;
        let mut stats = ctx.stats;
        stats.duration = started.elapsed();

        list.finish(stats);
        list.sort(self.sort);
        Ok(list)
    }
}
