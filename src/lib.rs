//! # dirlist
//!
//! Deterministic, hierarchically sorted file lists — recursive, filterable,
//! embeddable.
//!
//! dirlist walks a directory tree and returns an owned, stably ordered list
//! of path strings. It exists for callers — CLIs, indexers, backup tools —
//! that need the *same* snapshot of a subtree every time, independent of
//! the unordered enumeration order the OS happens to produce. The walk is
//! synchronous and depth-first, detects symlink cycles by (device, inode)
//! identity, can stay on one filesystem, limits recursion depth, filters by
//! entry kind and base-name pattern, and caps the result size with a
//! distinguished partial-success outcome instead of an error.
//!
//! # Quick Start
//!
//! ```rust
//! use dirlist::{EntryKind, SortMethod, TypeMask};
//!
//! let files = dirlist::list(env!("CARGO_MANIFEST_DIR"))
//!     .types(TypeMask::only(EntryKind::Regular))
//!     .pattern(r"\.rs$")
//!     .sort(SortMethod::Natural)
//!     .run()
//!     .unwrap();
//!
//! assert!(!files.is_empty());
//! assert!(files.iter().all(|p| p.ends_with(".rs")));
//! ```
//!
//! # Ordering
//!
//! Four total orders are available ([`SortMethod`]). All of them compare
//! the directory part of a path before its base name, so entries group by
//! containing directory. `Natural` additionally compares digit runs by
//! numeric value: `file2` sorts before `file10`, and `file02` before
//! `file2`.
//!
//! # Custom matchers
//!
//! Implement [`NameMatcher`] for matching logic beyond regular
//! expressions:
//!
//! ```rust
//! use dirlist::NameMatcher;
//!
//! struct ExtensionMatcher(String);
//!
//! impl NameMatcher for ExtensionMatcher {
//!     fn is_match(&self, name: &str) -> bool {
//!         name.rsplit('.').next().map(|e| e.eq_ignore_ascii_case(&self.0)).unwrap_or(false)
//!     }
//! }
//! ```
//!
//! # Scope
//!
//! Paths are `String`s with `/` separators; names that aren't valid UTF-8
//! are converted lossily. The walk is single-threaded by design — the
//! point is a stable snapshot, not raw throughput. Recoverable conditions
//! (unreadable subdirectories, entries deleted mid-walk) are skipped and
//! reported through `tracing`, never as errors.

#![deny(unsafe_code)]

mod builder;
mod compare;
mod engine;
mod entry;
mod error;
mod filter;
mod list;
mod path;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::ListBuilder;
pub use compare::SortMethod;
pub use entry::EntryKind;
pub use error::ListError;
pub use filter::{NameMatcher, PatternDialect, TypeMask};
pub use list::{FileList, WalkStats, DEFAULT_MAX_LIST_SIZE};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`ListBuilder`] rooted at `dir`.
///
/// Repeated and trailing separators in `dir` are cleaned up before the
/// walk; the cleaned prefix is what every returned path starts with.
///
/// # Example
///
/// ```rust
/// use dirlist::SortMethod;
///
/// let list = dirlist::list(env!("CARGO_MANIFEST_DIR"))
///     .max_depth(0)
///     .sort(SortMethod::Default)
///     .run()
///     .unwrap();
///
/// assert!(list.iter().any(|p| p.ends_with("Cargo.toml")));
/// ```
pub fn list(dir: impl Into<String>) -> ListBuilder {
    ListBuilder::new(dir.into())
}
