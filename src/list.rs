use std::time::Duration;

use crate::compare::SortMethod;
use crate::error::ListError;

/// A list starts with room for this many entries and doubles from there.
const INITIAL_LIST_SIZE: usize = 512;

/// Default hard ceiling on a list's length. Override per call with
/// [`max_entries`](crate::ListBuilder::max_entries).
pub const DEFAULT_MAX_LIST_SIZE: usize = 1 << 20;

/// Marker returned by [`FileList::push`] when the hard ceiling is reached.
pub(crate) struct SizeLimitReached;

/// The output of a completed walk: an owned, optionally sorted list of
/// path strings.
///
/// A list remembers whether it is complete: when the walk hit the
/// configured entry ceiling, [`is_truncated`](FileList::is_truncated)
/// returns `true` and the collected prefix is still valid — partial
/// success is distinct from both full success and failure.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    entries: Vec<String>,
    capacity: usize,
    hard_max: usize,
    truncated: bool,
    stats: WalkStats,
}

/// Bookkeeping from the walk that produced a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkStats {
    /// Raw entries enumerated, whether or not they were included.
    pub seen: usize,

    /// Directories opened for enumeration.
    pub dirs: usize,

    /// Entries dropped for recoverable reasons (stat failures, unreadable
    /// directories, the size ceiling).
    pub skipped: usize,

    /// Wall-clock time of the walk.
    pub duration: Duration,
}

impl FileList {
    /// An empty list with the default ceiling. Useful as a merge target.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_LIST_SIZE)
    }

    pub(crate) fn with_limit(hard_max: usize) -> Self {
        let capacity = INITIAL_LIST_SIZE.min(hard_max);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            hard_max,
            truncated: false,
            stats: WalkStats::default(),
        }
    }

    /// Append a path, doubling the backing storage as needed up to the
    /// hard ceiling. At the ceiling the path is dropped, the list is
    /// marked truncated, and the caller gets a size-limit signal; already
    /// collected entries stay valid.
    pub(crate) fn push(&mut self, path: String) -> Result<(), SizeLimitReached> {
        if self.entries.len() == self.capacity {
            if self.capacity >= self.hard_max {
                self.truncated = true;
                return Err(SizeLimitReached);
            }
            let grown = self.capacity.saturating_mul(2).min(self.hard_max);
            self.entries.reserve_exact(grown - self.entries.len());
            self.capacity = grown;
        }

        self.entries.push(path);
        Ok(())
    }

    /// Release the growth slack once the walk is over.
    pub(crate) fn finish(&mut self, stats: WalkStats) {
        self.entries.shrink_to_fit();
        self.capacity = self.entries.len();
        self.stats = stats;
    }

    /// Number of collected paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the walk hit the entry ceiling and stopped retaining paths.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Bookkeeping from the walk that produced this list.
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// Consume the list, keeping only the paths.
    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }

    /// Re-order the entries with the chosen method. `SortMethod::None`
    /// leaves the list untouched. Sorting is stable, so re-sorting an
    /// already sorted list never changes it.
    pub fn sort(&mut self, method: SortMethod) {
        if method == SortMethod::None {
            return;
        }
        self.entries.sort_by(|a, b| method.compare_paths(a, b));
    }

    /// Append another list's entries to this one, moving the strings
    /// rather than copying them, and re-sort the combined list in
    /// [`SortMethod::Default`] order unless `sort` is `None`.
    ///
    /// The combined length is overflow-checked before anything is moved:
    /// on error this list is left completely unmodified. Returns the new
    /// length.
    pub fn merge(&mut self, source: FileList, sort: SortMethod) -> Result<usize, ListError> {
        let combined = self
            .entries
            .len()
            .checked_add(source.entries.len())
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(ListError::CountOverflow)?;

        self.entries.reserve_exact(source.entries.len());
        self.entries.extend(source.entries);
        self.capacity = self.capacity.max(combined);
        self.truncated |= source.truncated;

        if sort != SortMethod::None {
            self.entries
                .sort_by(|a, b| SortMethod::Default.compare_paths(a, b));
        }

        Ok(combined)
    }
}

/// Build a list directly from existing paths, e.g. as a merge source.
impl From<Vec<String>> for FileList {
    fn from(entries: Vec<String>) -> Self {
        let capacity = entries.len();
        Self {
            entries,
            capacity,
            hard_max: DEFAULT_MAX_LIST_SIZE.max(capacity),
            truncated: false,
            stats: WalkStats::default(),
        }
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for FileList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(paths: &[&str]) -> FileList {
        FileList::from(paths.iter().map(|p| p.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn push_honors_hard_ceiling() {
        let mut list = FileList::with_limit(2);
        assert!(list.push("x/a".into()).is_ok());
        assert!(list.push("x/b".into()).is_ok());
        assert!(list.push("x/c".into()).is_err());
        assert!(list.push("x/d".into()).is_err());

        assert_eq!(list.len(), 2);
        assert!(list.is_truncated());
        assert_eq!(list.as_slice(), &["x/a".to_string(), "x/b".to_string()]);
    }

    #[test]
    fn growth_doubles_up_to_ceiling() {
        let mut list = FileList::with_limit(600);
        for i in 0..600 {
            assert!(list.push(format!("x/{i}")).is_ok());
        }
        assert!(list.push("x/one-more".into()).is_err());
        assert_eq!(list.len(), 600);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut list = list_of(&["b/a", "a/z", "a/b", "x/File", "x/file"]);
        list.sort(SortMethod::Default);
        let once = list.as_slice().to_vec();
        list.sort(SortMethod::Default);
        assert_eq!(list.as_slice(), once.as_slice());
    }

    #[test]
    fn sort_none_preserves_order() {
        let mut list = list_of(&["b/a", "a/z"]);
        list.sort(SortMethod::None);
        assert_eq!(list.as_slice(), &["b/a".to_string(), "a/z".to_string()]);
    }

    #[test]
    fn merge_appends_and_counts() {
        let mut dest = list_of(&["d/a", "d/b"]);
        let source = list_of(&["s/x", "s/y", "s/z"]);

        let n = dest.merge(source, SortMethod::None).unwrap();
        assert_eq!(n, 5);
        assert_eq!(dest.len(), 5);
        assert_eq!(dest.as_slice()[2], "s/x");
    }

    #[test]
    fn merge_into_empty_equals_source() {
        let mut dest = FileList::new();
        let source = list_of(&["s/b", "s/a"]);
        dest.merge(source, SortMethod::None).unwrap();
        assert_eq!(dest.as_slice(), &["s/b".to_string(), "s/a".to_string()]);
    }

    #[test]
    fn merge_resorts_in_default_order() {
        // Any non-None method re-sorts with the Default comparator: a
        // Natural request still yields lexicographic digit order.
        let mut dest = list_of(&["x/file10"]);
        let source = list_of(&["x/file2"]);
        dest.merge(source, SortMethod::Natural).unwrap();
        assert_eq!(
            dest.as_slice(),
            &["x/file10".to_string(), "x/file2".to_string()]
        );
    }

    #[test]
    fn merge_propagates_truncation() {
        let mut truncated = FileList::with_limit(1);
        truncated.push("x/a".into()).ok();
        assert!(truncated.push("x/b".into()).is_err());

        let mut dest = FileList::new();
        dest.merge(truncated, SortMethod::None).unwrap();
        assert!(dest.is_truncated());
    }
}
