use std::fs;
use std::io;

use tracing::{debug, warn};

use crate::entry::{classify, EntryKind, Identity};
use crate::error::ListError;
use crate::filter::{descends, Filter};
use crate::list::{FileList, WalkStats};
use crate::path::{join_path, SEPARATOR};

/// Levels of descent past which the walk refuses to recurse, so a
/// pathologically deep (or deliberately crafted) tree cannot exhaust the
/// call stack. Skipping the descent is recoverable, like an unreadable
/// directory.
const MAX_WALK_DEPTH: usize = 4096;

// ---------------------------------------------------------------------------
// AncestryStack
// ---------------------------------------------------------------------------

/// The identities of the directories currently being descended into, root
/// first. An identity is pushed immediately before recursing into its
/// directory and popped immediately after — strict LIFO, never a
/// historical set — so `contains` asks exactly "is this candidate one of
/// my own ancestors?", which is the definition of a cycle.
pub(crate) struct AncestryStack {
    frames: Vec<Identity>,
}

impl AncestryStack {
    pub(crate) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub(crate) fn push(&mut self, identity: Identity) {
        self.frames.push(identity);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Linear scan over the chain; its length is the current depth.
    pub(crate) fn contains(&self, identity: Identity) -> bool {
        self.frames.iter().any(|frame| *frame == identity)
    }

    /// Device of the traversal root, the reference point for the
    /// stay-on-device policy.
    pub(crate) fn root_device(&self) -> Option<u64> {
        self.frames.first().map(|frame| frame.device)
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

// ---------------------------------------------------------------------------
// Walk options and context
// ---------------------------------------------------------------------------

/// Traversal switches passed from the builder to the engine.
pub(crate) struct WalkOptions {
    pub follow_symlinks: bool,
    pub trailing_slash: bool,
    pub same_file_system: bool,
}

/// Mutable state threaded through one traversal call.
pub(crate) struct WalkContext<'a> {
    pub filter: &'a Filter,
    pub options: &'a WalkOptions,
    pub list: &'a mut FileList,
    pub ancestry: AncestryStack,
    pub stats: WalkStats,
}

// ---------------------------------------------------------------------------
// walk()
// ---------------------------------------------------------------------------

/// Recursively enumerate `dir`, appending eligible paths to the context's
/// list. One level of recursion per directory level; the `read_dir`
/// handle for each level is dropped before its call returns.
///
/// `depth` is the remaining descent allowance: `None` is unlimited,
/// `Some(0)` forbids descending further. A permission error opening `dir`
/// makes it count as empty; any other open failure is fatal.
pub(crate) fn walk(
    ctx: &mut WalkContext<'_>,
    dir: &str,
    depth: Option<usize>,
) -> Result<(), ListError> {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(dir, "unreadable directory, treating as empty");
            ctx.stats.skipped += 1;
            return Ok(());
        }
        Err(e) => {
            return Err(ListError::Io {
                path: dir.to_owned(),
                source: e,
            })
        }
    };
    ctx.stats.dirs += 1;

    for raw in reader {
        let entry = match raw {
            Ok(entry) => entry,
            Err(e) => {
                debug!(dir, error = %e, "skipping unreadable entry");
                ctx.stats.skipped += 1;
                continue;
            }
        };

        ctx.stats.seen += 1;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = join_path(dir, &name);

        let Some((kind, identity)) = classify(&entry, &path, ctx.options.follow_symlinks)
        else {
            ctx.stats.skipped += 1;
            continue;
        };

        // Directories always carry an identity; classify stats them.
        if let Some(identity) = identity.filter(|_| descends(kind, depth)) {
            if let Some(blocked) = descent_block(ctx, identity, &path) {
                debug!(path = %path, reason = blocked, "not descending");
            } else {
                ctx.ancestry.push(identity);
                let outcome = walk(ctx, &path, depth.map(|d| d - 1));
                ctx.ancestry.pop();
                outcome?;
            }
        }

        if ctx.filter.includes(kind, &name) {
            let mut listed = path;
            if kind == EntryKind::Directory && ctx.options.trailing_slash {
                listed.push(SEPARATOR);
            }

            let was_truncated = ctx.list.is_truncated();
            if ctx.list.push(listed).is_err() {
                ctx.stats.skipped += 1;
                if !was_truncated {
                    warn!(dir, "entry ceiling reached, further paths are dropped");
                }
            }
        }
    }

    Ok(())
}

/// Why a directory that is otherwise eligible for descent must not be
/// entered: it is one of its own ancestors (a cycle), it lives on another
/// device while the stay-on-device policy is active, or the walk is at
/// the recursion guard.
fn descent_block(
    ctx: &WalkContext<'_>,
    identity: Identity,
    path: &str,
) -> Option<&'static str> {
    if ctx.ancestry.contains(identity) {
        return Some("directory cycle");
    }
    if ctx.options.same_file_system && ctx.ancestry.root_device() != Some(identity.device) {
        return Some("different file system");
    }
    if ctx.ancestry.depth() >= MAX_WALK_DEPTH {
        warn!(path, "recursion guard reached");
        return Some("recursion guard");
    }
    None
}
