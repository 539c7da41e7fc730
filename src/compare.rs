//! Path-aware total orders used to sort a finished list.
//!
//! Every method first compares the directory parts of the two paths (the
//! text before the last separator), and compares base names only on a tie.
//! Entries therefore group by containing directory regardless of the order
//! the filesystem produced them in.
//!
//! The `Default` and `Natural` orders are byte-oriented with ASCII case
//! folding. `Collate` delegates to the platform locale via `strcoll`, and
//! `Ascii` is plain byte order.

use std::cmp::Ordering;

use crate::path::SEPARATOR;

/// How a finished list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMethod {
    /// Leave entries in enumeration order.
    None,

    /// Case-insensitive alphabetical order; on a pure case tie the
    /// lowercase variant sorts first.
    #[default]
    Default,

    /// Like `Default`, but runs of digits compare by numeric value, so
    /// `file2` sorts before `file10`.
    Natural,

    /// The platform's locale-aware collation order.
    Collate,

    /// Raw byte order, no case folding. Fastest, least intuitive.
    Ascii,
}

impl SortMethod {
    /// Compare two full paths: directory part first, then base name.
    pub(crate) fn compare_paths(self, a: &str, b: &str) -> Ordering {
        let (dir_a, base_a) = split_at_last_separator(a);
        let (dir_b, base_b) = split_at_last_separator(b);

        match self.compare_text(dir_a, dir_b) {
            Ordering::Equal => self.compare_text(base_a, base_b),
            other => other,
        }
    }

    fn compare_text(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::Default => cmp_default(a.as_bytes(), b.as_bytes()),
            Self::Natural => cmp_natural(a.as_bytes(), b.as_bytes()),
            Self::Collate => cmp_collate(a, b),
            Self::Ascii => a.as_bytes().cmp(b.as_bytes()),
        }
    }
}

fn split_at_last_separator(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(pos) => (&path[..pos], &path[pos + 1..]),
        None => ("", path),
    }
}

/// Case-insensitive byte order. A case-only mismatch records a lowercase-
/// first preference the first time it is seen; that preference decides the
/// comparison only when no real difference exists anywhere in the strings.
/// A string sorts before any string it is a prefix of.
fn cmp_default(a: &[u8], b: &[u8]) -> Ordering {
    let mut tie = Ordering::Equal;
    let common = a.len().min(b.len());

    for i in 0..common {
        let (x, y) = (a[i], b[i]);
        if x == y {
            continue;
        }
        let (lx, ly) = (x.to_ascii_lowercase(), y.to_ascii_lowercase());
        if lx == ly {
            if tie == Ordering::Equal {
                tie = y.cmp(&x); // lowercase before uppercase
            }
        } else {
            return lx.cmp(&ly);
        }
    }

    match a.len().cmp(&b.len()) {
        Ordering::Equal => tie,
        shorter_first => shorter_first,
    }
}

/// `cmp_default` extended with numeric comparison of digit runs.
///
/// Two aligned digit runs compare as unsigned integers of arbitrary length:
/// leading zeros are stripped, a longer significant run is the larger
/// number, equal-length significant runs compare lexicographically. When
/// the values are equal but the literal runs differ in length, the run with
/// more leading zeros sorts first — immediately, not as a deferred tie.
fn cmp_natural(a: &[u8], b: &[u8]) -> Ordering {
    let mut tie = Ordering::Equal;
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let (x, y) = (a[i], b[j]);

        if x.is_ascii_digit() && y.is_ascii_digit() {
            let end_a = digit_run_end(a, i);
            let end_b = digit_run_end(b, j);
            let sig_a = significant_start(a, i, end_a);
            let sig_b = significant_start(b, j, end_b);

            match (end_a - sig_a).cmp(&(end_b - sig_b)) {
                Ordering::Equal => {}
                magnitude => return magnitude,
            }
            match a[sig_a..end_a].cmp(&b[sig_b..end_b]) {
                Ordering::Equal => {}
                value => return value,
            }
            if end_a - i != end_b - j {
                // Equal values; more leading zeros goes first.
                return (end_b - j).cmp(&(end_a - i));
            }

            i = end_a;
            j = end_b;
            continue;
        }

        if x != y {
            let (lx, ly) = (x.to_ascii_lowercase(), y.to_ascii_lowercase());
            if lx == ly {
                if tie == Ordering::Equal {
                    tie = y.cmp(&x);
                }
            } else {
                return lx.cmp(&ly);
            }
        }

        i += 1;
        j += 1;
    }

    if i >= a.len() && j >= b.len() {
        tie
    } else if i >= a.len() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn digit_run_end(s: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < s.len() && s[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// First significant digit of the run, keeping at least one digit so an
/// all-zero run still has a value to compare.
fn significant_start(s: &[u8], start: usize, end: usize) -> usize {
    let mut sig = start;
    while sig + 1 < end && s[sig] == b'0' {
        sig += 1;
    }
    sig
}

/// Locale-aware ordering via the platform's `strcoll`. Interior NUL bytes
/// cannot cross the C boundary; such strings fall back to byte order.
#[allow(unsafe_code)]
fn cmp_collate(a: &str, b: &str) -> Ordering {
    use std::ffi::CString;

    match (CString::new(a), CString::new(b)) {
        (Ok(ca), Ok(cb)) => {
            let r = unsafe { libc::strcoll(ca.as_ptr(), cb.as_ptr()) };
            r.cmp(&0)
        }
        _ => a.as_bytes().cmp(b.as_bytes()),
    }
}
