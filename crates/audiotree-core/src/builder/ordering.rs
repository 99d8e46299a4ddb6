/// Sibling ordering used while listing a directory.
///
/// Names are compared byte-wise on a normalized form (ASCII whitespace
/// removed, ASCII letters upper-cased); the stored name is never changed.
/// Non-ASCII characters pass through unchanged. Names that start with
/// [`MARKER`] sort after the others, and within each group the order is
/// descending. The builder front-inserts in this order, so the finished
/// tree shows marker names first, then the rest, each group ascending.
use std::cmp::{Ordering, Reverse};

/// Leading character that pushes a name into the second group.
pub const MARKER: char = '_';

/// Strip ASCII whitespace and upper-case ASCII letters.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        // Vertical tab counts as whitespace too.
        .filter(|&c| !(c.is_ascii_whitespace() || c == '\x0b'))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Processing order for two sibling names.
///
/// This is the reference comparator. The builder sorts with the equivalent
/// [`library_sort_key`] so each name is normalized once per listing.
pub fn compare_library_names(a: &str, b: &str) -> Ordering {
    compare_normalized(&normalize_name(a), &normalize_name(b))
}

/// Same as [`compare_library_names`] for already-normalized names.
pub fn compare_normalized(a: &str, b: &str) -> Ordering {
    let a_marked = a.starts_with(MARKER);
    let b_marked = b.starts_with(MARKER);
    a_marked.cmp(&b_marked).then_with(|| b.cmp(a))
}

/// Sort key equivalent to [`compare_library_names`], for cached-key sorts.
pub fn library_sort_key(name: &str) -> (bool, Reverse<String>) {
    let normalized = normalize_name(name);
    (normalized.starts_with(MARKER), Reverse(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_uppercases() {
        assert_eq!(normalize_name(" My  Album\t01 "), "MYALBUM01");
        assert_eq!(normalize_name("_live"), "_LIVE");
    }

    #[test]
    fn test_normalize_leaves_non_ascii_alone() {
        assert_eq!(normalize_name("straße"), "STRAßE");
        assert_eq!(normalize_name("a\u{a0}b"), "A\u{a0}B");
        assert_eq!(normalize_name("é t\x0b"), "éT");
    }

    #[test]
    fn test_unmarked_before_marked() {
        assert_eq!(compare_library_names("zzz", "_aaa"), Ordering::Less);
        assert_eq!(compare_library_names("_aaa", "zzz"), Ordering::Greater);
    }

    #[test]
    fn test_descending_within_group() {
        assert_eq!(compare_library_names("b", "a"), Ordering::Less);
        assert_eq!(compare_library_names("_b", "_a"), Ordering::Less);
        assert_eq!(compare_library_names("A", "b"), Ordering::Greater);
    }

    #[test]
    fn test_normalized_ties() {
        assert_eq!(compare_library_names("a b", "AB"), Ordering::Equal);
    }

    #[test]
    fn test_sort_key_agrees_with_comparator() {
        let names = ["_z", "_a", "m", "Z", "a", "b c", "_ b"];
        for a in names {
            for b in names {
                assert_eq!(
                    library_sort_key(a).cmp(&library_sort_key(b)),
                    compare_library_names(a, b),
                    "{a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_processing_order_of_example_names() {
        let mut names = vec!["_z", "_a", "m", "Z", "a"];
        names.sort_by(|a, b| compare_library_names(a, b));
        assert_eq!(names, vec!["Z", "m", "a", "_z", "_a"]);
    }
}
