/// Tree deserializer.
///
/// Records are stored straight into the id-addressed arena, which grows on
/// demand, so ids in the file may be large, sparse or out of order. A
/// record is attached to its parent only if the parent's record has already
/// been read; any other record becomes the root.
use super::{tsv_reader, FIELD_COUNT};
use crate::error::Result;
use crate::model::{join_path, DirectoryTree, Entry, EntryId};
use compact_str::CompactString;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A tree rebuilt from its persisted form.
#[derive(Debug)]
pub struct Reconstruction {
    pub tree: DirectoryTree,
    /// Directory entries that were attached under a parent.
    pub directories_attached: usize,
}

/// One parsed line.
#[derive(Debug, PartialEq, Eq)]
struct ParsedRecord<'a> {
    id: u32,
    name: Cow<'a, str>,
    is_dir: bool,
    parent_id: i64,
}

fn parse_record(record: &csv::ByteRecord) -> Option<ParsedRecord<'_>> {
    if record.len() != FIELD_COUNT {
        return None;
    }
    let id = std::str::from_utf8(&record[0]).ok()?.parse().ok()?;
    let name = String::from_utf8_lossy(&record[1]);
    if name.is_empty() {
        return None;
    }
    let is_dir = match &record[2] {
        b"0" => false,
        b"1" => true,
        _ => return None,
    };
    let parent_id = std::str::from_utf8(&record[3]).ok()?.parse().ok()?;
    Some(ParsedRecord {
        id,
        name,
        is_dir,
        parent_id,
    })
}

/// Rebuild a tree from the file at `path`, anchoring the root at `start_path`.
///
/// Returns `Ok(None)` when the file cannot be opened or holds no valid
/// record. Only a failure to grow the arena is an error.
pub fn reconstruct_tree_from_file(path: &Path, start_path: &Path) -> Result<Option<Reconstruction>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) => {
            warn!("Cannot open {}: {err}", path.display());
            return Ok(None);
        }
    };
    let reconstruction = reconstruct_tree(file, start_path)?;
    if let Some(r) = &reconstruction {
        info!(
            "Reloaded {} entries ({} directories) from {}",
            r.tree.len(),
            r.directories_attached,
            path.display()
        );
    }
    Ok(reconstruction)
}

/// Rebuild a tree from any reader holding the persisted format.
///
/// Malformed lines and lines reusing an id are skipped. A read error stops
/// the reload and keeps what was rebuilt so far.
pub fn reconstruct_tree<R: Read>(source: R, start_path: &Path) -> Result<Option<Reconstruction>> {
    reconstruct_tree_into(DirectoryTree::new()?, source, start_path)
}

/// Same as [`reconstruct_tree`], filling the caller's empty `tree`.
///
/// Pass a tree built with [`DirectoryTree::with_slot_limit`] to bound the
/// memory a damaged or hostile file can claim through large ids; an id past
/// the limit fails the reload with
/// [`TreeError::ResourceExhausted`](crate::error::TreeError::ResourceExhausted).
pub fn reconstruct_tree_into<R: Read>(
    mut tree: DirectoryTree,
    source: R,
    start_path: &Path,
) -> Result<Option<Reconstruction>> {
    let started = Instant::now();
    let start_str = start_path.to_string_lossy();

    let mut directories_attached = 0usize;
    let mut skipped = 0u64;

    let mut rdr = tsv_reader(source);
    let mut record = csv::ByteRecord::new();

    loop {
        match rdr.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                warn!("Stopping reload after read error: {err}");
                break;
            }
        }

        let line = record.position().map_or(0, |p| p.line());
        let Some(parsed) = parse_record(&record) else {
            skipped += 1;
            debug!("Skipping malformed record on line {line}");
            continue;
        };

        let id = EntryId(parsed.id);
        if tree.contains(id) {
            skipped += 1;
            warn!("Skipping record on line {line}: id {id} is already in use");
            continue;
        }

        let parent = u32::try_from(parsed.parent_id)
            .ok()
            .map(EntryId)
            .filter(|&p| tree.contains(p));

        let full_path = match parent {
            Some(p) => join_path(tree.get(p).map_or("", |e| e.full_path.as_str()), &parsed.name),
            None => join_path(&start_str, ""),
        };

        let mut entry = Entry::new(id, CompactString::new(&parsed.name), parsed.is_dir, parent);
        entry.full_path = full_path;
        if tree.insert(entry)?.is_err() {
            skipped += 1;
            continue;
        }

        match parent {
            Some(p) => {
                tree.append_child(p, id);
                if parsed.is_dir {
                    directories_attached += 1;
                }
            }
            None => tree.set_root(id),
        }
    }

    debug!(
        "Reload parsed {} entries, skipped {} lines in {:?}",
        tree.len(),
        skipped,
        started.elapsed()
    );

    if tree.root().is_none() {
        return Ok(None);
    }
    Ok(Some(Reconstruction {
        tree,
        directories_attached,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reload(text: &str) -> Reconstruction {
        reconstruct_tree(text.as_bytes(), Path::new("/music"))
            .unwrap()
            .expect("tree expected")
    }

    #[test]
    fn test_parse_valid_record() {
        let record = csv::ByteRecord::from(vec!["7", "A B", "1", "-1"]);
        assert_eq!(
            parse_record(&record),
            Some(ParsedRecord {
                id: 7,
                name: Cow::Borrowed("A B"),
                is_dir: true,
                parent_id: -1,
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_records() {
        for fields in [
            vec!["1", "x"],
            vec!["1", "x", "1", "-1", "extra"],
            vec!["one", "x", "1", "-1"],
            vec!["-3", "x", "1", "-1"],
            vec!["1", "", "1", "-1"],
            vec!["1", "x", "2", "-1"],
            vec!["1", "x", "1", "root"],
        ] {
            let record = csv::ByteRecord::from(fields.clone());
            assert_eq!(parse_record(&record), None, "{fields:?}");
        }
    }

    #[test]
    fn test_children_are_appended_in_file_order() {
        let r = reload("1\troot\t1\t-1\n2\tb\t1\t1\n3\ta\t1\t1\n4\tx.mp3\t0\t2\n");
        let root = r.tree.root().unwrap();
        assert_eq!(root, EntryId(1));
        assert_eq!(r.tree.child_names(root), vec!["b", "a"]);
        assert_eq!(r.directories_attached, 2);
        assert_eq!(r.tree.get(root).unwrap().full_path, "/music/");
        assert_eq!(r.tree.get(EntryId(4)).unwrap().full_path, "/music/b/x.mp3");
        assert_eq!(r.tree.get(EntryId(4)).unwrap().parent_id, Some(EntryId(2)));
    }

    #[test]
    fn test_sparse_ids_grow_the_index() {
        let r = reload("1\tfirst\t1\t-1\n1050\tlate\t1\t-1\n");
        assert!(r.tree.contains(EntryId(1)));
        assert!(r.tree.contains(EntryId(1050)));
        assert_eq!(r.tree.root(), Some(EntryId(1050)));
        assert_eq!(r.tree.get(EntryId(1)).unwrap().name, "first");
        assert!(r.tree.slot_count() >= 1150);
    }

    #[test]
    fn test_out_of_order_child_becomes_root() {
        // The child is read before its parent exists.
        let r = reload("5\torphan.mp3\t0\t9\n9\tdir\t1\t-1\n");
        assert_eq!(r.tree.root(), Some(EntryId(9)));
        assert!(r.tree.get(EntryId(9)).unwrap().is_childless());
        assert_eq!(r.tree.get(EntryId(5)).unwrap().parent_id, None);
    }

    #[test]
    fn test_duplicate_id_is_skipped() {
        let r = reload("1\troot\t1\t-1\n2\tA\t1\t1\n2\tB\t1\t1\n3\tc.mp3\t0\t2\n");
        assert_eq!(r.tree.child_names(EntryId(1)), vec!["A"]);
        assert_eq!(r.tree.child_names(EntryId(2)), vec!["c.mp3"]);
        assert_eq!(r.directories_attached, 1);
    }

    #[test]
    fn test_table_growth_failure_propagates() {
        let tree = DirectoryTree::with_slot_limit(16, 1_000).unwrap();
        let err = reconstruct_tree_into(
            tree,
            "1\troot\t1\t-1\n5000\tfar.mp3\t0\t1\n".as_bytes(),
            Path::new("/music"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::TreeError::ResourceExhausted { requested: 5100 }
        ));
    }

    #[test]
    fn test_empty_input_has_no_tree() {
        assert!(reconstruct_tree("".as_bytes(), Path::new("/m")).unwrap().is_none());
        assert!(reconstruct_tree("garbage\n".as_bytes(), Path::new("/m"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_file_has_no_tree() {
        let result =
            reconstruct_tree_from_file(Path::new("/nonexistent/tree.tsv"), Path::new("/m")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_crlf_line_endings() {
        let r = reload("1\troot\t1\t-1\r\n2\tsong.ogg\t0\t1\r\n");
        assert_eq!(r.tree.child_names(EntryId(1)), vec!["song.ogg"]);
    }
}
