//! Checkpoint reading: path-indexed records restored into a live tree.

use std::io::Read;

use indexmap::IndexMap;
use strata_store::{Field, Group, Member};

use crate::codec::{decode_header, decode_record};
use crate::error::RestartError;
use crate::writer::Record;

/// A parsed checkpoint, indexed by field path.
///
/// Records are located by path, not by position, so a reader restores
/// correctly from a blob whose records were written in any order — the
/// restoring process rebuilds its tree independently and only the paths
/// tie the two together.
pub struct CheckpointReader {
    records: IndexMap<String, Record>,
}

impl CheckpointReader {
    /// Parse a checkpoint blob, validating the header.
    pub fn open<R: Read>(mut source: R) -> Result<Self, RestartError> {
        let count = decode_header(&mut source)?;
        // Sized incrementally: the count comes from the wire and is untrusted.
        let mut records = IndexMap::new();
        for _ in 0..count {
            let record = decode_record(&mut source)?;
            if records.contains_key(&record.path) {
                return Err(RestartError::MalformedRecord {
                    detail: format!("duplicate record for '{}'", record.path),
                });
            }
            records.insert(record.path.clone(), record);
        }
        Ok(Self { records })
    }

    /// Number of records in the checkpoint.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the checkpoint holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over record paths in blob order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Look up a record by full field path.
    pub fn record(&self, path: &str) -> Option<&Record> {
        self.records.get(path)
    }

    /// Restore every record into the tree rooted at `root`.
    ///
    /// Each record's path is resolved against the live tree; the field's
    /// element kind must match the recorded tag before its buffer is
    /// replaced. Fields in the tree with no matching record are left
    /// untouched.
    pub fn restore(&self, root: &mut Group) -> Result<(), RestartError> {
        for record in self.records.values() {
            let field = locate_field(root, &record.path)?;
            if field.kind() != record.kind {
                return Err(RestartError::KindMismatch {
                    path: record.path.clone(),
                    stored: field.kind(),
                    found: record.kind,
                });
            }
            field.unpack(&record.payload)?;
        }
        Ok(())
    }
}

/// Resolve a full field path against the tree rooted at `root`.
///
/// The path must start with the root's own path; the remaining segments
/// name child groups, except the last, which names the field.
fn locate_field<'a>(root: &'a mut Group, path: &str) -> Result<&'a mut Field, RestartError> {
    let relative = path
        .strip_prefix(root.path())
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| RestartError::UnknownPath {
            path: path.to_string(),
        })?;
    let segments: Vec<&str> = relative.split('/').collect();
    descend(root, &segments, path)
}

fn descend<'a>(
    group: &'a mut Group,
    segments: &[&str],
    full_path: &str,
) -> Result<&'a mut Field, RestartError> {
    let unknown = || RestartError::UnknownPath {
        path: full_path.to_string(),
    };
    match segments {
        [] => Err(unknown()),
        [field_name] => group.get_field_mut(field_name).map_err(|_| unknown()),
        [child_name, rest @ ..] => {
            let member = group.child_mut(child_name).ok_or_else(unknown)?;
            descend(member.group_mut(), rest, full_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ElementKind;
    use strata_test_utils::{sample_tree, sample_tree_topology};
    use crate::codec::{encode_header, encode_record};
    use crate::writer::{collect_records, write_checkpoint};

    #[test]
    fn roundtrip_restores_exact_contents() {
        let source = sample_tree();
        let mut blob = Vec::new();
        write_checkpoint(&mut blob, &source).unwrap();

        // Same topology, default contents everywhere: restore must supply
        // every payload, including buffer shapes.
        let mut target = sample_tree_topology();
        let reader = CheckpointReader::open(blob.as_slice()).unwrap();
        reader.restore(&mut target).unwrap();

        let mut reblob = Vec::new();
        write_checkpoint(&mut reblob, &target).unwrap();
        assert_eq!(blob, reblob);
    }

    #[test]
    fn restore_is_record_order_independent() {
        let source = sample_tree();
        let records = collect_records(&source);

        // Re-encode the records in reverse order.
        let mut blob = Vec::new();
        encode_header(&mut blob, records.len() as u32).unwrap();
        for record in records.iter().rev() {
            encode_record(&mut blob, record).unwrap();
        }

        let mut target = sample_tree();
        let reader = CheckpointReader::open(blob.as_slice()).unwrap();
        reader.restore(&mut target).unwrap();

        let mut reblob = Vec::new();
        write_checkpoint(&mut reblob, &target).unwrap();
        let mut expected = Vec::new();
        write_checkpoint(&mut expected, &source).unwrap();
        assert_eq!(reblob, expected);
    }

    #[test]
    fn unknown_path_is_rejected() {
        let source = sample_tree();
        let mut records = collect_records(&source);
        records[0].path = "/problem/noSuchRegion/noSuchField".to_string();

        let mut blob = Vec::new();
        encode_header(&mut blob, records.len() as u32).unwrap();
        for record in &records {
            encode_record(&mut blob, record).unwrap();
        }

        let mut target = sample_tree();
        let reader = CheckpointReader::open(blob.as_slice()).unwrap();
        match reader.restore(&mut target) {
            Err(RestartError::UnknownPath { path }) => {
                assert_eq!(path, "/problem/noSuchRegion/noSuchField");
            }
            other => panic!("expected UnknownPath, got {other:?}"),
        }
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let source = sample_tree();
        let mut records = collect_records(&source);
        // Claim the f64 time field was recorded as i32.
        let time = records
            .iter_mut()
            .find(|r| r.path == "/problem/time")
            .unwrap();
        time.kind = ElementKind::I32;

        let mut blob = Vec::new();
        encode_header(&mut blob, records.len() as u32).unwrap();
        for record in &records {
            encode_record(&mut blob, record).unwrap();
        }

        let mut target = sample_tree();
        let reader = CheckpointReader::open(blob.as_slice()).unwrap();
        match reader.restore(&mut target) {
            Err(RestartError::KindMismatch {
                path,
                stored,
                found,
            }) => {
                assert_eq!(path, "/problem/time");
                assert_eq!(stored, ElementKind::F64);
                assert_eq!(found, ElementKind::I32);
            }
            other => panic!("expected KindMismatch, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_paths_are_rejected_at_open() {
        let source = sample_tree();
        let records = collect_records(&source);

        let mut blob = Vec::new();
        encode_header(&mut blob, 2).unwrap();
        encode_record(&mut blob, &records[0]).unwrap();
        encode_record(&mut blob, &records[0]).unwrap();

        match CheckpointReader::open(blob.as_slice()) {
            Err(RestartError::MalformedRecord { detail }) => {
                assert!(detail.contains("duplicate record"), "{detail}");
            }
            other => panic!(
                "expected MalformedRecord, got {:?}",
                other.map(|r| r.len())
            ),
        }
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let source = sample_tree();
        let mut blob = Vec::new();
        write_checkpoint(&mut blob, &source).unwrap();
        blob.truncate(blob.len() - 3);

        match CheckpointReader::open(blob.as_slice()) {
            Err(RestartError::Io(_)) => {}
            other => panic!("expected Io, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn lookup_by_path_works_without_restore() {
        let source = sample_tree();
        let mut blob = Vec::new();
        write_checkpoint(&mut blob, &source).unwrap();

        let reader = CheckpointReader::open(blob.as_slice()).unwrap();
        assert!(reader.record("/problem/time").is_some());
        assert!(reader.record("/problem/absent").is_none());
        assert_eq!(reader.len(), collect_records(&source).len());
    }
}
