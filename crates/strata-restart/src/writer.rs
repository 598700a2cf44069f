//! Checkpoint writing: deterministic tree traversal into packed records.

use std::io::Write;

use strata_core::ElementKind;
use strata_store::{Group, Member};

use crate::codec::{encode_header, encode_record};
use crate::error::RestartError;

/// One packed field, addressed by its full tree path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Full slash path of the field, e.g. `/problem/regionA/permeability`.
    pub path: String,
    /// Element kind of the field's buffer.
    pub kind: ElementKind,
    /// The field's packed encoding (shape included).
    pub payload: Vec<u8>,
}

/// Collect one record per field across the subtree rooted at `root`.
///
/// Traversal is depth-first in insertion order, a node's fields before its
/// children — the same order every run, so two checkpoints of the same
/// tree state are byte-identical. Every field is recorded regardless of
/// input flag: flags govern the input phase, not persistence.
pub fn collect_records(root: &Group) -> Vec<Record> {
    let mut records = Vec::new();
    collect_into(root, &mut records);
    records
}

fn collect_into(group: &Group, records: &mut Vec<Record>) {
    for field in group.fields() {
        let mut payload = Vec::new();
        field.pack(&mut payload);
        records.push(Record {
            path: format!("{}/{}", group.path(), field.name()),
            kind: field.kind(),
            payload,
        });
    }
    for (_, child) in group.groups() {
        collect_into(child.group(), records);
    }
}

/// Write a checkpoint of the subtree rooted at `root` into `sink`.
///
/// Returns the number of records written. Generic over `W: Write` so
/// tests can use `Vec<u8>` and production code a `BufWriter<File>`.
pub fn write_checkpoint<W: Write>(sink: &mut W, root: &Group) -> Result<u32, RestartError> {
    let records = collect_records(root);
    let count = u32::try_from(records.len()).map_err(|_| RestartError::MalformedRecord {
        detail: format!("tree holds {} fields, checkpoint caps at u32", records.len()),
    })?;
    encode_header(sink, count)?;
    for record in &records {
        encode_record(sink, record)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_store::Group;

    fn two_region_tree() -> Group {
        let mut root = Group::new("problem");
        root.register_field::<f64>("time").unwrap().assign(0.5);
        let region_a = root.register_group::<Group>("regionA").unwrap();
        region_a
            .register_field::<f64>("pressure")
            .unwrap()
            .set_per_entity();
        region_a.resize(3);
        let region_b = root.register_group::<Group>("regionB").unwrap();
        region_b
            .register_field::<i64>("cellType")
            .unwrap()
            .set_per_entity();
        region_b.resize(2);
        root
    }

    #[test]
    fn records_follow_tree_order() {
        let root = two_region_tree();
        let records = collect_records(&root);
        let paths: Vec<_> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/problem/time",
                "/problem/regionA/pressure",
                "/problem/regionB/cellType",
            ]
        );
    }

    #[test]
    fn identical_trees_produce_identical_blobs() {
        let a = two_region_tree();
        let b = two_region_tree();
        let mut blob_a = Vec::new();
        let mut blob_b = Vec::new();
        write_checkpoint(&mut blob_a, &a).unwrap();
        write_checkpoint(&mut blob_b, &b).unwrap();
        assert_eq!(blob_a, blob_b);
    }

    #[test]
    fn record_count_matches_field_total() {
        let root = two_region_tree();
        let mut blob = Vec::new();
        let count = write_checkpoint(&mut blob, &root).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn no_write_fields_are_recorded() {
        let mut root = Group::new("problem");
        // NoWrite is the default flag for fresh fields.
        root.register_field::<f64>("internalState").unwrap();
        let records = collect_records(&root);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "/problem/internalState");
    }
}
