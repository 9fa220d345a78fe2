//! Change operations and batches.
//!
//! A `ChangeBatch` is the ordered list of structural operations one
//! notification cycle produced. Positions follow batch-update semantics:
//! `Update`, `DeleteRow` and `DeleteSection` address the state before the
//! batch, `InsertRow` and `InsertSection` address the state after it.

use alloc::vec::Vec;
use core::fmt;
use tessera_core::{Error, Record, Result};

/// Position of a row: section index and row index within the section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// One structural change to a sectioned result set.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeOperation {
    InsertRow(IndexPath),
    InsertSection(usize),
    DeleteRow(IndexPath),
    DeleteSection(usize),
    Update(IndexPath, Record),
}

/// The operations of one notification cycle, in delivery order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeBatch {
    operations: Vec<ChangeOperation>,
}

impl ChangeBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, op: ChangeOperation) {
        self.operations.push(op);
    }

    #[inline]
    pub fn operations(&self) -> &[ChangeOperation] {
        &self.operations
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Takes the buffered operations, leaving the batch empty.
    pub fn take(&mut self) -> Vec<ChangeOperation> {
        core::mem::take(&mut self.operations)
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }
}

fn inconsistent(what: &str, at: impl fmt::Display) -> Error {
    Error::configuration(alloc::format!("change batch {} out of range at {}", what, at))
}

/// Applies `operations` to a sectioned model.
///
/// Updates run first against the old state, then deletes in descending
/// order, then inserts in ascending order against the new state.
/// `new_row` produces the value for an inserted row (`None` record) or an
/// updated row (`Some` record).
pub fn apply_operations<T, F>(
    sections: &mut Vec<Vec<T>>,
    operations: &[ChangeOperation],
    mut new_row: F,
) -> Result<()>
where
    F: FnMut(IndexPath, Option<&Record>) -> T,
{
    let mut row_deletes = Vec::new();
    let mut section_deletes = Vec::new();
    let mut section_inserts = Vec::new();
    let mut row_inserts = Vec::new();
    let mut updates = Vec::new();
    for op in operations {
        match op {
            ChangeOperation::DeleteRow(path) => row_deletes.push(*path),
            ChangeOperation::DeleteSection(index) => section_deletes.push(*index),
            ChangeOperation::InsertSection(index) => section_inserts.push(*index),
            ChangeOperation::InsertRow(path) => row_inserts.push(*path),
            ChangeOperation::Update(path, record) => updates.push((*path, record)),
        }
    }

    for (path, record) in updates {
        let value = new_row(path, Some(record));
        let slot = sections
            .get_mut(path.section)
            .and_then(|rows| rows.get_mut(path.row))
            .ok_or_else(|| inconsistent("update", path))?;
        *slot = value;
    }

    row_deletes.sort_unstable_by(|a, b| b.cmp(a));
    for path in row_deletes {
        let rows = sections
            .get_mut(path.section)
            .filter(|rows| path.row < rows.len())
            .ok_or_else(|| inconsistent("row delete", path))?;
        rows.remove(path.row);
    }

    section_deletes.sort_unstable_by(|a, b| b.cmp(a));
    for index in section_deletes {
        if index >= sections.len() {
            return Err(inconsistent("section delete", index));
        }
        sections.remove(index);
    }

    section_inserts.sort_unstable();
    for index in section_inserts {
        if index > sections.len() {
            return Err(inconsistent("section insert", index));
        }
        sections.insert(index, Vec::new());
    }

    row_inserts.sort_unstable();
    for path in row_inserts {
        let value = new_row(path, None);
        let rows = sections
            .get_mut(path.section)
            .filter(|rows| path.row <= rows.len())
            .ok_or_else(|| inconsistent("row insert", path))?;
        rows.insert(path.row, value);
    }

    Ok(())
}

/// Applies the section operations of `operations` to a per-section list.
pub fn apply_section_operations<K, F>(
    keys: &mut Vec<K>,
    operations: &[ChangeOperation],
    mut new_key: F,
) -> Result<()>
where
    F: FnMut(usize) -> K,
{
    let mut deletes: Vec<usize> = operations
        .iter()
        .filter_map(|op| match op {
            ChangeOperation::DeleteSection(i) => Some(*i),
            _ => None,
        })
        .collect();
    let mut inserts: Vec<usize> = operations
        .iter()
        .filter_map(|op| match op {
            ChangeOperation::InsertSection(i) => Some(*i),
            _ => None,
        })
        .collect();
    deletes.sort_unstable_by(|a, b| b.cmp(a));
    for index in deletes {
        if index >= keys.len() {
            return Err(inconsistent("section delete", index));
        }
        keys.remove(index);
    }
    inserts.sort_unstable();
    for index in inserts {
        if index > keys.len() {
            return Err(inconsistent("section insert", index));
        }
        keys.insert(index, new_key(index));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use tessera_core::Value;

    fn path(section: usize, row: usize) -> IndexPath {
        IndexPath::new(section, row)
    }

    fn ids(sections: &[Vec<u64>]) -> Vec<Vec<u64>> {
        sections.to_vec()
    }

    #[test]
    fn test_batch_take_clears() {
        let mut batch = ChangeBatch::new();
        batch.push(ChangeOperation::InsertSection(0));
        batch.push(ChangeOperation::InsertRow(path(0, 0)));
        assert_eq!(batch.len(), 2);
        let ops = batch.take();
        assert_eq!(ops.len(), 2);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_apply_inserts_into_new_section() {
        let mut sections: Vec<Vec<u64>> = vec![vec![1, 2]];
        let ops = vec![
            ChangeOperation::InsertSection(0),
            ChangeOperation::InsertRow(path(0, 0)),
            ChangeOperation::InsertRow(path(1, 1)),
        ];
        let mut next = 10;
        apply_operations(&mut sections, &ops, |_, _| {
            next += 1;
            next
        })
        .unwrap();
        assert_eq!(ids(&sections), vec![vec![11], vec![1, 12, 2]]);
    }

    #[test]
    fn test_apply_deletes_rows_then_section() {
        let mut sections: Vec<Vec<u64>> = vec![vec![1], vec![2, 3]];
        let ops = vec![
            ChangeOperation::DeleteRow(path(1, 0)),
            ChangeOperation::DeleteRow(path(1, 1)),
            ChangeOperation::DeleteSection(1),
        ];
        apply_operations(&mut sections, &ops, |_, _| 0).unwrap();
        assert_eq!(ids(&sections), vec![vec![1]]);
    }

    #[test]
    fn test_apply_move_and_update() {
        let mut sections: Vec<Vec<u64>> = vec![vec![1, 2, 3]];
        let moved = Record::new(3, vec![Value::from("c")]);
        let ops = vec![
            ChangeOperation::DeleteRow(path(0, 2)),
            ChangeOperation::InsertRow(path(0, 0)),
            ChangeOperation::Update(path(0, 1), Record::new(2, vec![])),
        ];
        apply_operations(&mut sections, &ops, |_, record| {
            record.map_or(moved.id(), Record::id) * 10
        })
        .unwrap();
        assert_eq!(ids(&sections), vec![vec![30, 1, 20]]);
    }

    #[test]
    fn test_update_addresses_the_row_before_deletes() {
        let mut sections: Vec<Vec<u64>> = vec![vec![1, 2, 3]];
        let ops = vec![
            ChangeOperation::DeleteRow(path(0, 0)),
            ChangeOperation::Update(path(0, 2), Record::new(3, vec![])),
        ];
        apply_operations(&mut sections, &ops, |_, record| {
            record.map_or(0, Record::id) * 10
        })
        .unwrap();
        assert_eq!(ids(&sections), vec![vec![2, 30]]);

        // the post-delete position would be out of range
        let mut sections: Vec<Vec<u64>> = vec![vec![1, 2]];
        let ops = vec![
            ChangeOperation::DeleteRow(path(0, 0)),
            ChangeOperation::Update(path(0, 1), Record::new(2, vec![])),
        ];
        apply_operations(&mut sections, &ops, |_, record| {
            record.map_or(0, Record::id) * 10
        })
        .unwrap();
        assert_eq!(ids(&sections), vec![vec![20]]);
    }

    #[test]
    fn test_apply_rejects_out_of_range() {
        let mut sections: Vec<Vec<u64>> = vec![vec![1]];
        let err = apply_operations(&mut sections, &[ChangeOperation::DeleteRow(path(0, 4))], |_, _| 0);
        assert!(matches!(err, Err(Error::Configuration { .. })));
        let err = apply_operations(&mut sections, &[ChangeOperation::InsertRow(path(3, 0))], |_, _| 0);
        assert!(err.is_err());
    }

    #[test]
    fn test_apply_section_operations() {
        let mut keys = vec!["a", "c"];
        let ops = vec![
            ChangeOperation::InsertSection(1),
            ChangeOperation::DeleteRow(path(1, 0)),
            ChangeOperation::DeleteSection(1),
        ];
        apply_section_operations(&mut keys, &ops, |_| "b").unwrap();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
