//! Consumers of controller output.
//!
//! Consumers receive the post-batch sections alongside each batch and must
//! not borrow the controller from inside a callback.

use crate::change::{apply_operations, ChangeOperation};
use crate::source::Section;
use alloc::vec::Vec;
use tessera_core::{EntityId, Record};
use tracing::warn;

/// Receiver of full reloads and change batches.
pub trait ResultsConsumer {
    /// The results were replaced wholesale.
    fn on_full_reload(&mut self, sections: &[Section]);

    /// One cycle's operations, in order. `sections` is the state after them.
    fn apply_change_operations(&mut self, operations: &[ChangeOperation], sections: &[Section]);
}

/// Records every reload and batch, as a list view's change log would.
#[derive(Clone, Debug, Default)]
pub struct BatchRecorder {
    pub reloads: usize,
    pub batches: Vec<Vec<ChangeOperation>>,
}

impl BatchRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent batch.
    pub fn last_batch(&self) -> Option<&[ChangeOperation]> {
        self.batches.last().map(Vec::as_slice)
    }
}

impl ResultsConsumer for BatchRecorder {
    fn on_full_reload(&mut self, _sections: &[Section]) {
        self.reloads += 1;
    }

    fn apply_change_operations(&mut self, operations: &[ChangeOperation], _sections: &[Section]) {
        self.batches.push(operations.to_vec());
    }
}

/// Maintains its own section/row model by applying each batch, as a grid
/// view does, and checks it against the controller's state afterwards.
#[derive(Clone, Debug, Default)]
pub struct SectionedMirror {
    rows: Vec<Vec<Option<EntityId>>>,
    updated: Vec<EntityId>,
    consistent: bool,
}

impl SectionedMirror {
    pub fn new() -> Self {
        Self {
            consistent: true,
            ..Self::default()
        }
    }

    /// Row ids per section.
    pub fn rows(&self) -> &[Vec<Option<EntityId>>] {
        &self.rows
    }

    /// Row counts per section.
    pub fn shape(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Ids reported by update operations, in delivery order.
    pub fn updated(&self) -> &[EntityId] {
        &self.updated
    }

    /// False once a batch left the mirror out of step with the results.
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    fn matches(&self, sections: &[Section]) -> bool {
        self.rows.len() == sections.len()
            && self.rows.iter().zip(sections).all(|(rows, section)| {
                rows.len() == section.len()
                    && rows
                        .iter()
                        .zip(&section.records)
                        .all(|(id, record)| *id == Some(record.id()))
            })
    }
}

fn ids_of(sections: &[Section]) -> Vec<Vec<Option<EntityId>>> {
    sections
        .iter()
        .map(|s| s.records.iter().map(|r| Some(r.id())).collect())
        .collect()
}

impl ResultsConsumer for SectionedMirror {
    fn on_full_reload(&mut self, sections: &[Section]) {
        self.rows = ids_of(sections);
        self.consistent = true;
    }

    fn apply_change_operations(&mut self, operations: &[ChangeOperation], sections: &[Section]) {
        let updated = &mut self.updated;
        let applied = apply_operations(&mut self.rows, operations, |path, record| match record {
            Some(record) => {
                updated.push(record.id());
                Some(record.id())
            }
            None => sections
                .get(path.section)
                .and_then(|s| s.records.get(path.row))
                .map(Record::id),
        });
        if let Err(err) = applied {
            warn!(error = %err, "mirror rejected change batch");
            self.consistent = false;
        } else if !self.matches(sections) {
            warn!("mirror diverged from controller sections");
            self.consistent = false;
        }
    }
}
