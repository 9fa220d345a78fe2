//! The results controller.
//!
//! A `ResultsController` owns one live query against a [`LiveSource`]. It
//! turns each raw change cycle the source drives into one ordered
//! [`ChangeOperation`] batch, applies the batch to its own sectioned model
//! and forwards it to the registered consumer, all on the source's call path.

use crate::change::{apply_operations, apply_section_operations, ChangeBatch, ChangeOperation, IndexPath};
use crate::config::ControllerConfig;
use crate::consumer::ResultsConsumer;
use crate::source::{
    total_len, LiveQueryId, LiveSource, RawKind, RawObjectChange, RawObserver, RawSectionChange,
    Section,
};
use crate::subscription::{SubscriptionId, SubscriptionManager};
use alloc::boxed::Box;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;
use tessera_core::{Error, Record, Result, Value};
use tracing::{debug, trace, warn};

/// Lifecycle of a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed, nothing fetched yet.
    Uninitialized,
    /// Subscribed and holding results.
    Loaded,
}

/// Observes one live query and emits change batches.
pub struct ResultsController {
    source: Box<dyn LiveSource>,
    config: ControllerConfig,
    state: ControllerState,
    live_id: Option<LiveQueryId>,
    sections: Vec<Section>,
    consumer: Option<Weak<RefCell<dyn ResultsConsumer>>>,
    count_callbacks: SubscriptionManager,
    this: Weak<RefCell<ResultsController>>,

    // One raw cycle's buffers.
    batch: ChangeBatch,
    inserted: HashMap<IndexPath, Record>,
    section_keys: HashMap<usize, Option<Value>>,
    section_deletes: Vec<usize>,
}

impl ResultsController {
    /// Creates an uninitialized controller. Call [`reload`](Self::reload) to
    /// fetch and subscribe.
    pub fn new<S>(source: S, config: ControllerConfig) -> Rc<RefCell<Self>>
    where
        S: LiveSource + 'static,
    {
        Rc::new_cyclic(|this| {
            RefCell::new(Self {
                source: Box::new(source),
                config,
                state: ControllerState::Uninitialized,
                live_id: None,
                sections: Vec::new(),
                consumer: None,
                count_callbacks: SubscriptionManager::new(),
                this: this.clone(),
                batch: ChangeBatch::new(),
                inserted: HashMap::new(),
                section_keys: HashMap::new(),
                section_deletes: Vec::new(),
            })
        })
    }

    /// Registers the consumer. The controller never keeps it alive.
    pub fn set_consumer(&mut self, consumer: Weak<RefCell<dyn ResultsConsumer>>) {
        self.consumer = Some(consumer);
    }

    /// Registers a callback receiving the new result count after every cycle.
    pub fn on_content_changed<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(usize) + 'static,
    {
        self.count_callbacks.subscribe(callback)
    }

    pub fn remove_content_callback(&mut self, id: SubscriptionId) -> bool {
        self.count_callbacks.unsubscribe(id)
    }

    /// Rebuilds the fetch specification from the configuration, fetches the
    /// results and subscribes to their changes, replacing any previous
    /// subscription. The consumer sees a full reload.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(id) = self.live_id.take() {
            self.source.unsubscribe(id);
        }
        self.reset_cycle();

        let spec = self.config.fetch_spec();
        let observer: Weak<RefCell<dyn RawObserver>> = self.this.clone();
        let results = self.source.subscribe(spec, observer)?;
        self.live_id = Some(results.id);
        self.sections = results.sections;
        self.state = ControllerState::Loaded;
        debug!(
            entity = %self.config.entity,
            live_query = results.id,
            sections = self.sections.len(),
            total = self.len(),
            "results reloaded"
        );

        match self.consumer.as_ref().and_then(Weak::upgrade) {
            Some(consumer) => consumer.borrow_mut().on_full_reload(&self.sections),
            None => trace!("no consumer for full reload"),
        }
        Ok(())
    }

    /// Replaces the configuration and reloads.
    pub fn reconfigure(&mut self, config: ControllerConfig) -> Result<()> {
        self.config = config;
        self.reload()
    }

    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn object_at(&self, path: IndexPath) -> Option<&Record> {
        self.sections
            .get(path.section)
            .and_then(|s| s.records.get(path.row))
    }

    /// Total number of results across sections.
    pub fn len(&self) -> usize {
        total_len(&self.sections)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The source the controller observes.
    pub fn context(&self) -> &dyn LiveSource {
        self.source.as_ref()
    }

    fn reset_cycle(&mut self) {
        self.batch.clear();
        self.inserted.clear();
        self.section_keys.clear();
        self.section_deletes.clear();
    }

    fn position(change: &RawObjectChange, position: Option<IndexPath>, which: &str) -> IndexPath {
        match position {
            Some(path) => path,
            None => contract_violation(Error::configuration(format!(
                "raw change kind {} for #{} without {} position",
                change.kind,
                change.record.id(),
                which
            ))),
        }
    }

    /// Applies `operations` to the controller's own sections.
    fn apply_batch(&mut self, operations: &[ChangeOperation]) -> Result<()> {
        let mut keys: Vec<Option<Value>> = self.sections.iter().map(|s| s.key.clone()).collect();
        let mut rows: Vec<Vec<Option<Record>>> = core::mem::take(&mut self.sections)
            .into_iter()
            .map(|s| s.records.into_iter().map(Some).collect())
            .collect();

        let inserted = &mut self.inserted;
        apply_operations(&mut rows, operations, |path, record| match record {
            Some(record) => Some(record.clone()),
            None => inserted.remove(&path),
        })?;
        let section_keys = &mut self.section_keys;
        apply_section_operations(&mut keys, operations, |index| {
            section_keys.remove(&index).flatten()
        })?;

        let mut sections = Vec::with_capacity(rows.len());
        for (section, (key, rows)) in keys.into_iter().zip(rows).enumerate() {
            let mut records = Vec::with_capacity(rows.len());
            for (row, record) in rows.into_iter().enumerate() {
                match record {
                    Some(record) => records.push(record),
                    None => {
                        return Err(Error::configuration(format!(
                            "no record for inserted row {}",
                            IndexPath::new(section, row)
                        )))
                    }
                }
            }
            sections.push(Section::new(key, records));
        }
        self.sections = sections;
        Ok(())
    }
}

/// Store contract violations are not recoverable.
fn contract_violation(err: Error) -> ! {
    panic!("{}", err)
}

impl RawObserver for ResultsController {
    fn will_change_content(&mut self) {
        self.reset_cycle();
    }

    fn did_change_section(&mut self, change: RawSectionChange) {
        match RawKind::try_from(change.kind) {
            Ok(RawKind::Insert) => {
                self.section_keys.insert(change.index, change.key);
                self.batch.push(ChangeOperation::InsertSection(change.index));
            }
            Ok(RawKind::Delete) => self.section_deletes.push(change.index),
            Ok(other) => contract_violation(Error::configuration(format!(
                "raw section change of kind {:?}",
                other
            ))),
            Err(err) => contract_violation(err),
        }
    }

    fn did_change_object(&mut self, change: RawObjectChange) {
        let kind = match RawKind::try_from(change.kind) {
            Ok(kind) => kind,
            Err(err) => contract_violation(err),
        };
        match kind {
            RawKind::Insert => {
                let at = Self::position(&change, change.new_position, "new");
                self.batch.push(ChangeOperation::InsertRow(at));
                self.inserted.insert(at, change.record);
            }
            RawKind::Delete => {
                let at = Self::position(&change, change.old_position, "old");
                self.batch.push(ChangeOperation::DeleteRow(at));
            }
            RawKind::Move => {
                let from = Self::position(&change, change.old_position, "old");
                let to = Self::position(&change, change.new_position, "new");
                self.batch.push(ChangeOperation::DeleteRow(from));
                self.batch.push(ChangeOperation::InsertRow(to));
                self.inserted.insert(to, change.record);
            }
            RawKind::Update => {
                let at = Self::position(&change, change.old_position, "old");
                self.batch.push(ChangeOperation::Update(at, change.record));
            }
        }
    }

    fn did_change_content(&mut self, total: usize) {
        for index in core::mem::take(&mut self.section_deletes) {
            self.batch.push(ChangeOperation::DeleteSection(index));
        }
        let operations = self.batch.take();
        if let Err(err) = self.apply_batch(&operations) {
            contract_violation(err);
        }
        self.inserted.clear();
        self.section_keys.clear();

        if total != self.len() {
            warn!(reported = total, held = self.len(), "result count out of step with source");
        }
        debug!(
            entity = %self.config.entity,
            operations = operations.len(),
            total,
            "change batch"
        );

        if !operations.is_empty() {
            match self.consumer.as_ref().map(Weak::upgrade) {
                Some(Some(consumer)) => consumer
                    .borrow_mut()
                    .apply_change_operations(&operations, &self.sections),
                Some(None) => warn!(
                    entity = %self.config.entity,
                    "consumer dropped; change batch undelivered"
                ),
                None => {}
            }
        }
        self.count_callbacks.notify_all(total);
    }
}

impl Drop for ResultsController {
    fn drop(&mut self) {
        if let Some(id) = self.live_id.take() {
            self.source.unsubscribe(id);
        }
    }
}
