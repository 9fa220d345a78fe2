//! Record-or-create resolution of externally sourced values.

use crate::context::Context;
use crate::generator::QueryGenerator;
use tessera_core::{Entity, Result};
use tracing::{debug, trace};

/// Entity type a [`Recordable`] resolves to.
pub type RecordedEntity<R> = <<R as Recordable>::Query as QueryGenerator>::Entity;

/// An externally decoded value that can be written into the store.
///
/// `primary_key` must select at most one logical record. An
/// under-constrained key makes [`record`](Recordable::record) overwrite
/// whichever record the store returns first; that is never detected here.
pub trait Recordable {
    type Query: QueryGenerator;

    /// The query identifying this value's stored counterpart.
    fn primary_key(&self) -> Self::Query;

    /// Copies this value's fields onto `entity`. Fields it does not touch
    /// keep their stored values.
    fn update(&self, entity: &mut RecordedEntity<Self>);

    /// Finds the stored counterpart or constructs a new one, applies
    /// [`update`](Recordable::update) and stages the result in `ctx`.
    ///
    /// Nothing is committed. Store errors propagate unchanged.
    fn record<C: Context + ?Sized>(&self, ctx: &mut C) -> Result<RecordedEntity<Self>> {
        let name = <RecordedEntity<Self> as Entity>::NAME;
        let mut entity = match self.primary_key().first(&*ctx)? {
            Some(found) => {
                trace!(entity = name, id = found.id(), "upsert matched existing record");
                found
            }
            None => {
                let record = ctx.construct(name)?;
                debug!(entity = name, id = record.id(), "upsert constructed new record");
                <RecordedEntity<Self> as Entity>::from_record(&record)?
            }
        };
        self.update(&mut entity);
        ctx.stage(name, entity.to_record())?;
        Ok(entity)
    }
}
