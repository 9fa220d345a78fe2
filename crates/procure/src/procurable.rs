//! Procurable record types.

use crate::decode::{decode, DecodeConfig};
use crate::source::SourceLocator;
use serde::de::DeserializeOwned;
use tessera_core::{Entity, Result};
use tessera_query::{Context, Recordable, RecordedEntity};
use tracing::{debug, info};

/// A record type decoded from an external source.
///
/// ```rust
/// use serde::Deserialize;
/// use tessera_core::Timestamp;
/// use tessera_procure::{DecodeConfig, Procurable, SourceLocator};
/// # use tessera_core::schema::{Entity, Schema, SchemaBuilder};
/// # use tessera_core::{DataType, EntityId, Field, Record, Result, Value};
/// # use tessera_query::ast::{FieldPredicates, Predicate};
/// # use tessera_query::{compile, Fetchable, QueryGenerator, Recordable};
/// # #[derive(Clone)]
/// # struct Event { id: EntityId, identifier: i64, start_date: Timestamp }
/// # impl Event {
/// #     const IDENTIFIER: Field<Event, i64> = Field::new("identifier", 0);
/// #     const START_DATE: Field<Event, Timestamp> = Field::new("startDate", 1);
/// # }
/// # impl Entity for Event {
/// #     const NAME: &'static str = "Event";
/// #     fn schema() -> Schema {
/// #         SchemaBuilder::new("Event")
/// #             .and_then(|b| b.add_field("identifier", DataType::Int64))
/// #             .and_then(|b| b.add_field("startDate", DataType::DateTime))
/// #             .map(|b| b.build())
/// #             .unwrap()
/// #     }
/// #     fn id(&self) -> EntityId { self.id }
/// #     fn from_record(r: &Record) -> Result<Self> {
/// #         Ok(Self { id: r.id(), identifier: Self::IDENTIFIER.read(r)?, start_date: Self::START_DATE.read(r)? })
/// #     }
/// #     fn to_record(&self) -> Record {
/// #         Record::new(self.id, vec![Value::Int64(self.identifier), Value::from(self.start_date)])
/// #     }
/// # }
/// # #[derive(Default)]
/// # struct EventQuery { identifier: Option<i64> }
/// # impl QueryGenerator for EventQuery {
/// #     type Entity = Event;
/// #     fn predicate(&self) -> Option<Predicate> {
/// #         compile([self.identifier.map(|v| Event::IDENTIFIER.equals(v))])
/// #     }
/// # }
/// #[derive(Deserialize)]
/// struct EventRow {
///     #[serde(rename = "id")]
///     identifier: i64,
///     #[serde(rename = "StartDate", deserialize_with = "tessera_procure::date::deserialize")]
///     start_date: Timestamp,
/// }
///
/// impl Procurable for EventRow {
///     fn source() -> SourceLocator {
///         SourceLocator::bytes(&br#"[{"id": 1, "StartDate": "04/02/2018"}]"#[..])
///     }
///
///     fn decode_config() -> DecodeConfig {
///         DecodeConfig::new().with_date_format("%d/%m/%Y")
///     }
/// }
///
/// impl Recordable for EventRow {
///     type Query = EventQuery;
///
///     fn primary_key(&self) -> EventQuery {
///         EventQuery { identifier: Some(self.identifier) }
///     }
///
///     fn update(&self, event: &mut Event) {
///         event.identifier = self.identifier;
///         event.start_date = self.start_date;
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let store = tessera_storage::MemoryStore::new();
/// store.register_entity::<Event>()?;
/// let mut ctx = store.context();
///
/// let events = EventRow::archive(&mut ctx)?;
/// assert_eq!(events.len(), 1);
/// // archiving again resolves the same record
/// EventRow::archive(&mut ctx)?;
/// assert_eq!(Event::count(&ctx)?, 1);
/// # Ok(())
/// # }
/// ```
pub trait Procurable: DeserializeOwned + Sized {
    /// Where the source bytes live.
    fn source() -> SourceLocator;

    /// How the source is decoded.
    fn decode_config() -> DecodeConfig {
        DecodeConfig::default()
    }

    /// Reads and decodes the whole source.
    fn procure() -> Result<Vec<Self>> {
        let source = Self::source();
        let bytes = source.read()?;
        let items = decode(&bytes, &Self::decode_config())?;
        debug!(source = %source, items = items.len(), "procured");
        Ok(items)
    }

    /// Procures the source, records every item in `ctx` and commits once,
    /// only if anything changed.
    ///
    /// A decode failure resolves and commits nothing. A resolve failure
    /// leaves the already staged items uncommitted in `ctx`.
    fn archive<C>(ctx: &mut C) -> Result<Vec<RecordedEntity<Self>>>
    where
        Self: Recordable,
        C: Context + ?Sized,
    {
        let items = Self::procure()?;
        let entities = items
            .iter()
            .map(|item| item.record(&mut *ctx))
            .collect::<Result<Vec<_>>>()?;
        let changed = ctx.has_changes();
        if changed {
            ctx.commit()?;
        }
        info!(
            entity = <RecordedEntity<Self> as Entity>::NAME,
            records = entities.len(),
            committed = changed,
            "archived"
        );
        Ok(entities)
    }

    /// [`archive`](Procurable::archive), handing the entities to `completion`.
    fn archive_with<C, F>(ctx: &mut C, completion: F) -> Result<()>
    where
        Self: Recordable,
        C: Context + ?Sized,
        F: FnOnce(&[RecordedEntity<Self>]),
    {
        let entities = Self::archive(ctx)?;
        completion(&entities);
        Ok(())
    }
}
