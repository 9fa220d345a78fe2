//! Fixture entities, their import rows and the fixture database.
//!
//! The fixture holds 6 events, 3 parties, 29 performers and 23
//! performances. Every performance belongs to the first event and every
//! performer to the first party.

#![allow(dead_code)]

use serde::Deserialize;
use tessera::core::schema::{Schema, SchemaBuilder};
use tessera::core::{DataType, RefSet, Value};
use tessera::prelude::*;
use tessera::query::ast::{AggregateOp, ONE_DAY_MS};

/// Installs a test subscriber once, filtered by `TESSERA_LOG` (default `warn`).
pub fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TESSERA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

fn fixture(name: &str) -> SourceLocator {
    SourceLocator::path(format!(
        "{}/tests/fixtures/{}",
        env!("CARGO_MANIFEST_DIR"),
        name
    ))
}

fn day_first() -> DecodeConfig {
    DecodeConfig::new().with_date_format("%d/%m/%Y")
}

/// Milliseconds since the epoch of midnight UTC on `day/month/year`.
pub fn date(day: u32, month: u32, year: i32) -> Timestamp {
    tessera::procure::date::parse(&format!("{}/{}/{}", day, month, year), Some("%d/%m/%Y"))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub id: EntityId,
    pub identifier: i64,
    pub start_date: Timestamp,
}

impl Event {
    pub const IDENTIFIER: Field<Event, i64> = Field::new("identifier", 0);
    pub const START_DATE: Field<Event, Timestamp> = Field::new("startDate", 1);
}

impl Entity for Event {
    const NAME: &'static str = "Event";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("identifier", DataType::Int64))
            .and_then(|b| b.add_field("startDate", DataType::DateTime))
            .map(|b| b.build())
            .unwrap()
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id(),
            identifier: Self::IDENTIFIER.read(record)?,
            start_date: Self::START_DATE.read(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(
            self.id,
            vec![Value::Int64(self.identifier), Value::from(self.start_date)],
        )
    }
}

#[derive(Default)]
pub struct EventQuery {
    pub identifier: Option<i64>,
    pub start_date: Option<Range<Timestamp>>,
}

impl QueryGenerator for EventQuery {
    type Entity = Event;

    fn predicate(&self) -> Option<Predicate> {
        compile([
            self.identifier.map(|id| Event::IDENTIFIER.equals(id)),
            self.start_date.map(|r| Event::START_DATE.within(r)),
        ])
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventRow {
    #[serde(rename = "id")]
    pub identifier: i64,
    #[serde(
        rename = "StartDate",
        deserialize_with = "tessera::procure::date::deserialize"
    )]
    pub start_date: Timestamp,
}

impl Recordable for EventRow {
    type Query = EventQuery;

    fn primary_key(&self) -> EventQuery {
        EventQuery {
            identifier: Some(self.identifier),
            ..EventQuery::default()
        }
    }

    fn update(&self, entity: &mut Event) {
        entity.identifier = self.identifier;
        entity.start_date = self.start_date;
    }
}

impl Procurable for EventRow {
    fn source() -> SourceLocator {
        fixture("Events.json")
    }

    fn decode_config() -> DecodeConfig {
        day_first()
    }
}

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Party {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub kind: String,
}

impl Party {
    pub const NAME_FIELD: Field<Party, String> = Field::new("name", 0);
    pub const PHONE: Field<Party, String> = Field::new("phone", 1);
    pub const EMAIL: Field<Party, String> = Field::new("email", 2);
    pub const KIND: Field<Party, String> = Field::new("type", 3);
}

impl Entity for Party {
    const NAME: &'static str = "Party";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("name", DataType::String))
            .and_then(|b| b.add_field("phone", DataType::String))
            .and_then(|b| b.add_field("email", DataType::String))
            .and_then(|b| b.add_field("type", DataType::String))
            .map(|b| b.set_default("type", Value::from("Independent")).build())
            .unwrap()
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id(),
            name: Self::NAME_FIELD.read(record)?,
            phone: Self::PHONE.read(record)?,
            email: Self::EMAIL.read(record)?,
            kind: Self::KIND.read(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(
            self.id,
            vec![
                Value::from(self.name.clone()),
                Value::from(self.phone.clone()),
                Value::from(self.email.clone()),
                Value::from(self.kind.clone()),
            ],
        )
    }
}

#[derive(Default)]
pub struct PartyQuery {
    pub name: Option<StringMatch>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub kind: Option<String>,
}

impl QueryGenerator for PartyQuery {
    type Entity = Party;

    fn predicate(&self) -> Option<Predicate> {
        compile([
            self.name.clone().map(|m| Party::NAME_FIELD.matching(m)),
            self.phone.clone().map(|v| Party::PHONE.equals(v)),
            self.email.clone().map(|v| Party::EMAIL.equals(v)),
            self.kind.clone().map(|v| Party::KIND.equals(v)),
        ])
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PartyRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Type")]
    pub kind: String,
}

impl Recordable for PartyRow {
    type Query = PartyQuery;

    fn primary_key(&self) -> PartyQuery {
        PartyQuery {
            name: Some(StringMatch::exact(self.name.clone())),
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
            kind: Some(self.kind.clone()),
        }
    }

    fn update(&self, entity: &mut Party) {
        entity.name = self.name.clone();
        entity.phone = self.phone.clone();
        entity.email = self.email.clone();
        entity.kind = self.kind.clone();
    }
}

impl Procurable for PartyRow {
    fn source() -> SourceLocator {
        fixture("Parties.json")
    }
}

// ---------------------------------------------------------------------------
// Performer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Performer {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub dob: Timestamp,
    pub party: Option<EntityId>,
}

impl Performer {
    pub const FIRST_NAME: Field<Performer, String> = Field::new("firstName", 0);
    pub const LAST_NAME: Field<Performer, String> = Field::new("lastName", 1);
    pub const DOB: Field<Performer, Timestamp> = Field::new("dob", 2);
    pub const PARTY: Relationship<Performer, Party> = Relationship::new("party", 3);
}

impl Entity for Performer {
    const NAME: &'static str = "Performer";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("firstName", DataType::String))
            .and_then(|b| b.add_field("lastName", DataType::String))
            .and_then(|b| b.add_field("dob", DataType::DateTime))
            .and_then(|b| b.add_relationship("party", DataType::Ref, Party::NAME))
            .map(|b| b.add_nullable(&["party"]).build())
            .unwrap()
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id(),
            first_name: Self::FIRST_NAME.read(record)?,
            last_name: Self::LAST_NAME.read(record)?,
            dob: Self::DOB.read(record)?,
            party: Self::PARTY.read_id(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(
            self.id,
            vec![
                Value::from(self.first_name.clone()),
                Value::from(self.last_name.clone()),
                Value::from(self.dob),
                self.party.map_or(Value::Null, Value::Ref),
            ],
        )
    }
}

#[derive(Default)]
pub struct PerformerQuery {
    pub first_name: Option<StringMatch>,
    pub last_name: Option<StringMatch>,
    pub dob: Option<Range<Timestamp>>,
    pub party: Option<EntityId>,
}

impl QueryGenerator for PerformerQuery {
    type Entity = Performer;

    fn predicate(&self) -> Option<Predicate> {
        compile([
            self.first_name
                .clone()
                .map(|m| Performer::FIRST_NAME.matching(m)),
            self.last_name
                .clone()
                .map(|m| Performer::LAST_NAME.matching(m)),
            self.dob.map(|r| Performer::DOB.within(r)),
            self.party.map(|id| Performer::PARTY.is_id(id)),
        ])
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PerformerRow {
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(
        rename = "D.O.B",
        deserialize_with = "tessera::procure::date::deserialize"
    )]
    pub dob: Timestamp,
}

/// A performer row resolved against the party it performs for.
pub struct PerformerImport<'a> {
    pub row: &'a PerformerRow,
    pub party: EntityId,
}

impl Recordable for PerformerImport<'_> {
    type Query = PerformerQuery;

    fn primary_key(&self) -> PerformerQuery {
        PerformerQuery {
            first_name: Some(StringMatch::exact(self.row.first_name.clone())),
            last_name: Some(StringMatch::exact(self.row.last_name.clone())),
            dob: Some(Range::around(self.row.dob, ONE_DAY_MS)),
            party: Some(self.party),
        }
    }

    fn update(&self, entity: &mut Performer) {
        entity.first_name = self.row.first_name.clone();
        entity.last_name = self.row.last_name.clone();
        entity.dob = self.row.dob;
        entity.party = Some(self.party);
    }
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Performance {
    pub id: EntityId,
    pub ability: String,
    pub group: String,
    pub performers: RefSet,
    pub event: Option<EntityId>,
}

impl Performance {
    pub const ABILITY: Field<Performance, String> = Field::new("ability", 0);
    pub const GROUP: Field<Performance, String> = Field::new("group", 1);
    pub const PERFORMERS: Relationship<Performance, Performer> =
        Relationship::new("performers", 2);
    pub const EVENT: Relationship<Performance, Event> = Relationship::new("event", 3);
}

impl Entity for Performance {
    const NAME: &'static str = "Performance";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("ability", DataType::String))
            .and_then(|b| b.add_field("group", DataType::String))
            .and_then(|b| b.add_relationship("performers", DataType::RefSet, Performer::NAME))
            .and_then(|b| b.add_relationship("event", DataType::Ref, Event::NAME))
            .map(|b| {
                b.set_default("ability", Value::from("Newcomer"))
                    .set_default("group", Value::from("Solo"))
                    .add_nullable(&["event"])
                    .build()
            })
            .unwrap()
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id(),
            ability: Self::ABILITY.read(record)?,
            group: Self::GROUP.read(record)?,
            performers: Self::PERFORMERS.read_ids(record)?,
            event: Self::EVENT.read_id(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(
            self.id,
            vec![
                Value::from(self.ability.clone()),
                Value::from(self.group.clone()),
                Value::RefSet(self.performers.clone()),
                self.event.map_or(Value::Null, Value::Ref),
            ],
        )
    }
}

#[derive(Default)]
pub struct PerformanceQuery {
    pub ability: Option<String>,
    pub group: Option<String>,
    pub performers: Option<Aggregate<Performer>>,
    pub event: Option<EntityId>,
}

impl QueryGenerator for PerformanceQuery {
    type Entity = Performance;

    fn predicate(&self) -> Option<Predicate> {
        compile([
            self.ability.clone().map(|v| Performance::ABILITY.equals(v)),
            self.group.clone().map(|v| Performance::GROUP.equals(v)),
            self.performers
                .clone()
                .map(|a| Performance::PERFORMERS.aggregate(a)),
            self.event.map(|id| Performance::EVENT.is_id(id)),
        ])
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PerformanceRow {
    #[serde(rename = "Ability")]
    pub ability: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "Performers")]
    pub performers: Vec<PerformerRow>,
}

impl Procurable for PerformanceRow {
    fn source() -> SourceLocator {
        fixture("Performances.json")
    }

    fn decode_config() -> DecodeConfig {
        day_first()
    }
}

/// A performance row resolved against its recorded performers and event.
pub struct PerformanceImport<'a> {
    pub row: &'a PerformanceRow,
    pub performers: RefSet,
    pub event: EntityId,
}

impl Recordable for PerformanceImport<'_> {
    type Query = PerformanceQuery;

    fn primary_key(&self) -> PerformanceQuery {
        PerformanceQuery {
            ability: Some(self.row.ability.clone()),
            group: Some(self.row.group.clone()),
            performers: Some(Aggregate::from_ids(
                AggregateOp::AllMatching,
                self.performers.iter().copied(),
            )),
            event: Some(self.event),
        }
    }

    fn update(&self, entity: &mut Performance) {
        entity.ability = self.row.ability.clone();
        entity.group = self.row.group.clone();
        entity.performers = self.performers.clone();
        entity.event = Some(self.event);
    }
}

// ---------------------------------------------------------------------------
// Fixture database
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub events: Vec<Event>,
    pub parties: Vec<Party>,
    pub performances: Vec<Performance>,
}

/// A store with every fixture entity registered and nothing stored.
pub fn empty_store() -> MemoryStore {
    init_logging();
    let store = MemoryStore::new();
    store.register_entity::<Event>().unwrap();
    store.register_entity::<Party>().unwrap();
    store.register_entity::<Performer>().unwrap();
    store.register_entity::<Performance>().unwrap();
    store
}

/// Archives events and parties, then records every performance with its
/// performers against the first event and party in one commit.
pub fn populate<C: Context + ?Sized>(ctx: &mut C) -> Result<Fixture> {
    let events = EventRow::archive(ctx)?;
    let parties = PartyRow::archive(ctx)?;
    let (Some(event), Some(party)) = (events.first(), parties.first()) else {
        return Err(Error::configuration("fixture needs an event and a party"));
    };

    let mut performances = Vec::new();
    for row in PerformanceRow::procure()? {
        let performers = row
            .performers
            .iter()
            .map(|performer| {
                PerformerImport {
                    row: performer,
                    party: party.id,
                }
                .record(&mut *ctx)
                .map(|p| p.id)
            })
            .collect::<Result<RefSet>>()?;
        let performance = PerformanceImport {
            row: &row,
            performers,
            event: event.id,
        }
        .record(&mut *ctx)?;
        performances.push(performance);
    }
    ctx.commit()?;
    Ok(Fixture {
        events,
        parties,
        performances,
    })
}

/// A store holding the whole fixture.
pub fn fixture_store() -> (MemoryStore, Fixture) {
    let store = empty_store();
    let fixture = populate(&mut store.context()).unwrap();
    (store, fixture)
}

pub fn performer(ctx: &MemoryContext, first_name: &str, last_name: &str) -> Performer {
    PerformerQuery {
        first_name: Some(StringMatch::exact(first_name)),
        last_name: Some(StringMatch::exact(last_name)),
        ..PerformerQuery::default()
    }
    .first(ctx)
    .unwrap()
    .unwrap()
}
