//! A minimal in-memory `Context` and fixture entities for query tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use tessera_core::schema::{Schema, SchemaBuilder};
use tessera_core::{
    next_entity_id, DataType, Entity, EntityId, Error, Field, Record, RefSet, Relationship,
    Result, Value,
};
use tessera_query::ast::{
    Aggregate, FieldPredicates, Predicate, RelationshipPredicates, StringMatch, TextPredicates,
};
use tessera_query::{compile, Context, FetchRequest, QueryGenerator, Recordable};

/// Committed records plus a staged overlay, keyed by entity name.
#[derive(Default)]
pub struct VecContext {
    pub committed: BTreeMap<&'static str, BTreeMap<EntityId, Record>>,
    pub staged: BTreeMap<(String, EntityId), Option<Record>>,
    pub commits: usize,
    pub fail_fetch: bool,
}

impl VecContext {
    fn visible(&self, entity: &str) -> BTreeMap<EntityId, Record> {
        let mut rows = self.committed.get(entity).cloned().unwrap_or_default();
        for ((name, id), change) in &self.staged {
            if name == entity {
                match change {
                    Some(record) => rows.insert(*id, record.clone()),
                    None => rows.remove(id),
                };
            }
        }
        rows
    }

    fn schema(entity: &str) -> Result<Schema> {
        match entity {
            Performer::NAME => Ok(Performer::schema()),
            Performance::NAME => Ok(Performance::schema()),
            other => Err(Error::unknown_entity(other)),
        }
    }
}

impl Context for VecContext {
    fn count(&self, entity: &str, predicate: Option<&Predicate>) -> Result<usize> {
        Ok(self
            .visible(entity)
            .values()
            .filter(|r| predicate.map_or(true, |p| p.eval(r)))
            .count())
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>> {
        if self.fail_fetch {
            return Err(Error::store("fetch", "unavailable"));
        }
        Ok(request.execute(self.visible(&request.entity).values()))
    }

    fn construct(&mut self, entity: &str) -> Result<Record> {
        let record = Self::schema(entity)?.new_record(next_entity_id());
        self.staged
            .insert((entity.to_string(), record.id()), Some(record.clone()));
        Ok(record)
    }

    fn stage(&mut self, entity: &str, record: Record) -> Result<()> {
        self.staged
            .insert((entity.to_string(), record.id()), Some(record));
        Ok(())
    }

    fn delete(&mut self, entity: &str, id: EntityId) -> Result<()> {
        self.staged.insert((entity.to_string(), id), None);
        Ok(())
    }

    fn has_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    fn commit(&mut self) -> Result<()> {
        for ((name, id), change) in std::mem::take(&mut self.staged) {
            let table = match name.as_str() {
                Performer::NAME => self.committed.entry(Performer::NAME).or_default(),
                Performance::NAME => self.committed.entry(Performance::NAME).or_default(),
                other => return Err(Error::unknown_entity(other)),
            };
            match change {
                Some(record) => table.insert(id, record),
                None => table.remove(&id),
            };
        }
        self.commits += 1;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Performance {
    pub id: EntityId,
    pub group: String,
}

impl Performance {
    pub const GROUP: Field<Performance, String> = Field::new("group", 0);
}

impl Entity for Performance {
    const NAME: &'static str = "Performance";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("group", DataType::String))
            .map(|b| b.build())
            .unwrap()
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id(),
            group: Self::GROUP.read(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(self.id, vec![Value::from(self.group.clone())])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Performer {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub performances: RefSet,
}

impl Performer {
    pub const FIRST_NAME: Field<Performer, String> = Field::new("firstName", 0);
    pub const LAST_NAME: Field<Performer, String> = Field::new("lastName", 1);
    pub const PERFORMANCES: Relationship<Performer, Performance> =
        Relationship::new("performances", 2);
}

impl Entity for Performer {
    const NAME: &'static str = "Performer";

    fn schema() -> Schema {
        SchemaBuilder::new(Self::NAME)
            .and_then(|b| b.add_field("firstName", DataType::String))
            .and_then(|b| b.add_field("lastName", DataType::String))
            .and_then(|b| b.add_relationship("performances", DataType::RefSet, "Performance"))
            .map(|b| b.build())
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
            performances: Self::PERFORMANCES.read_ids(record)?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new(
            self.id,
            vec![
                Value::from(self.first_name.clone()),
                Value::from(self.last_name.clone()),
                Value::RefSet(self.performances.clone()),
            ],
        )
    }
}

#[derive(Default)]
pub struct PerformerQuery {
    pub first_name: Option<StringMatch>,
    pub last_name: Option<String>,
    pub performances: Option<Aggregate<Performance>>,
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
                .map(|v| Performer::LAST_NAME.equals(v)),
            self.performances
                .clone()
                .map(|a| Performer::PERFORMANCES.aggregate(a)),
        ])
    }
}

/// An imported performer row.
#[derive(Clone, Debug)]
pub struct PerformerRow {
    pub first_name: String,
    pub last_name: String,
}

impl Recordable for PerformerRow {
    type Query = PerformerQuery;

    fn primary_key(&self) -> PerformerQuery {
        PerformerQuery {
            first_name: Some(StringMatch::exact(self.first_name.clone())),
            last_name: Some(self.last_name.clone()),
            ..Default::default()
        }
    }

    fn update(&self, entity: &mut Performer) {
        entity.first_name = self.first_name.clone();
        entity.last_name = self.last_name.clone();
    }
}

/// Inserts and commits a performer with the given performances.
pub fn seed_performer(
    ctx: &mut VecContext,
    first: &str,
    last: &str,
    performances: &[EntityId],
) -> Performer {
    let performer = Performer {
        id: next_entity_id(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        performances: performances.iter().copied().collect(),
    };
    ctx.stage(Performer::NAME, performer.to_record()).unwrap();
    ctx.commit().unwrap();
    performer
}
