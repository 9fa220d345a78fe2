//! Sectioned snapshots and the raw events between two of them.
//!
//! A live query's results are kept as sections: consecutive runs of records
//! sharing one section-key value. On commit the store diffs the old and new
//! snapshot of every affected query and replays the difference to the
//! query's observer as one raw cycle.
//!
//! Records present in both snapshots stay in place when they form the
//! longest run whose relative order is unchanged and keep their section key;
//! every other surviving record is reported as a move.

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;
use tessera_core::{EntityId, FieldPath, Record, Value};
use tessera_reactive::{IndexPath, RawObjectChange, RawObserver, RawSectionChange, Section};

/// One raw call, in delivery order.
#[derive(Clone, Debug, PartialEq)]
pub enum RawEvent {
    Section(RawSectionChange),
    Object(RawObjectChange),
}

/// Groups sorted `records` into sections by `key`.
///
/// Without a key all records form one section; no records form no sections.
pub fn sectionize(records: Vec<Record>, key: Option<FieldPath>) -> Vec<Section> {
    let Some(key) = key else {
        return if records.is_empty() {
            Vec::new()
        } else {
            vec![Section::new(None, records)]
        };
    };
    let mut sections: Vec<Section> = Vec::new();
    for record in records {
        let value = key.get(&record).cloned().unwrap_or(Value::Null);
        match sections.last_mut() {
            Some(last) if last.key.as_ref() == Some(&value) => last.records.push(record),
            _ => sections.push(Section::new(Some(value), vec![record])),
        }
    }
    sections
}

/// Section identity: key plus occurrence, so repeated runs stay distinct.
fn section_idents(sections: &[Section]) -> Vec<(Option<Value>, usize)> {
    let mut seen: HashMap<Option<Value>, usize> = HashMap::new();
    sections
        .iter()
        .map(|s| {
            let n = seen.entry(s.key.clone()).or_insert(0);
            let ident = (s.key.clone(), *n);
            *n += 1;
            ident
        })
        .collect()
}

struct Placed<'a> {
    path: IndexPath,
    flat: usize,
    key: &'a Option<Value>,
    record: &'a Record,
}

fn place(sections: &[Section]) -> HashMap<EntityId, Placed<'_>> {
    let mut out = HashMap::new();
    let mut flat = 0;
    for (s, section) in sections.iter().enumerate() {
        for (r, record) in section.records.iter().enumerate() {
            out.insert(
                record.id(),
                Placed {
                    path: IndexPath::new(s, r),
                    flat,
                    key: &section.key,
                    record,
                },
            );
            flat += 1;
        }
    }
    out
}

/// Positions in `seq` of one longest strictly increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<usize> {
    // tails[k]: index in seq of the smallest tail of an increasing run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (i, &v) in seq.iter().enumerate() {
        let k = tails.partition_point(|&t| seq[t] < v);
        if k > 0 {
            prev[i] = Some(tails[k - 1]);
        }
        if k == tails.len() {
            tails.push(i);
        } else {
            tails[k] = i;
        }
    }
    let mut out = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        out.push(i);
        cursor = prev[i];
    }
    out.reverse();
    out
}

/// The raw events turning `old` into `new`.
///
/// Order: object deletes, then per new section its insert followed by the
/// moves and inserts landing in it, then updates, then section deletes.
/// A changed record that also moved is reported only as a move.
pub fn diff(old: &[Section], new: &[Section]) -> Vec<RawEvent> {
    let old_places = place(old);
    let new_places = place(new);

    // Survivors in new order, and which of them stay put.
    let mut survivors: Vec<EntityId> = Vec::new();
    for section in new {
        for record in &section.records {
            if old_places.contains_key(&record.id()) {
                survivors.push(record.id());
            }
        }
    }
    let flats: Vec<usize> = survivors.iter().map(|id| old_places[id].flat).collect();
    let mut stable: hashbrown::HashSet<EntityId> = longest_increasing(&flats)
        .into_iter()
        .map(|i| survivors[i])
        .collect();
    stable.retain(|id| old_places[id].key == new_places[id].key);

    let mut events = Vec::new();

    for (s, section) in old.iter().enumerate() {
        for (r, record) in section.records.iter().enumerate() {
            if !new_places.contains_key(&record.id()) {
                events.push(RawEvent::Object(RawObjectChange::delete(
                    IndexPath::new(s, r),
                    record.clone(),
                )));
            }
        }
    }

    let old_idents = section_idents(old);
    let new_idents = section_idents(new);
    for (s, section) in new.iter().enumerate() {
        if !old_idents.contains(&new_idents[s]) {
            events.push(RawEvent::Section(RawSectionChange::insert(
                s,
                section.key.clone(),
            )));
        }
        for (r, record) in section.records.iter().enumerate() {
            let at = IndexPath::new(s, r);
            match old_places.get(&record.id()) {
                None => events.push(RawEvent::Object(RawObjectChange::insert(at, record.clone()))),
                Some(was) if !stable.contains(&record.id()) => events.push(RawEvent::Object(
                    RawObjectChange::moved(was.path, at, record.clone()),
                )),
                Some(_) => {}
            }
        }
    }

    for section in new {
        for record in &section.records {
            if !stable.contains(&record.id()) {
                continue;
            }
            let was = &old_places[&record.id()];
            let now = &new_places[&record.id()];
            if was.record.version() != record.version() || was.record.values() != record.values() {
                events.push(RawEvent::Object(RawObjectChange::update(
                    was.path,
                    now.path,
                    record.clone(),
                )));
            }
        }
    }

    for (s, section) in old.iter().enumerate() {
        if !new_idents.contains(&old_idents[s]) {
            events.push(RawEvent::Section(RawSectionChange::delete(
                s,
                section.key.clone(),
            )));
        }
    }
    events
}

/// Drives `observer` through one cycle carrying `events`.
pub fn deliver(observer: &mut dyn RawObserver, events: Vec<RawEvent>, total: usize) {
    observer.will_change_content();
    for event in events {
        match event {
            RawEvent::Section(change) => observer.did_change_section(change),
            RawEvent::Object(change) => observer.did_change_object(change),
        }
    }
    observer.did_change_content(total);
}
