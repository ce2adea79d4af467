use serde::{de, Deserialize, Deserializer, Serialize};

use crate::constants::LOG_PRECISION;
use crate::types::*;

/// Round to `places` decimals, ties toward +infinity (the browser `Math.round`
/// rule), with negative zero folded into zero.
pub fn round_to_precision(value: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    let scaled = value * p;
    let mut r = scaled.floor();
    if scaled - r >= 0.5 {
        r += 1.0;
    }
    let out = r / p;
    if out == 0.0 {
        0.0
    } else {
        out
    }
}

/// [`round_to_precision`] at the event log precision.
pub fn round_log(value: f64) -> f64 {
    round_to_precision(value, LOG_PRECISION)
}

// ── Payloads ────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnData {
    pub id: String,
    pub kind: EntityKind,
    pub x: f64,
    pub z: f64,
    pub vx: f64,
    pub vz: f64,
    pub health: Option<Health>,
}

impl SpawnData {
    pub fn from_entity(e: &Entity) -> Self {
        SpawnData {
            id: e.id.clone(),
            kind: e.kind(),
            x: round_log(e.pos.x),
            z: round_log(e.pos.z),
            vx: round_log(e.vel.x),
            vz: round_log(e.vel.z),
            health: e.health(),
        }
    }
}

/// Both sides as they were before the rule table touched them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollisionData {
    pub a: String,
    pub a_kind: EntityKind,
    pub a_health: Option<Health>,
    pub b: String,
    pub b_kind: EntityKind,
    pub b_health: Option<Health>,
}

impl CollisionData {
    pub fn between(a: &Entity, b: &Entity) -> Self {
        CollisionData {
            a: a.id.clone(),
            a_kind: a.kind(),
            a_health: a.health(),
            b: b.id.clone(),
            b_kind: b.kind(),
            b_health: b.health(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalReason {
    KilledByParticipant,
    Consumed,
    Eliminated,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveData {
    pub id: String,
    pub kind: EntityKind,
    pub reason: RemovalReason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotEntry {
    pub id: String,
    pub kind: EntityKind,
    pub x: f64,
    pub z: f64,
    pub health: Option<Health>,
}

impl SnapshotEntry {
    pub fn from_entity(e: &Entity) -> Self {
        SnapshotEntry {
            id: e.id.clone(),
            kind: e.kind(),
            x: round_log(e.pos.x),
            z: round_log(e.pos.z),
            health: e.health(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FinalSnapshot {
    pub total_ticks: Tick,
    pub snapshot: Vec<SnapshotEntry>,
}

impl FinalSnapshot {
    /// Entries sorted by kind name then id, plain byte order.
    pub fn capture(total_ticks: Tick, entities: &[Entity]) -> Self {
        let mut snapshot: Vec<SnapshotEntry> = entities.iter().map(SnapshotEntry::from_entity).collect();
        snapshot.sort_by(|a, b| (a.kind.as_str(), &a.id).cmp(&(b.kind.as_str(), &b.id)));
        FinalSnapshot { total_ticks, snapshot }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum EventData {
    Spawn(SpawnData),
    Collision(CollisionData),
    Remove(RemoveData),
    FinalSnapshot(FinalSnapshot),
}

/// One log record. Serializes as `{"tick":..,"kind":..,"payload":{..}}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub tick: Tick,
    #[serde(flatten)]
    pub data: EventData,
}

/// Wire form of [`Event`]. `flatten` cannot be combined with
/// `deny_unknown_fields`, so the record is read with all three keys spelled
/// out and the tagged payload is rebuilt from them.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEvent {
    tick: Tick,
    kind: String,
    payload: serde_json::Value,
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEvent::deserialize(deserializer)?;
        let tagged = serde_json::json!({ "kind": raw.kind, "payload": raw.payload });
        let data = EventData::deserialize(tagged).map_err(de::Error::custom)?;
        Ok(Event { tick: raw.tick, data })
    }
}

// ── Log ─────────────────────────────────────────────────────

/// Append-only, tick-ordered record of everything that changed the world.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Ticks must not go backwards.
    pub fn record(&mut self, tick: Tick, data: EventData) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.tick <= tick),
            "event log tick went backwards"
        );
        self.events.push(Event { tick, data });
    }

    pub fn spawn(&mut self, tick: Tick, e: &Entity) {
        self.record(tick, EventData::Spawn(SpawnData::from_entity(e)));
    }

    pub fn collision(&mut self, tick: Tick, a: &Entity, b: &Entity) {
        self.record(tick, EventData::Collision(CollisionData::between(a, b)));
    }

    pub fn remove(&mut self, tick: Tick, e: &Entity, reason: RemovalReason) {
        self.record(
            tick,
            EventData::Remove(RemoveData {
                id: e.id.clone(),
                kind: e.kind(),
                reason,
            }),
        );
    }

    pub fn final_snapshot(&mut self, tick: Tick, entities: &[Entity]) {
        self.record(tick, EventData::FinalSnapshot(FinalSnapshot::capture(tick, entities)));
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }
}

impl From<Vec<Event>> for EventLog {
    fn from(events: Vec<Event>) -> Self {
        EventLog { events }
    }
}
