//! Lifecycle events emitted by store operations.
//!
//! Every store operation is one of four kinds (insert, query, update, delete)
//! and moves through phases (start, progress, end, failed). An [`Event`]
//! captures one phase of one call, together with the call's key and, depending
//! on the variant, its value, affected count, progress fraction, or failure
//! message.
//!
//! [`EventKind`] is the fieldless projection of an event: a plain
//! `(op, phase)` pair that is `Copy + Eq + Hash` and therefore usable as a
//! subscription-table key. Dispatchers route on kinds, never on concrete
//! runtime types.

use std::fmt;

/// The four operation kinds a store supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Insert,
    Query,
    Update,
    Delete,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpKind::Insert => "insert",
            OpKind::Query => "query",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// The lifecycle phase of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    Progress,
    End,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Start => "start",
            Phase::Progress => "progress",
            Phase::End => "end",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A fieldless event kind: operation × phase.
///
/// Used as the key of per-kind subscription tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind {
    pub op: OpKind,
    pub phase: Phase,
}

impl EventKind {
    /// Create an event kind from its two components.
    pub const fn new(op: OpKind, phase: Phase) -> Self {
        Self { op, phase }
    }

    /// All sixteen event kinds, in operation-major order.
    pub fn all() -> [EventKind; 16] {
        let ops = [OpKind::Insert, OpKind::Query, OpKind::Update, OpKind::Delete];
        let phases = [Phase::Start, Phase::Progress, Phase::End, Phase::Failed];

        let mut out = [EventKind::new(OpKind::Insert, Phase::Start); 16];
        let mut i = 0;
        for op in ops {
            for phase in phases {
                out[i] = EventKind::new(op, phase);
                i += 1;
            }
        }
        out
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.op, self.phase)
    }
}

/// An immutable lifecycle event for a single store call.
///
/// Generic over the store's key type `K` and value type `V`. Events own
/// clones of the data they carry; they are safe to hand to dispatchers and
/// subscribers on other execution contexts.
///
/// A single store call never produces both an `*End` and a `*Failed` event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<K, V> {
    InsertStart { value: V },
    InsertProgress { value: V, fraction: f64 },
    InsertEnd { key: K, value: V },
    InsertFailed { value: V, message: String },

    QueryStart { key: K },
    QueryProgress { key: K, fraction: f64 },
    QueryEnd { key: K },
    QueryFailed { key: K, message: String },

    UpdateStart { key: K, value: V },
    UpdateProgress { key: K, fraction: f64 },
    UpdateEnd { key: K, value: V, count: u64 },
    UpdateFailed { key: K, value: V, message: String },

    DeleteStart { key: K },
    DeleteProgress { key: K, fraction: f64 },
    DeleteEnd { key: K, count: u64 },
    DeleteFailed { key: K, message: String },
}

impl<K, V> Event<K, V> {
    /// The fieldless kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::InsertStart { .. } => EventKind::new(OpKind::Insert, Phase::Start),
            Event::InsertProgress { .. } => EventKind::new(OpKind::Insert, Phase::Progress),
            Event::InsertEnd { .. } => EventKind::new(OpKind::Insert, Phase::End),
            Event::InsertFailed { .. } => EventKind::new(OpKind::Insert, Phase::Failed),

            Event::QueryStart { .. } => EventKind::new(OpKind::Query, Phase::Start),
            Event::QueryProgress { .. } => EventKind::new(OpKind::Query, Phase::Progress),
            Event::QueryEnd { .. } => EventKind::new(OpKind::Query, Phase::End),
            Event::QueryFailed { .. } => EventKind::new(OpKind::Query, Phase::Failed),

            Event::UpdateStart { .. } => EventKind::new(OpKind::Update, Phase::Start),
            Event::UpdateProgress { .. } => EventKind::new(OpKind::Update, Phase::Progress),
            Event::UpdateEnd { .. } => EventKind::new(OpKind::Update, Phase::End),
            Event::UpdateFailed { .. } => EventKind::new(OpKind::Update, Phase::Failed),

            Event::DeleteStart { .. } => EventKind::new(OpKind::Delete, Phase::Start),
            Event::DeleteProgress { .. } => EventKind::new(OpKind::Delete, Phase::Progress),
            Event::DeleteEnd { .. } => EventKind::new(OpKind::Delete, Phase::End),
            Event::DeleteFailed { .. } => EventKind::new(OpKind::Delete, Phase::Failed),
        }
    }

    /// The operation this event belongs to.
    pub fn op(&self) -> OpKind {
        self.kind().op
    }

    /// The lifecycle phase of this event.
    pub fn phase(&self) -> Phase {
        self.kind().phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_kinds_distinct() {
        let all = EventKind::all();
        let set: HashSet<EventKind> = all.iter().copied().collect();
        assert_eq!(set.len(), 16);
    }

    #[test]
    fn test_event_kind_projection() {
        let ev: Event<String, u32> = Event::UpdateEnd {
            key: "k".into(),
            value: 7,
            count: 1,
        };
        assert_eq!(ev.kind(), EventKind::new(OpKind::Update, Phase::End));
        assert_eq!(ev.op(), OpKind::Update);
        assert_eq!(ev.phase(), Phase::End);
    }

    #[test]
    fn test_kind_display() {
        let kind = EventKind::new(OpKind::Delete, Phase::Failed);
        assert_eq!(kind.to_string(), "delete/failed");
    }
}
