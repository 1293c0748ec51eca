//! Proptest generators for property-based testing.

use proptest::prelude::*;

use keyfan_core::{EventKind, OpKind, Phase};

/// Generate an operation kind.
pub fn op_kind() -> impl Strategy<Value = OpKind> {
    prop_oneof![
        Just(OpKind::Insert),
        Just(OpKind::Query),
        Just(OpKind::Update),
        Just(OpKind::Delete),
    ]
}

/// Generate a lifecycle phase.
pub fn phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::Start),
        Just(Phase::Progress),
        Just(Phase::End),
        Just(Phase::Failed),
    ]
}

/// Generate an event kind.
pub fn event_kind() -> impl Strategy<Value = EventKind> {
    (op_kind(), phase()).prop_map(|(op, phase)| EventKind::new(op, phase))
}

/// Generate a plausible segment name.
pub fn segment_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}"
}

/// Generate a per-store delay schedule of the given length, in milliseconds.
pub fn delay_schedule(len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..25, len)
}
