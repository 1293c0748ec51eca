//! Cross-crate behavior checks built on the testkit doubles.

use std::sync::Arc;
use std::time::Duration;

use keyfan::{
    DirectDispatcher, EventDispatcher, EventKind, InsertEvents, Inserter, LifecycleProducer,
    OpKind, Orchestrator, OrchestratorConfig, Phase, PubSubDispatcher, SerialContext, Store,
    Subscriber,
};
use keyfan_testkit::recorders::{CollectingSubscriber, ProbeProducer, RecordingDispatcher};
use keyfan_testkit::strategies::{FailingBackend, SlowInserter};
use proptest::prelude::*;

#[tokio::test]
async fn test_probe_pins_down_producer_order_asymmetry() {
    let store = Store::in_memory(|v: &String| v.clone());
    let log = ProbeProducer::log();
    let persistent = ProbeProducer::new("p", Arc::clone(&log));
    let call_scoped = ProbeProducer::new("q", Arc::clone(&log));

    store.add_insert_producer(persistent);
    store
        .insert(
            "v".to_string(),
            &[call_scoped as Arc<dyn InsertEvents<String, String>>],
        )
        .await
        .unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["p:insert:start", "q:insert:start", "q:insert:end", "p:insert:end"]
    );
}

#[tokio::test]
async fn test_recording_dispatcher_sees_full_lifecycle() {
    let store = Store::in_memory(|v: &String| v.clone());
    let recorder = RecordingDispatcher::new();
    store.set_dispatcher(Some(
        recorder.clone() as Arc<dyn EventDispatcher<String, String>>
    ));
    store.add_insert_producer(Arc::new(LifecycleProducer));
    store.add_delete_producer(Arc::new(LifecycleProducer));

    store.insert("v".to_string(), &[]).await.unwrap();
    store.delete("v".to_string(), &[]).await.unwrap();

    assert_eq!(
        recorder.kinds(),
        vec![
            EventKind::new(OpKind::Insert, Phase::Start),
            EventKind::new(OpKind::Insert, Phase::End),
            EventKind::new(OpKind::Delete, Phase::Start),
            EventKind::new(OpKind::Delete, Phase::End),
        ]
    );
}

#[tokio::test]
async fn test_collecting_subscriber_filters_by_kind() {
    let store = Store::in_memory(|v: &String| v.clone());
    let pubsub = Arc::new(PubSubDispatcher::new());
    let failed_only: Arc<CollectingSubscriber<String, String>> =
        CollectingSubscriber::for_kinds(vec![EventKind::new(OpKind::Insert, Phase::Failed)]);
    pubsub.register(failed_only.clone() as Arc<dyn Subscriber<String, String>>);
    store.set_dispatcher(Some(pubsub as Arc<dyn EventDispatcher<String, String>>));
    store.add_insert_producer(Arc::new(LifecycleProducer));

    store.insert("v".to_string(), &[]).await.unwrap();
    assert!(failed_only.seen().is_empty());

    let failing = Store::builder()
        .inserter(Arc::new(FailingBackend::new("down"))
            as Arc<dyn Inserter<String, String>>)
        .build();
    let pubsub = Arc::new(PubSubDispatcher::new());
    pubsub.register(failed_only.clone() as Arc<dyn Subscriber<String, String>>);
    failing.set_dispatcher(Some(pubsub as Arc<dyn EventDispatcher<String, String>>));
    failing.add_insert_producer(Arc::new(LifecycleProducer));

    failing.insert("v".to_string(), &[]).await.unwrap_err();
    let seen = failed_only.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].kind(),
        EventKind::new(OpKind::Insert, Phase::Failed)
    );
}

#[tokio::test]
async fn test_direct_dispatcher_hears_unfiltered_stream() {
    let store = Store::in_memory(|v: &String| v.clone());
    let direct = Arc::new(DirectDispatcher::new());
    let all: Arc<CollectingSubscriber<String, String>> = CollectingSubscriber::all();
    direct.register(all.clone() as Arc<dyn Subscriber<String, String>>);
    store.set_dispatcher(Some(direct as Arc<dyn EventDispatcher<String, String>>));
    store.add_update_producer(Arc::new(LifecycleProducer));

    store
        .update("k".to_string(), "v".to_string(), &[])
        .await
        .unwrap();
    assert_eq!(all.seen().len(), 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Slots always line up with registration order, whatever the per-store
    /// delays and however many stores a segment holds.
    #[test]
    fn fanout_slots_follow_registration_order(
        delays in (0usize..6).prop_flat_map(keyfan_testkit::delay_schedule)
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async move {
            let orchestrator = Orchestrator::new(OrchestratorConfig::default());
            for (index, delay) in delays.iter().enumerate() {
                let inserter = SlowInserter::new(
                    index as u64,
                    Duration::from_millis(*delay),
                );
                let store = Arc::new(
                    Store::builder()
                        .inserter(Arc::new(inserter) as Arc<dyn Inserter<u64, String>>)
                        .build(),
                );
                orchestrator.add_store_on("s", store, Arc::new(SerialContext::new()));
            }

            let slots = orchestrator
                .insert("s", "v".to_string(), Vec::new())
                .get()
                .await
                .unwrap();

            let keys: Vec<u64> = slots
                .iter()
                .map(|slot| *slot.as_ref().unwrap())
                .collect();
            let expected: Vec<u64> = (0..delays.len() as u64).collect();
            assert_eq!(keys, expected);
        });
    }
}
