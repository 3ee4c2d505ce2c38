//! Session registry properties
//!
//! Random subscribe/unsubscribe sequences are replayed against a plain
//! `HashSet` model; the registry must agree with it after every step.

use std::collections::HashSet;

use proptest::prelude::*;
use tokio::sync::mpsc;
use yamba_management::backend::realtime::{CloseStatus, SessionId, SessionRegistry};

#[derive(Debug, Clone)]
enum Op {
    Subscribe(String),
    Unsubscribe(String),
}

fn topic() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/api/user".to_string()),
        Just("/api/group".to_string()),
        Just("/api/instance".to_string()),
        "/[a-z]{1,8}",
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        topic().prop_map(Op::Subscribe),
        topic().prop_map(Op::Unsubscribe),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn registry_matches_set_model(ops in proptest::collection::vec(op(), 0..40)) {
        runtime().block_on(async {
            let registry = SessionRegistry::new();
            let id = SessionId::new();
            let (tx, _rx) = mpsc::unbounded_channel();
            registry.on_connect(id, tx).await.unwrap();

            let mut model = HashSet::new();
            for op in ops {
                let (changed, expected) = match op {
                    Op::Subscribe(topic) => {
                        let changed = registry.subscribe(id, &topic).await.unwrap();
                        (changed, model.insert(topic))
                    }
                    Op::Unsubscribe(topic) => {
                        let changed = registry.unsubscribe(id, &topic).await.unwrap();
                        (changed, model.remove(&topic))
                    }
                };
                assert_eq!(changed, expected);
                assert_eq!(registry.subscriptions(id).await.unwrap(), model);
            }

            for topic in &model {
                let subscribers = registry.subscribers(topic).await;
                assert_eq!(subscribers.len(), 1);
                assert_eq!(subscribers[0].0, id);
            }

            assert!(registry.on_disconnect(id, CloseStatus::NORMAL).await);
            assert_eq!(registry.session_count().await, 0);
            for topic in &model {
                assert!(registry.subscribers(topic).await.is_empty());
            }
        });
    }

    #[test]
    fn sessions_are_isolated(topics_a in proptest::collection::hash_set(topic(), 0..5),
                             topics_b in proptest::collection::hash_set(topic(), 0..5)) {
        runtime().block_on(async {
            let registry = SessionRegistry::new();
            let (a, b) = (SessionId::new(), SessionId::new());
            let (tx_a, _rx_a) = mpsc::unbounded_channel();
            let (tx_b, _rx_b) = mpsc::unbounded_channel();
            registry.on_connect(a, tx_a).await.unwrap();
            registry.on_connect(b, tx_b).await.unwrap();

            for topic in &topics_a {
                registry.subscribe(a, topic).await.unwrap();
            }
            for topic in &topics_b {
                registry.subscribe(b, topic).await.unwrap();
            }

            assert_eq!(registry.subscriptions(a).await.unwrap(), topics_a);
            assert_eq!(registry.subscriptions(b).await.unwrap(), topics_b);

            registry.on_disconnect(a, CloseStatus(4000)).await;
            assert_eq!(registry.subscriptions(b).await.unwrap(), topics_b);
            assert!(registry.subscriptions(a).await.is_none());
        });
    }
}
