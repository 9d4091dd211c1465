/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use integration_test_utils::{metadata_event, test_pubkey, FakeRelayPool};
use relay_resolver::{MetadataLoader, ProfileMetadata, RelayCode, RelayPool, METADATA};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PROFILE_RELAY_A: &str = "wss://profiles-a.example";
const PROFILE_RELAY_B: &str = "wss://profiles-b.example";

fn make_loader(pool: Arc<FakeRelayPool>) -> MetadataLoader {
    let pool: Arc<dyn RelayPool> = pool;
    MetadataLoader::new(
        pool,
        vec![PROFILE_RELAY_A.to_string(), PROFILE_RELAY_B.to_string()],
        Duration::ZERO,
    )
}

#[tokio::test]
async fn batch_answers_known_keys_and_defaults_the_rest() {
    integration_test_utils::init_logging();

    let (a, b, c) = (test_pubkey(0xa), test_pubkey(0xb), test_pubkey(0xc));
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(
        PROFILE_RELAY_A,
        metadata_event(&a, 10, json!({ "name": "alice", "display_name": "Alice" })),
    );
    pool.store(
        PROFILE_RELAY_B,
        metadata_event(&b, 10, json!({ "name": "bob", "picture": "https://b.img" })),
    );
    let loader = make_loader(pool.clone());

    let (record_a, record_b, record_c) =
        tokio::join!(loader.load(a.clone()), loader.load(b.clone()), loader.load(c.clone()));

    let record_a = record_a.expect("a should resolve");
    assert_eq!(record_a.name.as_deref(), Some("alice"));
    assert_eq!(record_a.display_name.as_deref(), Some("Alice"));
    assert_eq!(record_a.groups, Some(vec![]));
    assert_eq!(record_a.write_relays, Some(vec![]));

    let record_b = record_b.expect("b should resolve");
    assert_eq!(record_b.picture.as_deref(), Some("https://b.img"));

    assert_eq!(
        record_c.expect("c should resolve"),
        ProfileMetadata::minimal(c.clone())
    );

    assert_eq!(pool.subscribe_calls(), 1);
    let filters = pool.filters();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].kinds, vec![METADATA]);
    assert_eq!(filters[0].authors, vec![a, b, c]);
}

#[tokio::test]
async fn concurrent_callers_for_one_key_get_equal_records() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(PROFILE_RELAY_A, metadata_event(&a, 10, json!({ "name": "alice" })));
    let loader = make_loader(pool.clone());

    let (first, second, third) = tokio::join!(
        loader.load(a.clone()),
        loader.load(a.clone()),
        loader.load(a.clone())
    );

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(pool.subscribe_calls(), 1);
    assert_eq!(pool.filters()[0].authors, vec![a]);
}

#[tokio::test]
async fn newest_record_wins_across_relays() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(PROFILE_RELAY_A, metadata_event(&a, 20, json!({ "name": "newer" })));
    pool.store(PROFILE_RELAY_B, metadata_event(&a, 10, json!({ "name": "older" })));
    let loader = make_loader(pool);

    let record = loader.load(a).await.unwrap();

    assert_eq!(record.name.as_deref(), Some("newer"));
}

#[tokio::test]
async fn malformed_payload_is_treated_as_unanswered() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    let mut broken = metadata_event(&a, 10, json!({}));
    broken.content = "{\"name\":".to_string();
    pool.store(PROFILE_RELAY_A, broken);
    let loader = make_loader(pool);

    let record = loader.load(a.clone()).await.unwrap();

    assert_eq!(record, ProfileMetadata::minimal(a));
}

#[tokio::test]
async fn relay_closing_without_eose_still_completes_batch() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(PROFILE_RELAY_B, metadata_event(&a, 10, json!({ "name": "alice" })));
    pool.close_without_eose(PROFILE_RELAY_A);
    let loader = make_loader(pool);

    let record = tokio::time::timeout(Duration::from_secs(1), loader.load(a))
        .await
        .expect("batch should close")
        .unwrap();

    assert_eq!(record.name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn subscription_failure_reaches_every_caller_in_batch() {
    integration_test_utils::init_logging();

    let pool = Arc::new(FakeRelayPool::new());
    pool.fail_subscriptions();
    let loader = make_loader(pool.clone());

    let (first, second) = tokio::join!(
        loader.load(test_pubkey(0xa)),
        loader.load(test_pubkey(0xb))
    );

    let first = first.expect_err("first caller should fail");
    let second = second.expect_err("second caller should fail");
    assert_eq!(first.code, RelayCode::Unavailable);
    assert_eq!(first, second);
    assert_eq!(pool.subscribe_calls(), 1);
}

#[tokio::test]
async fn each_tick_queries_again() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    let loader = make_loader(pool.clone());

    let before = loader.load(a.clone()).await.unwrap();
    pool.store(PROFILE_RELAY_A, metadata_event(&a, 10, json!({ "name": "late" })));
    let after = loader.load(a).await.unwrap();

    assert_eq!(before.name, None);
    assert_eq!(after.name.as_deref(), Some("late"));
    assert_eq!(pool.subscribe_calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_query_per_tick_on_multi_threaded_runtime() {
    integration_test_utils::init_logging();

    let (a, b, c) = (test_pubkey(0xa), test_pubkey(0xb), test_pubkey(0xc));
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(PROFILE_RELAY_A, metadata_event(&a, 10, json!({ "name": "alice" })));
    let loader = make_loader(pool.clone());

    for round in 1..=200 {
        let (record_a, record_b, record_c) =
            tokio::join!(loader.load(a.clone()), loader.load(b.clone()), loader.load(c.clone()));

        assert_eq!(record_a.unwrap().name.as_deref(), Some("alice"));
        assert_eq!(record_b.unwrap(), ProfileMetadata::minimal(b.clone()));
        assert_eq!(record_c.unwrap(), ProfileMetadata::minimal(c.clone()));
        assert_eq!(pool.subscribe_calls(), round);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn duplicate_keys_share_one_record_on_multi_threaded_runtime() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(PROFILE_RELAY_A, metadata_event(&a, 10, json!({ "name": "alice" })));
    let loader = make_loader(pool.clone());

    let (first, second) = tokio::join!(loader.load(a.clone()), loader.load(a.clone()));

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(pool.subscribe_calls(), 1);
}

#[tokio::test]
async fn caller_giving_up_does_not_cancel_batch() {
    integration_test_utils::init_logging();

    let (a, b) = (test_pubkey(0xa), test_pubkey(0xb));
    let pool = Arc::new(FakeRelayPool::new());
    pool.set_subscribe_latency(Duration::from_millis(50));
    pool.store(PROFILE_RELAY_A, metadata_event(&b, 10, json!({ "name": "bob" })));
    let loader = make_loader(pool.clone());

    let (abandoned, kept) = futures::join!(
        tokio::time::timeout(Duration::from_millis(10), loader.load(a.clone())),
        loader.load(b.clone())
    );

    assert!(abandoned.is_err(), "first caller should have given up");
    assert_eq!(kept.unwrap().name.as_deref(), Some("bob"));
    assert_eq!(pool.subscribe_calls(), 1);
    assert_eq!(pool.filters()[0].authors, vec![a, b]);
}
