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

use integration_test_utils::{
    metadata_event, relay_list_event, test_pubkey, unsigned_note, wait_until, FakeRelayPool,
    FakeSigner,
};
use relay_resolver::{MemorySessionStore, NostrClient, ProfileMetadata, ResolverConfig};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn make_client(pool: Arc<FakeRelayPool>, me: u8) -> NostrClient {
    let config = ResolverConfig::from_json5_str(
        r#"{
            profile_relays: ["wss://profiles.example"],
            relay_list_relays: ["wss://lists.example"],
            repository_relays: ["wss://repo-a.example", "wss://repo-b.example"],
            signer_startup_delay_ms: 0,
        }"#,
    )
    .expect("test config should parse");

    NostrClient::new(
        &config,
        pool,
        Arc::new(FakeSigner::new(test_pubkey(me))),
        Arc::new(MemorySessionStore::default()),
    )
}

#[tokio::test]
async fn resolvers_use_their_own_relay_sets() {
    integration_test_utils::init_logging();

    let a = test_pubkey(0xa);
    let pool = Arc::new(FakeRelayPool::new());
    pool.store(
        "wss://profiles.example",
        metadata_event(&a, 10, json!({ "name": "alice" })),
    );
    pool.store(
        "wss://lists.example",
        relay_list_event(&a, &[("wss://home.example", None)]),
    );
    // Records on the wrong relay set must not be found.
    pool.store(
        "wss://lists.example",
        metadata_event(&a, 20, json!({ "name": "wrong-set" })),
    );
    let client = make_client(pool.clone(), 0xe);

    let metadata = client.metadata(a.clone()).await.unwrap();
    let relays = client.relays(&a).await;

    assert_eq!(metadata.name.as_deref(), Some("alice"));
    assert_eq!(relays.read, vec!["wss://home.example"]);
    assert_eq!(client.write_relays(Some(&a)).await, vec!["wss://home.example"]);
    assert_eq!(client.read_relays(None).await, Vec::<String>::new());
    assert_eq!(pool.get_calls(), 1);
}

#[tokio::test]
async fn public_key_logs_account_in() {
    integration_test_utils::init_logging();

    let pool = Arc::new(FakeRelayPool::new());
    let client = make_client(pool, 0xe);
    let mut updates = client.subscribe_account();
    assert_eq!(client.account(), None);

    assert_eq!(client.public_key().await.unwrap(), test_pubkey(0xe));

    tokio::time::timeout(Duration::from_secs(1), updates.changed())
        .await
        .expect("account should be published")
        .unwrap();
    assert_eq!(
        client.account(),
        Some(ProfileMetadata::minimal(test_pubkey(0xe)))
    );
}

#[tokio::test]
async fn publish_fans_out_through_client() {
    integration_test_utils::init_logging();

    let pool = Arc::new(FakeRelayPool::new());
    pool.fail_publish_to("wss://x.example");
    let client = make_client(pool.clone(), 0xe);

    client
        .publish(unsigned_note("hi"), ["wss://x.example", "wss://y.example"])
        .await
        .expect("fan-out should succeed");

    let pool_for_wait = pool.clone();
    wait_until(Duration::from_secs(1), move || {
        let pool = pool_for_wait.clone();
        async move { pool.published().len() == 1 }
    })
    .await;
    assert_eq!(pool.published()[0].0, "wss://y.example");
}

#[tokio::test]
async fn repository_announcements_go_to_configured_relays() {
    integration_test_utils::init_logging();

    let pool = Arc::new(FakeRelayPool::new());
    let client = make_client(pool.clone(), 0xe);

    client
        .publish(
            unsigned_note("repo announcement"),
            client.repository_relays().to_vec(),
        )
        .await
        .unwrap();

    let pool_for_wait = pool.clone();
    wait_until(Duration::from_secs(1), move || {
        let pool = pool_for_wait.clone();
        async move { pool.published().len() == 2 }
    })
    .await;
    let mut targets: Vec<String> = pool.published().into_iter().map(|(relay, _)| relay).collect();
    targets.sort();
    assert_eq!(targets, vec!["wss://repo-a.example", "wss://repo-b.example"]);
}
