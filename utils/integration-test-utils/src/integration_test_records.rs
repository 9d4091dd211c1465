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

use relay_resolver::{Event, EventTemplate, PublicKey, METADATA, RELAY_LIST};
use std::future::Future;
use std::time::Duration;

const NOTE_KIND: u16 = 1;

/// Deterministic public key derived from a small seed.
pub fn test_pubkey(seed: u8) -> PublicKey {
    PublicKey::from_hex(&format!("{seed:02x}").repeat(32)).expect("seeded key is valid hex")
}

fn event_id(author: &PublicKey, kind: u16, created_at: u64) -> String {
    format!("{:0>8}{kind:08x}{created_at:048x}", &author.as_str()[..8])
}

pub fn metadata_event(author: &PublicKey, created_at: u64, content: serde_json::Value) -> Event {
    Event {
        id: event_id(author, METADATA, created_at),
        pubkey: author.clone(),
        created_at,
        kind: METADATA,
        tags: vec![],
        content: content.to_string(),
        sig: "sig".to_string(),
    }
}

/// Relay list record from `(url, marker)` pairs; `None` leaves the marker out.
pub fn relay_list_event(author: &PublicKey, entries: &[(&str, Option<&str>)]) -> Event {
    let tags = entries
        .iter()
        .map(|(url, marker)| {
            let mut tag = vec!["r".to_string(), url.to_string()];
            if let Some(marker) = marker {
                tag.push(marker.to_string());
            }
            tag
        })
        .collect();

    Event {
        id: event_id(author, RELAY_LIST, 1),
        pubkey: author.clone(),
        created_at: 1,
        kind: RELAY_LIST,
        tags,
        content: String::new(),
        sig: "sig".to_string(),
    }
}

pub fn unsigned_note(content: &str) -> EventTemplate {
    EventTemplate {
        kind: NOTE_KIND,
        created_at: 1_700_000_000,
        tags: vec![],
        content: content.to_string(),
    }
}

/// Polls `condition` until it holds, panicking after `timeout`.
pub async fn wait_until<F, Fut>(timeout: Duration, mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition().await {
        if tokio::time::Instant::now() >= deadline {
            panic!("condition not met within {timeout:?}");
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
