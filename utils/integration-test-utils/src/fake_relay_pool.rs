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

use async_trait::async_trait;
use futures::StreamExt;
use relay_resolver::{
    Event, Filter, RelayCode, RelayMessage, RelayMessageStream, RelayPool, RelayStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

#[derive(Default)]
struct RelayScript {
    events: Vec<Event>,
    closes_without_eose: bool,
}

/// In-memory relay pool with per-relay canned records and failure switches.
///
/// Subscriptions replay, relay by relay in the order given, every stored
/// record matching the filter followed by end of stored events.
#[derive(Default)]
pub struct FakeRelayPool {
    relays: Mutex<HashMap<String, RelayScript>>,
    failing_subscriptions: Mutex<bool>,
    failing_gets: Mutex<bool>,
    failing_publish_relays: Mutex<HashSet<String>>,
    subscribe_latency: Mutex<Duration>,
    get_latency: Mutex<Duration>,
    subscribe_calls: AtomicUsize,
    get_calls: AtomicUsize,
    filters: Mutex<Vec<Filter>>,
    published: Mutex<Vec<(String, Event)>>,
}

impl FakeRelayPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, relay: &str, event: Event) {
        self.relays
            .lock()
            .unwrap()
            .entry(relay.to_string())
            .or_default()
            .events
            .push(event);
    }

    /// Makes `relay` close its subscriptions instead of sending end of stored events.
    pub fn close_without_eose(&self, relay: &str) {
        self.relays
            .lock()
            .unwrap()
            .entry(relay.to_string())
            .or_default()
            .closes_without_eose = true;
    }

    pub fn fail_subscriptions(&self) {
        *self.failing_subscriptions.lock().unwrap() = true;
    }

    pub fn fail_gets(&self) {
        *self.failing_gets.lock().unwrap() = true;
    }

    pub fn fail_publish_to(&self, relay: &str) {
        self.failing_publish_relays
            .lock()
            .unwrap()
            .insert(relay.to_string());
    }

    /// Delays every subscription by `latency` before any message is replayed.
    pub fn set_subscribe_latency(&self, latency: Duration) {
        *self.subscribe_latency.lock().unwrap() = latency;
    }

    pub fn set_get_latency(&self, latency: Duration) {
        *self.get_latency.lock().unwrap() = latency;
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.filters.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<(String, Event)> {
        self.published.lock().unwrap().clone()
    }

    fn unavailable(what: &str) -> RelayStatus {
        RelayStatus::fail_with_code(RelayCode::Unavailable, format!("{what} unavailable"))
    }
}

#[async_trait]
impl RelayPool for FakeRelayPool {
    async fn subscribe_many_eose(
        &self,
        relays: &[String],
        filters: &[Filter],
    ) -> Result<RelayMessageStream, RelayStatus> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.filters.lock().unwrap().extend_from_slice(filters);
        let latency = *self.subscribe_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if *self.failing_subscriptions.lock().unwrap() {
            return Err(Self::unavailable("subscription"));
        }

        let scripts = self.relays.lock().unwrap();
        let mut messages = Vec::new();
        for relay in relays {
            let script = scripts.get(relay);
            if let Some(script) = script {
                messages.extend(
                    script
                        .events
                        .iter()
                        .filter(|event| filters.iter().any(|filter| filter.matches(event)))
                        .map(|event| RelayMessage::Event {
                            relay: relay.clone(),
                            event: event.clone(),
                        }),
                );
            }

            if script.is_some_and(|script| script.closes_without_eose) {
                messages.push(RelayMessage::Closed {
                    relay: relay.clone(),
                    reason: "error: shutting down".to_string(),
                });
            } else {
                messages.push(RelayMessage::EndOfStoredEvents {
                    relay: relay.clone(),
                });
            }
        }

        debug!("fake pool replaying {} messages", messages.len());
        Ok(futures::stream::iter(messages).boxed())
    }

    async fn get(&self, relays: &[String], filter: &Filter) -> Result<Option<Event>, RelayStatus> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let latency = *self.get_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if *self.failing_gets.lock().unwrap() {
            return Err(Self::unavailable("get"));
        }

        let scripts = self.relays.lock().unwrap();
        let newest = relays
            .iter()
            .filter_map(|relay| scripts.get(relay))
            .flat_map(|script| script.events.iter())
            .filter(|event| filter.matches(event))
            .max_by_key(|event| event.created_at)
            .cloned();
        Ok(newest)
    }

    async fn publish(&self, relay: &str, event: &Event) -> Result<(), RelayStatus> {
        if self.failing_publish_relays.lock().unwrap().contains(relay) {
            return Err(Self::unavailable(relay));
        }

        self.published
            .lock()
            .unwrap()
            .push((relay.to_string(), event.clone()));
        Ok(())
    }
}
