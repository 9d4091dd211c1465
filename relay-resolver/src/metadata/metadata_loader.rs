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

//! Batching loader for profile metadata.

use crate::metadata::batch_state::{MergeOutcome, OpenBatch, QueryingBatch};
use crate::metadata::profile::ProfileMetadata;
use crate::observability::{events, fields};
use crate::{Filter, PublicKey, RelayCode, RelayMessage, RelayPool, RelayStatus, METADATA};
use futures::StreamExt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const COMPONENT: &str = "metadata_loader";

type OpenBatchSlot = Arc<Mutex<Option<OpenBatch>>>;

/// Coalesces concurrent metadata lookups into one multi-author query per tick.
///
/// The first [`load`](Self::load) of a tick opens a batch and closes it once
/// the batch window has passed; every call made before then joins that
/// batch. A zero window closes the batch on the opening caller's next poll,
/// on any runtime flavor. The dispatched query runs against the profile relays until
/// each of them signals end of stored events, then all callers of the batch
/// are resolved together. Keys nobody answered get
/// [`ProfileMetadata::minimal`].
///
/// Nothing is cached across batches.
#[derive(Clone)]
pub struct MetadataLoader {
    pool: Arc<dyn RelayPool>,
    relays: Arc<[String]>,
    batch_window: Duration,
    open_batch: OpenBatchSlot,
}

impl MetadataLoader {
    pub fn new(pool: Arc<dyn RelayPool>, relays: Vec<String>, batch_window: Duration) -> Self {
        Self {
            pool,
            relays: relays.into(),
            batch_window,
            open_batch: Arc::new(Mutex::new(None)),
        }
    }

    /// Resolves the profile metadata of `pubkey`.
    ///
    /// Fails only when the batch query could not be issued; every caller of
    /// that batch then receives the same status.
    pub async fn load(&self, pubkey: PublicKey) -> Result<ProfileMetadata, RelayStatus> {
        let (receiver, dispatch) = {
            let mut open_batch = self
                .open_batch
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match open_batch.as_mut() {
                Some(batch) => (batch.join(pubkey), None),
                None => {
                    let mut batch = OpenBatch::new(Uuid::new_v4().to_string());
                    debug!(
                        event = events::METADATA_BATCH_OPEN,
                        component = COMPONENT,
                        batch_id = batch.batch_id(),
                        pubkey = %fields::format_pubkey(&pubkey),
                        "opening metadata batch"
                    );
                    let receiver = batch.join(pubkey);
                    *open_batch = Some(batch);
                    (receiver, Some(DispatchGuard::new(self)))
                }
            }
        };

        // Only the caller that opened the batch closes it, and only after it
        // has been polled again, so every call polled in the same pass joins.
        if let Some(dispatch) = dispatch {
            self.wait_batch_window().await;
            dispatch.dispatch();
        }

        receiver.await.unwrap_or_else(|_| {
            Err(RelayStatus::fail_with_code(
                RelayCode::Internal,
                "metadata batch dropped before completion",
            ))
        })
    }

    async fn wait_batch_window(&self) {
        if self.batch_window.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.batch_window).await;
        }
    }

    /// Takes the open batch and runs its query on a spawned task, so the
    /// query completes even if every caller stops waiting.
    fn dispatch_open_batch(&self) {
        let batch = self
            .open_batch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(batch) = batch else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(Self::dispatch_batch(
                    self.pool.clone(),
                    self.relays.clone(),
                    batch,
                ));
            }
            Err(err) => batch.fail(RelayStatus::fail_with_code(
                RelayCode::Internal,
                format!("no runtime to dispatch metadata batch: {err}"),
            )),
        }
    }

    /// Runs one batch query to completion and resolves its callers.
    pub(crate) async fn dispatch_batch(
        pool: Arc<dyn RelayPool>,
        relays: Arc<[String]>,
        batch: OpenBatch,
    ) {
        let filter = Filter::new()
            .kind(METADATA)
            .authors(batch.keys().iter().cloned());

        debug!(
            event = events::METADATA_BATCH_DISPATCH,
            component = COMPONENT,
            batch_id = batch.batch_id(),
            keys = batch.keys().len(),
            callers = batch.caller_count(),
            relays = %fields::format_relays(&relays),
            "dispatching metadata batch"
        );

        let mut stream = match pool
            .subscribe_many_eose(&relays, std::slice::from_ref(&filter))
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                warn!(
                    event = events::METADATA_BATCH_QUERY_FAILED,
                    component = COMPONENT,
                    batch_id = batch.batch_id(),
                    code = ?err.get_code(),
                    err = ?err,
                    "metadata batch query failed"
                );
                batch.fail(err);
                return;
            }
        };

        let mut querying = QueryingBatch::new(batch.keys(), &relays);
        while !querying.is_complete() {
            match stream.next().await {
                Some(RelayMessage::Event { relay, event }) => {
                    let pubkey = fields::format_pubkey(&event.pubkey);
                    match querying.on_event(event) {
                        MergeOutcome::Accepted => {}
                        MergeOutcome::Superseded => {
                            debug!(
                                event = events::METADATA_EVENT_SUPERSEDED,
                                component = COMPONENT,
                                batch_id = batch.batch_id(),
                                relay = relay.as_str(),
                                pubkey = pubkey.as_str(),
                                "older metadata event ignored"
                            );
                        }
                        MergeOutcome::UnexpectedAuthor => {
                            debug!(
                                event = events::METADATA_EVENT_UNEXPECTED_AUTHOR,
                                component = COMPONENT,
                                batch_id = batch.batch_id(),
                                relay = relay.as_str(),
                                pubkey = pubkey.as_str(),
                                "metadata event for key outside batch ignored"
                            );
                        }
                        MergeOutcome::Malformed(err) => {
                            warn!(
                                event = events::METADATA_PAYLOAD_MALFORMED,
                                component = COMPONENT,
                                batch_id = batch.batch_id(),
                                relay = relay.as_str(),
                                pubkey = pubkey.as_str(),
                                err = %err,
                                "skipping malformed metadata payload"
                            );
                        }
                    }
                }
                Some(RelayMessage::EndOfStoredEvents { relay }) => {
                    querying.on_relay_done(&relay);
                    debug!(
                        event = events::METADATA_BATCH_RELAY_DONE,
                        component = COMPONENT,
                        batch_id = batch.batch_id(),
                        relay = relay.as_str(),
                        "relay reached end of stored events"
                    );
                }
                Some(RelayMessage::Closed { relay, reason }) => {
                    querying.on_relay_done(&relay);
                    debug!(
                        event = events::METADATA_BATCH_RELAY_DONE,
                        component = COMPONENT,
                        batch_id = batch.batch_id(),
                        relay = relay.as_str(),
                        reason = reason.as_str(),
                        "relay closed subscription"
                    );
                }
                None => {
                    debug!(
                        event = events::METADATA_BATCH_STREAM_ENDED,
                        component = COMPONENT,
                        batch_id = batch.batch_id(),
                        "relay stream ended before every relay finished"
                    );
                    break;
                }
            }
        }

        let answered = querying.answered_count();
        let records = querying.close();
        debug!(
            event = events::METADATA_BATCH_CLOSED,
            component = COMPONENT,
            batch_id = batch.batch_id(),
            answered,
            defaulted = records.len() - answered,
            "closing metadata batch"
        );
        batch.resolve(records);
    }
}

/// Dispatches the open batch on drop unless [`dispatch`](Self::dispatch)
/// already did, so the batch still runs when its opening caller gives up
/// during the window.
struct DispatchGuard<'a> {
    loader: &'a MetadataLoader,
    dispatched: bool,
}

impl<'a> DispatchGuard<'a> {
    fn new(loader: &'a MetadataLoader) -> Self {
        Self {
            loader,
            dispatched: false,
        }
    }

    fn dispatch(mut self) {
        self.loader.dispatch_open_batch();
        self.dispatched = true;
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if !self.dispatched {
            debug!(
                event = events::METADATA_BATCH_OPENER_DROPPED,
                component = COMPONENT,
                "opening caller stopped waiting; dispatching batch early"
            );
            self.loader.dispatch_open_batch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MetadataLoader;
    use crate::metadata::profile::ProfileMetadata;
    use crate::{
        Event, Filter, PublicKey, RelayCode, RelayMessage, RelayMessageStream, RelayPool,
        RelayStatus, METADATA,
    };
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn key(byte: &str) -> PublicKey {
        PublicKey::from_hex(&byte.repeat(32)).expect("valid key")
    }

    /// Answers every subscription with a fixed message script.
    #[derive(Default)]
    struct ScriptedPool {
        script: Vec<RelayMessage>,
        fail: bool,
        subscribe_count: AtomicUsize,
        filters: Mutex<Vec<Filter>>,
    }

    #[async_trait]
    impl RelayPool for ScriptedPool {
        async fn subscribe_many_eose(
            &self,
            _relays: &[String],
            filters: &[Filter],
        ) -> Result<RelayMessageStream, RelayStatus> {
            self.subscribe_count.fetch_add(1, Ordering::SeqCst);
            self.filters.lock().unwrap().extend_from_slice(filters);
            if self.fail {
                return Err(RelayStatus::fail_with_code(
                    RelayCode::Unavailable,
                    "scripted failure",
                ));
            }
            Ok(futures::stream::iter(self.script.clone()).boxed())
        }

        async fn get(
            &self,
            _relays: &[String],
            _filter: &Filter,
        ) -> Result<Option<Event>, RelayStatus> {
            Ok(None)
        }

        async fn publish(&self, _relay: &str, _event: &Event) -> Result<(), RelayStatus> {
            Ok(())
        }
    }

    fn metadata(relay: &str, author: PublicKey, content: &str) -> RelayMessage {
        RelayMessage::Event {
            relay: relay.to_string(),
            event: Event {
                id: "00".repeat(32),
                pubkey: author,
                created_at: 1,
                kind: METADATA,
                tags: vec![],
                content: content.to_string(),
                sig: String::new(),
            },
        }
    }

    fn eose(relay: &str) -> RelayMessage {
        RelayMessage::EndOfStoredEvents {
            relay: relay.to_string(),
        }
    }

    fn loader(pool: Arc<ScriptedPool>, relays: &[&str]) -> MetadataLoader {
        MetadataLoader::new(
            pool,
            relays.iter().map(|relay| relay.to_string()).collect(),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_query() {
        let pool = Arc::new(ScriptedPool {
            script: vec![
                metadata("wss://a", key("01"), r#"{"name":"one"}"#),
                eose("wss://a"),
            ],
            ..Default::default()
        });
        let loader = loader(pool.clone(), &["wss://a"]);

        let (one, two, one_again) = tokio::join!(
            loader.load(key("01")),
            loader.load(key("02")),
            loader.load(key("01"))
        );

        assert_eq!(pool.subscribe_count.load(Ordering::SeqCst), 1);
        assert_eq!(one.as_ref().unwrap().name.as_deref(), Some("one"));
        assert_eq!(one, one_again);
        assert_eq!(two.unwrap(), ProfileMetadata::minimal(key("02")));

        let filters = pool.filters.lock().unwrap();
        assert_eq!(filters[0].kinds, vec![METADATA]);
        assert_eq!(filters[0].authors, vec![key("01"), key("02")]);
    }

    #[tokio::test]
    async fn sequential_loads_issue_fresh_queries() {
        let pool = Arc::new(ScriptedPool {
            script: vec![eose("wss://a")],
            ..Default::default()
        });
        let loader = loader(pool.clone(), &["wss://a"]);

        loader.load(key("01")).await.unwrap();
        loader.load(key("01")).await.unwrap();

        assert_eq!(pool.subscribe_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn query_failure_fails_every_caller() {
        let pool = Arc::new(ScriptedPool {
            fail: true,
            ..Default::default()
        });
        let loader = loader(pool.clone(), &["wss://a"]);

        let (one, two) = tokio::join!(loader.load(key("01")), loader.load(key("02")));

        assert_eq!(one.unwrap_err().code, RelayCode::Unavailable);
        assert_eq!(two.unwrap_err().code, RelayCode::Unavailable);
        assert_eq!(pool.subscribe_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn waits_for_every_relay_before_closing() {
        let pool = Arc::new(ScriptedPool {
            script: vec![
                eose("wss://a"),
                metadata("wss://b", key("01"), r#"{"name":"late"}"#),
                RelayMessage::Closed {
                    relay: "wss://b".to_string(),
                    reason: "shutting down".to_string(),
                },
                metadata("wss://b", key("01"), r#"{"name":"after-close"}"#),
            ],
            ..Default::default()
        });
        let loader = loader(pool, &["wss://a", "wss://b"]);

        let record = loader.load(key("01")).await.unwrap();

        assert_eq!(record.name.as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn stream_end_closes_batch_with_defaults() {
        let pool = Arc::new(ScriptedPool::default());
        let loader = loader(pool, &["wss://a"]);

        let record = loader.load(key("03")).await.unwrap();

        assert_eq!(record, ProfileMetadata::minimal(key("03")));
    }

    #[tokio::test]
    async fn batch_window_collects_calls_made_while_waiting() {
        let pool = Arc::new(ScriptedPool {
            script: vec![eose("wss://a")],
            ..Default::default()
        });
        let loader = MetadataLoader::new(
            pool.clone(),
            vec!["wss://a".to_string()],
            Duration::from_millis(20),
        );

        let early = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load(key("01")).await }
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        let late = loader.load(key("02")).await.unwrap();

        assert_eq!(late, ProfileMetadata::minimal(key("02")));
        assert!(early.await.unwrap().is_ok());
        assert_eq!(pool.subscribe_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn batch_runs_when_opening_caller_gives_up_during_window() {
        let pool = Arc::new(ScriptedPool {
            script: vec![eose("wss://a")],
            ..Default::default()
        });
        let loader = MetadataLoader::new(
            pool.clone(),
            vec!["wss://a".to_string()],
            Duration::from_millis(50),
        );

        // `futures::join!` polls in order, so the first call opens the batch.
        let (abandoned, kept) = futures::join!(
            tokio::time::timeout(Duration::from_millis(1), loader.load(key("01"))),
            loader.load(key("02"))
        );

        assert!(abandoned.is_err());
        assert_eq!(kept.unwrap(), ProfileMetadata::minimal(key("02")));
        assert_eq!(pool.subscribe_count.load(Ordering::SeqCst), 1);
        assert_eq!(
            pool.filters.lock().unwrap()[0].authors,
            vec![key("01"), key("02")]
        );
    }
}
