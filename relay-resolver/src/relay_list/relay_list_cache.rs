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

//! Process-lifetime cache of relay lists with one fetch per key.

use crate::observability::{events, fields};
use crate::relay_list::classification::RelayList;
use crate::{Filter, PublicKey, RelayPool, RELAY_LIST};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

const COMPONENT: &str = "relay_list_cache";

type PendingRelayList = Shared<BoxFuture<'static, RelayList>>;

/// Resolves relay lists, fetching each key at most once per process.
///
/// The first call for a key registers a shared pending fetch before anything
/// is awaited; concurrent and later callers await that same fetch. Not-found
/// and transport failures both settle on an empty [`RelayList`], which stays
/// cached like any other result. Entries are never evicted.
pub struct RelayListCache {
    pool: Arc<dyn RelayPool>,
    relays: Arc<[String]>,
    entries: Mutex<HashMap<PublicKey, PendingRelayList>>,
}

impl RelayListCache {
    pub fn new(pool: Arc<dyn RelayPool>, relays: Vec<String>) -> Self {
        Self {
            pool,
            relays: relays.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn relays(&self, pubkey: &PublicKey) -> RelayList {
        self.pending(pubkey).await
    }

    /// Write relays of `pubkey`; empty without a lookup when no key is given.
    pub async fn write_relays(&self, pubkey: Option<&PublicKey>) -> Vec<String> {
        match pubkey {
            Some(pubkey) => self.relays(pubkey).await.write,
            None => Vec::new(),
        }
    }

    /// Read relays of `pubkey`; empty without a lookup when no key is given.
    pub async fn read_relays(&self, pubkey: Option<&PublicKey>) -> Vec<String> {
        match pubkey {
            Some(pubkey) => self.relays(pubkey).await.read,
            None => Vec::new(),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn pending(&self, pubkey: &PublicKey) -> PendingRelayList {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pending) = entries.get(pubkey) {
            debug!(
                event = events::RELAY_LIST_CACHE_HIT,
                component = COMPONENT,
                pubkey = %fields::format_pubkey(pubkey),
                "reusing cached relay list"
            );
            return pending.clone();
        }

        debug!(
            event = events::RELAY_LIST_CACHE_INSERT,
            component = COMPONENT,
            pubkey = %fields::format_pubkey(pubkey),
            "fetching relay list"
        );
        // Spawned so the fetch completes even if every caller stops waiting.
        let fetch = tokio::spawn(Self::fetch(
            self.pool.clone(),
            self.relays.clone(),
            pubkey.clone(),
        ));
        let pending = async move {
            fetch.await.unwrap_or_else(|err| {
                warn!(
                    event = events::RELAY_LIST_TASK_ABORTED,
                    component = COMPONENT,
                    err = %err,
                    "relay list fetch task did not complete"
                );
                RelayList::default()
            })
        }
        .boxed()
        .shared();

        entries.insert(pubkey.clone(), pending.clone());
        pending
    }

    async fn fetch(
        pool: Arc<dyn RelayPool>,
        relays: Arc<[String]>,
        pubkey: PublicKey,
    ) -> RelayList {
        let filter = Filter::new().kind(RELAY_LIST).author(pubkey.clone());

        match pool.get(&relays, &filter).await {
            Ok(Some(event)) => {
                let relay_list = RelayList::from_tags(&event.tags);
                debug!(
                    event = events::RELAY_LIST_FETCH_OK,
                    component = COMPONENT,
                    pubkey = %fields::format_pubkey(&pubkey),
                    read = relay_list.read.len(),
                    write = relay_list.write.len(),
                    "relay list resolved"
                );
                relay_list
            }
            Ok(None) => {
                debug!(
                    event = events::RELAY_LIST_NOT_FOUND,
                    component = COMPONENT,
                    pubkey = %fields::format_pubkey(&pubkey),
                    reason = fields::REASON_NOT_FOUND,
                    "no relay list published"
                );
                RelayList::default()
            }
            Err(err) => {
                warn!(
                    event = events::RELAY_LIST_FETCH_FAILED,
                    component = COMPONENT,
                    pubkey = %fields::format_pubkey(&pubkey),
                    relays = %fields::format_relays(&relays),
                    err = ?err,
                    "relay list fetch failed; caching empty list"
                );
                RelayList::default()
            }
        }
    }
}
