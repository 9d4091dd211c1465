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

//! Per-batch state: callers collected while the batch is open, and the merge
//! state kept while its query is running.

use crate::metadata::profile::ProfileMetadata;
use crate::{Event, PublicKey, RelayStatus};
use std::collections::{HashMap, HashSet};
use tokio::sync::oneshot;

pub(crate) type LoadResult = Result<ProfileMetadata, RelayStatus>;

/// Callers waiting on one batch, grouped by key.
pub(crate) struct OpenBatch {
    batch_id: String,
    keys: Vec<PublicKey>,
    waiters: HashMap<PublicKey, Vec<oneshot::Sender<LoadResult>>>,
}

impl OpenBatch {
    pub(crate) fn new(batch_id: String) -> Self {
        Self {
            batch_id,
            keys: Vec::new(),
            waiters: HashMap::new(),
        }
    }

    pub(crate) fn batch_id(&self) -> &str {
        &self.batch_id
    }

    /// Registers a caller for `pubkey`. Duplicate keys share one slot.
    pub(crate) fn join(&mut self, pubkey: PublicKey) -> oneshot::Receiver<LoadResult> {
        let (sender, receiver) = oneshot::channel();
        let slot = self.waiters.entry(pubkey.clone()).or_insert_with(|| {
            self.keys.push(pubkey);
            Vec::new()
        });
        slot.push(sender);
        receiver
    }

    /// Distinct keys in first-seen order.
    pub(crate) fn keys(&self) -> &[PublicKey] {
        &self.keys
    }

    pub(crate) fn caller_count(&self) -> usize {
        self.waiters.values().map(Vec::len).sum()
    }

    /// Hands every caller the record of its key.
    pub(crate) fn resolve(self, mut records: HashMap<PublicKey, ProfileMetadata>) {
        for (pubkey, senders) in self.waiters {
            let record = records
                .remove(&pubkey)
                .unwrap_or_else(|| ProfileMetadata::minimal(pubkey));
            for sender in senders {
                // A caller that stopped waiting is not an error.
                let _ = sender.send(Ok(record.clone()));
            }
        }
    }

    /// Hands every caller the same failure.
    pub(crate) fn fail(self, status: RelayStatus) {
        for sender in self.waiters.into_values().flatten() {
            let _ = sender.send(Err(status.clone()));
        }
    }
}

/// What happened to one incoming metadata event.
#[derive(Debug)]
pub(crate) enum MergeOutcome {
    Accepted,
    /// An answer with a newer `created_at` is already held for the key.
    Superseded,
    UnexpectedAuthor,
    Malformed(serde_json::Error),
}

struct Answer {
    created_at: u64,
    record: ProfileMetadata,
}

/// Merge state of a batch whose query has been issued.
pub(crate) struct QueryingBatch {
    keys: HashSet<PublicKey>,
    open_relays: HashSet<String>,
    answers: HashMap<PublicKey, Answer>,
}

impl QueryingBatch {
    pub(crate) fn new(keys: &[PublicKey], relays: &[String]) -> Self {
        Self {
            keys: keys.iter().cloned().collect(),
            open_relays: relays.iter().cloned().collect(),
            answers: HashMap::new(),
        }
    }

    /// Merges one event. Newer `created_at` wins; equal timestamps keep the
    /// event observed last.
    pub(crate) fn on_event(&mut self, event: Event) -> MergeOutcome {
        if !self.keys.contains(&event.pubkey) {
            return MergeOutcome::UnexpectedAuthor;
        }

        if let Some(held) = self.answers.get(&event.pubkey) {
            if held.created_at > event.created_at {
                return MergeOutcome::Superseded;
            }
        }

        match ProfileMetadata::from_payload(&event.pubkey, &event.content) {
            Ok(record) => {
                self.answers.insert(
                    event.pubkey,
                    Answer {
                        created_at: event.created_at,
                        record,
                    },
                );
                MergeOutcome::Accepted
            }
            Err(err) => MergeOutcome::Malformed(err),
        }
    }

    /// Marks `relay` as finished. Returns `true` when no relay is left open.
    pub(crate) fn on_relay_done(&mut self, relay: &str) -> bool {
        self.open_relays.remove(relay);
        self.is_complete()
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.open_relays.is_empty()
    }

    pub(crate) fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Closes the batch: answered keys get their record, the rest the minimal default.
    pub(crate) fn close(self) -> HashMap<PublicKey, ProfileMetadata> {
        let mut answers = self.answers;
        self.keys
            .into_iter()
            .map(|pubkey| {
                let record = answers
                    .remove(&pubkey)
                    .map(|answer| answer.record)
                    .unwrap_or_else(|| ProfileMetadata::minimal(pubkey.clone()));
                (pubkey, record)
            })
            .collect()
    }
}
