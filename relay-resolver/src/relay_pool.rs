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

//! Connection-pool seam between the resolver and the relay transport.

use crate::{Event, Filter, RelayStatus};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// One item of a multi-relay subscription.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RelayMessage {
    /// A stored record matching the subscription filter.
    Event { relay: String, event: Event },
    /// The relay has no more stored records for this subscription.
    EndOfStoredEvents { relay: String },
    /// The relay dropped the subscription before signalling end of stored events.
    Closed { relay: String, reason: String },
}

pub type RelayMessageStream = BoxStream<'static, RelayMessage>;

/// Connection pool over named relays.
///
/// Implementations own connection setup and reuse, payload signature
/// verification and relay-level deduplication. The resolver only composes
/// filters and interprets the results.
#[async_trait]
pub trait RelayPool: Send + Sync {
    /// Opens one subscription per relay for `filters` and merges the results.
    ///
    /// Each relay is expected to end its part of the stream with
    /// [`RelayMessage::EndOfStoredEvents`] or [`RelayMessage::Closed`].
    async fn subscribe_many_eose(
        &self,
        relays: &[String],
        filters: &[Filter],
    ) -> Result<RelayMessageStream, RelayStatus>;

    /// Fetches one record matching `filter` from any of `relays`.
    async fn get(&self, relays: &[String], filter: &Filter) -> Result<Option<Event>, RelayStatus>;

    /// Connects to (or reuses) `relay` and sends `event`, waiting for the acknowledgment.
    async fn publish(&self, relay: &str, event: &Event) -> Result<(), RelayStatus>;
}
