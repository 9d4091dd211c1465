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

//! Signs records and sends them to one or many relays.

use crate::observability::{events, fields};
use crate::publish::signer::Signer;
use crate::{Event, EventTemplate, RelayPool, RelayStatus};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "publisher";

/// Where a signed record goes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublishTarget {
    /// One relay; its failure is reported to the caller.
    Single(String),
    /// Independent best-effort sends; failures are only logged.
    Many(Vec<String>),
}

impl From<&str> for PublishTarget {
    fn from(relay: &str) -> Self {
        PublishTarget::Single(relay.to_string())
    }
}

impl From<String> for PublishTarget {
    fn from(relay: String) -> Self {
        PublishTarget::Single(relay)
    }
}

impl From<Vec<String>> for PublishTarget {
    fn from(relays: Vec<String>) -> Self {
        PublishTarget::Many(relays)
    }
}

impl From<&[&str]> for PublishTarget {
    fn from(relays: &[&str]) -> Self {
        PublishTarget::Many(relays.iter().map(|relay| relay.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PublishTarget {
    fn from(relays: [&str; N]) -> Self {
        PublishTarget::from(&relays[..])
    }
}

pub struct Publisher {
    pool: Arc<dyn RelayPool>,
    signer: Arc<dyn Signer>,
}

impl Publisher {
    pub fn new(pool: Arc<dyn RelayPool>, signer: Arc<dyn Signer>) -> Self {
        Self { pool, signer }
    }

    /// Signs `template` and sends it to `target`.
    ///
    /// For [`PublishTarget::Many`] this returns as soon as every send has been
    /// dispatched; delivery is not confirmed.
    pub async fn publish(
        &self,
        template: EventTemplate,
        target: impl Into<PublishTarget>,
    ) -> Result<(), RelayStatus> {
        let event = match self.signer.sign_event(template).await {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    event = events::PUBLISH_SIGN_FAILED,
                    component = COMPONENT,
                    err = ?err,
                    "unable to sign record"
                );
                return Err(err);
            }
        };

        match target.into() {
            PublishTarget::Single(relay) => Self::send(self.pool.as_ref(), &relay, &event).await,
            PublishTarget::Many(relays) => {
                debug!(
                    event = events::PUBLISH_FANOUT_DISPATCHED,
                    component = COMPONENT,
                    relays = %fields::format_relays(&relays),
                    "dispatching independent sends"
                );
                let event = Arc::new(event);
                for relay in relays {
                    let pool = self.pool.clone();
                    let event = event.clone();
                    tokio::spawn(async move {
                        // Failures are logged by `send`.
                        let _ = Self::send(pool.as_ref(), &relay, &event).await;
                    });
                }
                Ok(())
            }
        }
    }

    async fn send(pool: &dyn RelayPool, relay: &str, event: &Event) -> Result<(), RelayStatus> {
        debug!(
            event = events::PUBLISH_SEND_ATTEMPT,
            component = COMPONENT,
            relay,
            record_id = event.id.as_str(),
            "sending record"
        );

        match pool.publish(relay, event).await {
            Ok(()) => {
                debug!(
                    event = events::PUBLISH_SEND_OK,
                    component = COMPONENT,
                    relay,
                    record_id = event.id.as_str(),
                    "relay acknowledged record"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    event = events::PUBLISH_SEND_FAILED,
                    component = COMPONENT,
                    relay,
                    record_id = event.id.as_str(),
                    code = ?err.get_code(),
                    err = ?err,
                    "relay send failed"
                );
                Err(err)
            }
        }
    }
}
