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

//! Signing capability seam and its startup gate.

use crate::observability::events;
use crate::session::account::AccountSession;
use crate::{Event, EventTemplate, PublicKey, RelayStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

const COMPONENT: &str = "gated_signer";

/// External signing capability holding the user's key.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn public_key(&self) -> Result<PublicKey, RelayStatus>;

    async fn sign_event(&self, template: EventTemplate) -> Result<Event, RelayStatus>;
}

/// Wraps a [`Signer`] that only becomes reachable some time after startup.
///
/// Calls wait until a deadline fixed at construction has passed, then
/// delegate. Every identity the inner signer reveals is reported to the
/// [`AccountSession`] without waiting for the account to resolve.
pub struct GatedSigner {
    inner: Arc<dyn Signer>,
    ready_at: Instant,
    session: Arc<AccountSession>,
}

impl GatedSigner {
    pub fn new(
        inner: Arc<dyn Signer>,
        startup_delay: Duration,
        session: Arc<AccountSession>,
    ) -> Self {
        Self {
            inner,
            ready_at: Instant::now() + startup_delay,
            session,
        }
    }

    async fn wait_until_ready(&self) {
        if Instant::now() < self.ready_at {
            trace!(
                event = events::SIGNER_GATE_WAIT,
                component = COMPONENT,
                "waiting for signer startup gate"
            );
            tokio::time::sleep_until(self.ready_at).await;
        }
    }

    fn report_identity(&self, pubkey: PublicKey) {
        if self.session.is_initialized() {
            return;
        }
        let session = self.session.clone();
        tokio::spawn(async move { session.initialize(pubkey).await });
    }
}

#[async_trait]
impl Signer for GatedSigner {
    async fn public_key(&self) -> Result<PublicKey, RelayStatus> {
        self.wait_until_ready().await;
        let pubkey = self.inner.public_key().await?;
        self.report_identity(pubkey.clone());
        Ok(pubkey)
    }

    async fn sign_event(&self, template: EventTemplate) -> Result<Event, RelayStatus> {
        self.wait_until_ready().await;
        let event = self.inner.sign_event(template).await?;
        self.report_identity(event.pubkey.clone());
        Ok(event)
    }
}
