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
use relay_resolver::{Event, EventTemplate, PublicKey, RelayCode, RelayStatus, Signer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

/// Signer that stamps records with a fixed identity and records call times.
pub struct FakeSigner {
    pubkey: PublicKey,
    refuse: bool,
    sign_calls: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
}

impl FakeSigner {
    pub fn new(pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            refuse: false,
            sign_calls: AtomicUsize::new(0),
            call_times: Mutex::new(Vec::new()),
        }
    }

    /// Signer that rejects every request, like a user declining a prompt.
    pub fn refusing(pubkey: PublicKey) -> Self {
        Self {
            refuse: true,
            ..Self::new(pubkey)
        }
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    fn check_allowed(&self) -> Result<(), RelayStatus> {
        self.call_times.lock().unwrap().push(Instant::now());
        if self.refuse {
            return Err(RelayStatus::fail_with_code(
                RelayCode::Unauthenticated,
                "user rejected signing request",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Signer for FakeSigner {
    async fn public_key(&self) -> Result<PublicKey, RelayStatus> {
        self.check_allowed()?;
        Ok(self.pubkey.clone())
    }

    async fn sign_event(&self, template: EventTemplate) -> Result<Event, RelayStatus> {
        self.check_allowed()?;
        let sequence = self.sign_calls.fetch_add(1, Ordering::SeqCst);

        Ok(Event {
            id: format!("{sequence:064x}"),
            pubkey: self.pubkey.clone(),
            created_at: template.created_at,
            kind: template.kind,
            tags: template.tags,
            content: template.content,
            sig: "fake-signature".to_string(),
        })
    }
}
