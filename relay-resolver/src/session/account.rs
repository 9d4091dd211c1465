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

//! Logged-in account state.

use crate::observability::{events, fields};
use crate::session::session_store::SessionStore;
use crate::{MetadataLoader, ProfileMetadata, PublicKey};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

const COMPONENT: &str = "account_session";

/// Tracks which account is logged in and publishes changes to observers.
///
/// A previously persisted account is restored on construction. The first
/// identity reported through [`initialize`](Self::initialize) is resolved to
/// its profile metadata, persisted and published; later reports are ignored.
pub struct AccountSession {
    loader: MetadataLoader,
    store: Arc<dyn SessionStore>,
    initialized: AtomicBool,
    account: watch::Sender<Option<ProfileMetadata>>,
}

impl AccountSession {
    pub fn new(loader: MetadataLoader, store: Arc<dyn SessionStore>) -> Self {
        let restored = match store.load() {
            Ok(account) => {
                if let Some(account) = account.as_ref() {
                    debug!(
                        event = events::ACCOUNT_RESTORED,
                        component = COMPONENT,
                        pubkey = %fields::format_pubkey(&account.pubkey),
                        "restored persisted account"
                    );
                }
                account
            }
            Err(err) => {
                debug!(
                    event = events::ACCOUNT_RESTORE_FAILED,
                    component = COMPONENT,
                    err = ?err,
                    "ignoring unreadable persisted account"
                );
                None
            }
        };

        Self {
            loader,
            store,
            initialized: AtomicBool::new(false),
            account: watch::Sender::new(restored),
        }
    }

    pub fn current(&self) -> Option<ProfileMetadata> {
        self.account.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ProfileMetadata>> {
        self.account.subscribe()
    }

    /// Whether an identity has already been reported this session.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Resolves and persists the account of `pubkey`, once per session.
    pub async fn initialize(&self, pubkey: PublicKey) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!(
                event = events::ACCOUNT_INITIALIZED,
                component = COMPONENT,
                pubkey = %fields::format_pubkey(&pubkey),
                reason = fields::REASON_ALREADY_INITIALIZED,
                "account already initialized"
            );
            return;
        }

        let account = match self.loader.load(pubkey).await {
            Ok(account) => account,
            Err(err) => {
                warn!(
                    event = events::ACCOUNT_INITIALIZE_FAILED,
                    component = COMPONENT,
                    err = ?err,
                    "unable to resolve account metadata"
                );
                return;
            }
        };

        if let Err(err) = self.store.save(&account) {
            warn!(
                event = events::ACCOUNT_PERSIST_FAILED,
                component = COMPONENT,
                err = ?err,
                "unable to persist account"
            );
        }

        info!(
            event = events::ACCOUNT_INITIALIZED,
            component = COMPONENT,
            pubkey = %fields::format_pubkey(&account.pubkey),
            "account initialized"
        );
        self.account.send_replace(Some(account));
    }
}
