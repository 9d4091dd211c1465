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

use crate::{
    AccountSession, EventTemplate, GatedSigner, MetadataLoader, ProfileMetadata, PublicKey,
    PublishTarget, Publisher, RelayList, RelayListCache, RelayPool, RelayStatus, ResolverConfig,
    SessionStore, Signer,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

///
/// [`NostrClient`] wires the resolvers, the publisher and the account session
/// around one shared [`RelayPool`].
///
/// The relay sets come from [`ResolverConfig`]; nothing here is global, so
/// several clients with different pools can live side by side.
pub struct NostrClient {
    metadata: MetadataLoader,
    relay_lists: RelayListCache,
    publisher: Publisher,
    signer: Arc<GatedSigner>,
    session: Arc<AccountSession>,
    repository_relays: Vec<String>,
}

impl NostrClient {
    pub fn new(
        config: &ResolverConfig,
        pool: Arc<dyn RelayPool>,
        signer: Arc<dyn Signer>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        debug!(
            profile_relays = config.profile_relays.len(),
            relay_list_relays = config.relay_list_relays.len(),
            batch_window_ms = config.batch_window_ms,
            "creating nostr client"
        );

        let metadata = MetadataLoader::new(
            pool.clone(),
            config.profile_relays.clone(),
            config.batch_window(),
        );
        let relay_lists = RelayListCache::new(pool.clone(), config.relay_list_relays.clone());
        let session = Arc::new(AccountSession::new(metadata.clone(), store));
        let signer = Arc::new(GatedSigner::new(
            signer,
            config.signer_startup_delay(),
            session.clone(),
        ));
        let publisher = Publisher::new(pool, signer.clone());

        Self {
            metadata,
            relay_lists,
            publisher,
            signer,
            session,
            repository_relays: config.repository_relays.clone(),
        }
    }

    pub async fn metadata(&self, pubkey: PublicKey) -> Result<ProfileMetadata, RelayStatus> {
        self.metadata.load(pubkey).await
    }

    pub async fn relays(&self, pubkey: &PublicKey) -> RelayList {
        self.relay_lists.relays(pubkey).await
    }

    pub async fn read_relays(&self, pubkey: Option<&PublicKey>) -> Vec<String> {
        self.relay_lists.read_relays(pubkey).await
    }

    pub async fn write_relays(&self, pubkey: Option<&PublicKey>) -> Vec<String> {
        self.relay_lists.write_relays(pubkey).await
    }

    pub async fn publish(
        &self,
        template: EventTemplate,
        target: impl Into<PublishTarget>,
    ) -> Result<(), RelayStatus> {
        self.publisher.publish(template, target).await
    }

    /// Relays that repository announcements are published to.
    pub fn repository_relays(&self) -> &[String] {
        &self.repository_relays
    }

    /// Asks the signer for the user's identity, which also logs the account in.
    pub async fn public_key(&self) -> Result<PublicKey, RelayStatus> {
        self.signer.public_key().await
    }

    pub fn account(&self) -> Option<ProfileMetadata> {
        self.session.current()
    }

    pub fn subscribe_account(&self) -> watch::Receiver<Option<ProfileMetadata>> {
        self.session.subscribe()
    }
}
