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

//! # relay-resolver
//!
//! `relay-resolver` turns many individual, possibly concurrent, per-identity
//! lookups into few round trips against a redundant set of untrusted relays.
//!
//! Typical usage is API-first and centered on [`NostrClient`], which is built
//! from a [`ResolverConfig`] and an injected [`RelayPool`].
//!
//! ## Resolving profile metadata and relay lists
//!
//! ```
//! use std::sync::Arc;
//! use relay_resolver::{
//!     MemorySessionStore, NostrClient, PublicKey, RelayPool, ResolverConfig, Signer,
//! };
//!
//! # pub mod mock {
//! #     use async_trait::async_trait;
//! #     use futures::StreamExt;
//! #     use relay_resolver::{
//! #         Event, EventTemplate, Filter, PublicKey, RelayCode, RelayMessage,
//! #         RelayMessageStream, RelayPool, RelayStatus, Signer,
//! #     };
//! #
//! #     pub struct MockPool;
//! #
//! #     #[async_trait]
//! #     impl RelayPool for MockPool {
//! #         async fn subscribe_many_eose(
//! #             &self,
//! #             relays: &[String],
//! #             _filters: &[Filter],
//! #         ) -> Result<RelayMessageStream, RelayStatus> {
//! #             let done: Vec<RelayMessage> = relays
//! #                 .iter()
//! #                 .map(|relay| RelayMessage::EndOfStoredEvents { relay: relay.clone() })
//! #                 .collect();
//! #             Ok(futures::stream::iter(done).boxed())
//! #         }
//! #
//! #         async fn get(
//! #             &self,
//! #             _relays: &[String],
//! #             _filter: &Filter,
//! #         ) -> Result<Option<Event>, RelayStatus> {
//! #             Ok(None)
//! #         }
//! #
//! #         async fn publish(&self, _relay: &str, _event: &Event) -> Result<(), RelayStatus> {
//! #             Ok(())
//! #         }
//! #     }
//! #
//! #     pub struct NoSigner;
//! #
//! #     #[async_trait]
//! #     impl Signer for NoSigner {
//! #         async fn public_key(&self) -> Result<PublicKey, RelayStatus> {
//! #             Err(RelayStatus::fail_with_code(RelayCode::Unauthenticated, "no signer"))
//! #         }
//! #
//! #         async fn sign_event(&self, _template: EventTemplate) -> Result<Event, RelayStatus> {
//! #             Err(RelayStatus::fail_with_code(RelayCode::Unauthenticated, "no signer"))
//! #         }
//! #     }
//! # }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let pool: Arc<dyn RelayPool> = Arc::new(mock::MockPool);
//! let signer: Arc<dyn Signer> = Arc::new(mock::NoSigner);
//! let client = NostrClient::new(
//!     &ResolverConfig::default(),
//!     pool,
//!     signer,
//!     Arc::new(MemorySessionStore::default()),
//! );
//!
//! let alice = PublicKey::from_hex(&"a1".repeat(32)).unwrap();
//!
//! // Nobody answers, so the minimal default comes back.
//! let metadata = client.metadata(alice.clone()).await.unwrap();
//! assert_eq!(metadata.pubkey, alice);
//! assert!(!metadata.nip05valid);
//!
//! // Missing relay lists resolve to empty sides and stay cached.
//! assert!(client.relays(&alice).await.is_empty());
//! assert!(client.write_relays(None).await.is_empty());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`NostrClient`]
//! - Metadata: per-tick batching loader with an open/querying/closed batch lifecycle
//! - Relay lists: single-flight, never-evicted cache over one-record fetches
//! - Publish: startup-gated signer and independent per-relay fan-out
//! - Session: logged-in account restore, initialization and persistence
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

mod config;
pub use config::ResolverConfig;

mod event;
pub use event::{Event, EventTemplate, Filter, PublicKey, METADATA, RELAY_LIST};

mod metadata;
pub use metadata::{MetadataLoader, ProfileMetadata};

mod nostr_client;
pub use nostr_client::NostrClient;

#[doc(hidden)]
pub mod observability;

mod publish;
pub use publish::{GatedSigner, PublishTarget, Publisher, Signer};

mod relay_list;
pub use relay_list::{RelayList, RelayListCache};

mod relay_pool;
pub use relay_pool::{RelayMessage, RelayMessageStream, RelayPool};

mod session;
pub use session::{AccountSession, JsonFileSessionStore, MemorySessionStore, SessionStore};

mod status;
pub use status::{RelayCode, RelayStatus};
