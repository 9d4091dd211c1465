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

use crate::{RelayCode, RelayStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_PROFILE_RELAYS: [&str; 4] = [
    "wss://relay.nos.social",
    "wss://relay.nostr.band",
    "wss://purplepag.es",
    "wss://relay.snort.social",
];

const DEFAULT_RELAY_LIST_RELAYS: [&str; 4] = [
    "wss://purplepag.es",
    "wss://nos.lol",
    "wss://relay.nos.social",
    "wss://relay.damus.io",
];

const DEFAULT_REPOSITORY_RELAYS: [&str; 5] = [
    "wss://relay.nostr.bg",
    "wss://nostr21.com",
    "wss://nostr.fmt.wiz.biz",
    "wss://nostr-pub.wellorder.net",
    "wss://relay.damus.io",
];

const DEFAULT_SIGNER_STARTUP_DELAY_MS: u64 = 500;

/// Static relay sets and timing knobs for the resolver.
///
/// Every field is optional in the json5 source; missing fields take the defaults.
///
/// ```
/// use relay_resolver::ResolverConfig;
///
/// let config = ResolverConfig::from_json5_str(
///     r#"{
///         // metadata is looked up on a single relay
///         profile_relays: ["wss://relay.example"],
///         batch_window_ms: 5,
///     }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.profile_relays, vec!["wss://relay.example".to_string()]);
/// assert_eq!(config.relay_list_relays.len(), 4);
/// assert_eq!(config.repository_relays.len(), 5);
/// assert_eq!(config.signer_startup_delay_ms, 500);
/// ```
#[derive(Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub profile_relays: Vec<String>,
    pub relay_list_relays: Vec<String>,
    /// Publish targets for repository announcements.
    pub repository_relays: Vec<String>,
    pub batch_window_ms: u64,
    pub signer_startup_delay_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            profile_relays: DEFAULT_PROFILE_RELAYS.map(String::from).to_vec(),
            relay_list_relays: DEFAULT_RELAY_LIST_RELAYS.map(String::from).to_vec(),
            repository_relays: DEFAULT_REPOSITORY_RELAYS.map(String::from).to_vec(),
            batch_window_ms: 0,
            signer_startup_delay_ms: DEFAULT_SIGNER_STARTUP_DELAY_MS,
        }
    }
}

impl ResolverConfig {
    pub fn from_json5_str(contents: &str) -> Result<Self, RelayStatus> {
        json5::from_str(contents).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::InvalidArgument,
                format!("Unable to parse config: {e:?}"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RelayStatus> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::NotFound,
                format!("Unable to read config file: {e:?}"),
            )
        })?;
        Self::from_json5_str(&contents)
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    pub fn signer_startup_delay(&self) -> Duration {
        Duration::from_millis(self.signer_startup_delay_ms)
    }
}
