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

//! Profile metadata record and payload merge rules.

use crate::PublicKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const PUBKEY_FIELD: &str = "pubkey";
const NIP05_VALID_FIELD: &str = "nip05valid";
const GROUPS_FIELD: &str = "groups";
const WRITE_RELAYS_FIELD: &str = "writeRelays";

/// Profile metadata of one identity.
///
/// Known fields are typed; anything else a relay returns is kept verbatim in
/// [`extra`](Self::extra).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub pubkey: PublicKey,
    #[serde(default)]
    pub nip05valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip05: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Value>>,
    #[serde(
        rename = "writeRelays",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub write_relays: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileMetadata {
    /// Record synthesized for a key no relay answered for.
    pub fn minimal(pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            nip05valid: false,
            name: None,
            display_name: None,
            nip05: None,
            picture: None,
            groups: None,
            write_relays: None,
            extra: Map::new(),
        }
    }

    /// Builds a record from a metadata payload authored by `pubkey`.
    ///
    /// Payload fields are laid over the defaults (`nip05valid = false`, empty
    /// `groups` and `writeRelays`). The author key always wins over a
    /// `pubkey` field inside the payload.
    pub fn from_payload(pubkey: &PublicKey, content: &str) -> Result<Self, serde_json::Error> {
        let payload: Map<String, Value> = serde_json::from_str(content)?;

        let mut merged = Map::new();
        merged.insert(NIP05_VALID_FIELD.to_string(), Value::Bool(false));
        merged.insert(GROUPS_FIELD.to_string(), Value::Array(Vec::new()));
        merged.insert(WRITE_RELAYS_FIELD.to_string(), Value::Array(Vec::new()));
        merged.extend(payload);
        merged.insert(
            PUBKEY_FIELD.to_string(),
            Value::String(pubkey.as_str().to_string()),
        );

        serde_json::from_value(Value::Object(merged))
    }
}
