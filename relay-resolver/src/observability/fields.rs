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

//! Canonical structured field keys and value-format helpers.

use crate::PublicKey;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const BATCH_ID: &str = "batch_id";
pub const PUBKEY: &str = "pubkey";
pub const RELAY: &str = "relay";
pub const RELAYS: &str = "relays";
pub const ERR: &str = "err";
pub const REASON: &str = "reason";

pub const NONE: &str = "none";
pub const REASON_NOT_FOUND: &str = "not_found";
pub const REASON_ALREADY_INITIALIZED: &str = "already_initialized";

const PUBKEY_DISPLAY_LEN: usize = 8;

/// Short, stable prefix of a public key for log lines.
pub fn format_pubkey(pubkey: &PublicKey) -> String {
    pubkey.as_str().chars().take(PUBKEY_DISPLAY_LEN).collect()
}

pub fn format_relays(relays: &[String]) -> String {
    if relays.is_empty() {
        NONE.to_string()
    } else {
        relays.join(",")
    }
}
