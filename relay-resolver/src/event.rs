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

//! Wire-level records exchanged with relays.

use crate::{RelayCode, RelayStatus};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Profile metadata record kind.
pub const METADATA: u16 = 0;
/// Relay list record kind.
pub const RELAY_LIST: u16 = 10002;

const PUBLIC_KEY_HEX_LEN: usize = 64;

///
/// [`PublicKey`] identifies the author of a record: 32 bytes rendered as
/// lowercase hex.
///
/// # Examples
///
/// ```
/// use relay_resolver::PublicKey;
///
/// let key = PublicKey::from_hex(&"AB".repeat(32)).unwrap();
/// assert_eq!(key.as_str(), "ab".repeat(32));
///
/// assert!(PublicKey::from_hex("not-a-key").is_err());
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey(String);

impl PublicKey {
    pub fn from_hex(hex: &str) -> Result<Self, RelayStatus> {
        if hex.len() != PUBLIC_KEY_HEX_LEN {
            return Err(RelayStatus::fail_with_code(
                RelayCode::InvalidArgument,
                format!(
                    "public key must be {PUBLIC_KEY_HEX_LEN} hex characters, got {}",
                    hex.len()
                ),
            ));
        }
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(RelayStatus::fail_with_code(
                RelayCode::InvalidArgument,
                "public key contains non-hex characters",
            ));
        }

        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = RelayStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = RelayStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.0
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed record as delivered by a relay.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: PublicKey,
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

/// An unsigned record handed to a [`Signer`](crate::Signer).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub kind: u16,
    pub created_at: u64,
    pub tags: Vec<Vec<String>>,
    pub content: String,
}

/// Record selector sent to relays. Empty vectors mean "any".
///
/// ```
/// use relay_resolver::{Filter, PublicKey, METADATA};
///
/// let author = PublicKey::from_hex(&"01".repeat(32)).unwrap();
/// let filter = Filter::new().kind(METADATA).author(author.clone());
///
/// assert_eq!(filter.kinds, vec![METADATA]);
/// assert_eq!(filter.authors, vec![author]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PublicKey>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: u16) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn author(mut self, author: PublicKey) -> Self {
        self.authors.push(author);
        self
    }

    pub fn authors(mut self, authors: impl IntoIterator<Item = PublicKey>) -> Self {
        self.authors.extend(authors);
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&event.kind))
            && (self.authors.is_empty() || self.authors.contains(&event.pubkey))
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, Filter, PublicKey, METADATA, RELAY_LIST};
    use crate::RelayCode;

    fn key(byte: &str) -> PublicKey {
        PublicKey::from_hex(&byte.repeat(32)).expect("valid key")
    }

    fn event(author: PublicKey, kind: u16) -> Event {
        Event {
            id: "00".repeat(32),
            pubkey: author,
            created_at: 1,
            kind,
            tags: vec![],
            content: String::new(),
            sig: String::new(),
        }
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        let status = PublicKey::from_hex("abcd").expect_err("short key should fail");
        assert_eq!(status.code, RelayCode::InvalidArgument);
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let status = PublicKey::from_hex(&"zz".repeat(32)).expect_err("non-hex should fail");
        assert_eq!(status.code, RelayCode::InvalidArgument);
    }

    #[test]
    fn deserialize_validates_public_key() {
        let parsed: Result<PublicKey, _> = serde_json::from_str("\"nope\"");
        assert!(parsed.is_err());

        let parsed: PublicKey =
            serde_json::from_value(serde_json::Value::String("0a".repeat(32))).unwrap();
        assert_eq!(parsed, key("0a"));
    }

    #[test]
    fn filter_serialization_omits_empty_fields() {
        let filter = Filter::new().kind(RELAY_LIST);
        assert_eq!(
            serde_json::to_string(&filter).unwrap(),
            format!("{{\"kinds\":[{RELAY_LIST}]}}")
        );
    }

    #[test]
    fn filter_matches_on_kind_and_author() {
        let filter = Filter::new().kind(METADATA).author(key("01"));

        assert!(filter.matches(&event(key("01"), METADATA)));
        assert!(!filter.matches(&event(key("02"), METADATA)));
        assert!(!filter.matches(&event(key("01"), RELAY_LIST)));
        assert!(Filter::new().matches(&event(key("02"), RELAY_LIST)));
    }
}
