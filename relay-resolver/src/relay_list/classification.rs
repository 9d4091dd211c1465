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

//! Read/write classification of relay list tags.

use serde::{Deserialize, Serialize};

const RELAY_TAG: &str = "r";
const MARKER_READ: &str = "read";
const MARKER_WRITE: &str = "write";

/// Read and write relays announced by one identity.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RelayList {
    pub read: Vec<String>,
    pub write: Vec<String>,
}

impl RelayList {
    /// Classifies `["r", url, marker?]` tags, keeping tag order.
    ///
    /// A `"read"` or `"write"` marker selects one side; no marker selects
    /// both. Unknown markers and other tags are dropped.
    ///
    /// ```
    /// use relay_resolver::RelayList;
    ///
    /// let tags = vec![
    ///     vec!["r".to_string(), "wss://a".to_string(), "write".to_string()],
    ///     vec!["r".to_string(), "wss://b".to_string()],
    ///     vec!["r".to_string(), "wss://c".to_string(), "read".to_string()],
    /// ];
    /// let relays = RelayList::from_tags(&tags);
    ///
    /// assert_eq!(relays.write, vec!["wss://a", "wss://b"]);
    /// assert_eq!(relays.read, vec!["wss://b", "wss://c"]);
    /// ```
    pub fn from_tags(tags: &[Vec<String>]) -> Self {
        let mut relays = Self::default();

        for tag in tags {
            match tag.as_slice() {
                [name, url] if name == RELAY_TAG => {
                    relays.read.push(url.clone());
                    relays.write.push(url.clone());
                }
                [name, url, marker, ..] if name == RELAY_TAG => match marker.as_str() {
                    MARKER_WRITE => relays.write.push(url.clone()),
                    MARKER_READ => relays.read.push(url.clone()),
                    _ => {}
                },
                _ => {}
            }
        }

        relays
    }

    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}
