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

//! Persistence of the logged-in account between process runs.

use crate::{ProfileMetadata, RelayCode, RelayStatus};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Synchronous storage slot for the logged-in account.
pub trait SessionStore: Send + Sync {
    /// Returns the persisted account, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<ProfileMetadata>, RelayStatus>;

    fn save(&self, account: &ProfileMetadata) -> Result<(), RelayStatus>;
}

/// Stores the account as one JSON document on disk.
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self) -> Result<Option<ProfileMetadata>, RelayStatus> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(&self.path).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::Internal,
                format!("Unable to read session file: {e:?}"),
            )
        })?;
        serde_json::from_str(&data).map(Some).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::InvalidArgument,
                format!("Unable to parse session file: {e:?}"),
            )
        })
    }

    fn save(&self, account: &ProfileMetadata) -> Result<(), RelayStatus> {
        let data = serde_json::to_string(account).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::Internal,
                format!("Unable to serialize account: {e:?}"),
            )
        })?;
        std::fs::write(&self.path, data).map_err(|e| {
            RelayStatus::fail_with_code(
                RelayCode::Internal,
                format!("Unable to write session file: {e:?}"),
            )
        })
    }
}

/// In-process store, mostly useful for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    account: Mutex<Option<ProfileMetadata>>,
}

impl MemorySessionStore {
    pub fn with_account(account: ProfileMetadata) -> Self {
        Self {
            account: Mutex::new(Some(account)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<ProfileMetadata>, RelayStatus> {
        Ok(self
            .account
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, account: &ProfileMetadata) -> Result<(), RelayStatus> {
        *self.account.lock().unwrap_or_else(PoisonError::into_inner) = Some(account.clone());
        Ok(())
    }
}
