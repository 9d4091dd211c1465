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

use thiserror::Error;

/// Coarse failure classes reported by the resolver and its collaborators.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RelayCode {
    InvalidArgument,
    NotFound,
    Unavailable,
    Unauthenticated,
    Internal,
}

/// Status carried by every fallible resolver operation.
///
/// Cloneable so a single transport failure can be handed to every caller
/// waiting on the same metadata batch.
///
/// ```
/// use relay_resolver::{RelayCode, RelayStatus};
///
/// let status = RelayStatus::fail_with_code(RelayCode::Unavailable, "relay unreachable");
/// assert_eq!(status.get_code(), RelayCode::Unavailable);
/// assert_eq!(status.to_string(), "Unavailable: relay unreachable");
/// ```
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{code:?}: {message}")]
pub struct RelayStatus {
    pub code: RelayCode,
    pub message: String,
}

impl RelayStatus {
    pub fn fail_with_code(code: RelayCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn get_code(&self) -> RelayCode {
        self.code
    }
}
