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

mod fake_relay_pool;
pub use fake_relay_pool::FakeRelayPool;

mod fake_signer;
pub use fake_signer::FakeSigner;

mod integration_test_records;
pub use integration_test_records::{
    metadata_event, relay_list_event, test_pubkey, unsigned_note, wait_until,
};

/// Installs a `tracing` subscriber once per test binary.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
