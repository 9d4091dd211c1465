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

//! Canonical structured event names used across `relay-resolver`.

// Batched metadata loader events.
pub const METADATA_BATCH_OPEN: &str = "metadata_batch_open";
pub const METADATA_BATCH_DISPATCH: &str = "metadata_batch_dispatch";
pub const METADATA_BATCH_OPENER_DROPPED: &str = "metadata_batch_opener_dropped";
pub const METADATA_BATCH_QUERY_FAILED: &str = "metadata_batch_query_failed";
pub const METADATA_BATCH_RELAY_DONE: &str = "metadata_batch_relay_done";
pub const METADATA_BATCH_STREAM_ENDED: &str = "metadata_batch_stream_ended";
pub const METADATA_BATCH_CLOSED: &str = "metadata_batch_closed";
pub const METADATA_PAYLOAD_MALFORMED: &str = "metadata_payload_malformed";
pub const METADATA_EVENT_SUPERSEDED: &str = "metadata_event_superseded";
pub const METADATA_EVENT_UNEXPECTED_AUTHOR: &str = "metadata_event_unexpected_author";

// Relay list cache events.
pub const RELAY_LIST_CACHE_HIT: &str = "relay_list_cache_hit";
pub const RELAY_LIST_CACHE_INSERT: &str = "relay_list_cache_insert";
pub const RELAY_LIST_FETCH_OK: &str = "relay_list_fetch_ok";
pub const RELAY_LIST_NOT_FOUND: &str = "relay_list_not_found";
pub const RELAY_LIST_FETCH_FAILED: &str = "relay_list_fetch_failed";
pub const RELAY_LIST_TASK_ABORTED: &str = "relay_list_task_aborted";

// Publisher events.
pub const PUBLISH_SIGN_FAILED: &str = "publish_sign_failed";
pub const PUBLISH_SEND_ATTEMPT: &str = "publish_send_attempt";
pub const PUBLISH_SEND_OK: &str = "publish_send_ok";
pub const PUBLISH_SEND_FAILED: &str = "publish_send_failed";
pub const PUBLISH_FANOUT_DISPATCHED: &str = "publish_fanout_dispatched";

// Signer and account session events.
pub const SIGNER_GATE_WAIT: &str = "signer_gate_wait";
pub const ACCOUNT_RESTORED: &str = "account_restored";
pub const ACCOUNT_RESTORE_FAILED: &str = "account_restore_failed";
pub const ACCOUNT_INITIALIZED: &str = "account_initialized";
pub const ACCOUNT_INITIALIZE_FAILED: &str = "account_initialize_failed";
pub const ACCOUNT_PERSIST_FAILED: &str = "account_persist_failed";
