/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpConnectError;

mod request;
pub use request::HttpConnectRequest;

mod client;
pub use client::http_connect_to;
