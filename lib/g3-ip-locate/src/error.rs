/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use g3_http::client::HttpResponseParseError;

#[derive(Debug, Error)]
pub enum IpLocateError {
    #[error("connect to service failed: {0:?}")]
    ConnectFailed(io::Error),
    #[error("invalid tls server name {0}")]
    InvalidServerName(String),
    #[error("tls handshake failed: {0:?}")]
    TlsHandshakeFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("response larger than {0} bytes")]
    ResponseTooLarge(usize),
    #[error("invalid http response: {0}")]
    InvalidResponse(#[from] HttpResponseParseError),
    #[error("unexpected status code {0} {1}")]
    UnexpectedStatus(u16, String),
    #[error("invalid json body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("json body is not an object")]
    NotJsonObject,
}
