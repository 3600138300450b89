/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use g3_types::auth::AuthParseError;

#[derive(Debug, Error)]
pub enum HttpConnectError {
    #[error("remote closed")]
    RemoteClosed,
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    /// the raw status line, or the first received line if it is not a valid status line
    #[error("unexpected status: {0}")]
    UnexpectedStatus(String),
    #[error("invalid auth: {0}")]
    InvalidAuth(AuthParseError),
}
