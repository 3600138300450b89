/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use crate::v5::Socks5Reply;

#[derive(Error, Debug)]
pub enum SocksNegotiationError {
    #[error("invalid domain string")]
    InvalidDomainString,
    #[error("invalid addr type {0:#04x}")]
    InvalidAddrType(u8),
}

fn reply_message(code: &u8) -> &'static str {
    Socks5Reply::from_code(*code).error_message()
}

#[derive(Error, Debug)]
pub enum SocksConnectError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("peer closed before a full response")]
    ResponseTruncated,
    #[error("invalid version code {0:#04x}")]
    InvalidVersion(u8),
    #[error("no acceptable auth method")]
    NoAcceptableMethod,
    #[error("unsupported auth method {0:#04x}")]
    UnsupportedAuthMethod(u8),
    #[error("auth required but no credentials available")]
    AuthRequired,
    #[error("auth failed")]
    AuthFailed,
    #[error("request rejected with code {0:#04x}: {msg}", msg = reply_message(.0))]
    RequestRejected(u8),
}

impl SocksConnectError {
    pub(crate) fn from_read(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SocksConnectError::ResponseTruncated
        } else {
            SocksConnectError::ReadFailed(e)
        }
    }
}
