/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::time::Duration;

use thiserror::Error;

use g3_http::connect::HttpConnectError;
use g3_ip_locate::IpLocateError;
use g3_socks::SocksConnectError;
use g3_types::net::ProxyParseError;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] ProxyParseError),
    #[error("connect to proxy failed: {0}")]
    ConnectFailed(io::Error),
    #[error("read failed: {0}")]
    ReadFailed(io::Error),
    #[error("write failed: {0}")]
    WriteFailed(io::Error),
    #[error("protocol version mismatch: got {0:#04x}")]
    ProtocolVersionMismatch(u8),
    #[error("no acceptable auth method")]
    NoAcceptableMethod,
    #[error("unsupported auth method {0:#04x}")]
    UnsupportedAuthMethod(u8),
    #[error("proxy requires auth but no credentials given")]
    AuthRequired,
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("connect rejected with code {code:#04x}")]
    ConnectRejected { code: u8 },
    #[error("connect rejected: {status_line}")]
    ProxyConnectRejected { status_line: String },
    #[error("response truncated")]
    ResponseTruncated,
    #[error("ip extraction failed: {0}")]
    IpExtractionFailed(&'static str),
    #[error("lookup of {query} failed: {source}")]
    LookupFailed {
        query: String,
        source: IpLocateError,
    },
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl ProbeError {
    /// A stable name of the error kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::MalformedAddress(_) => "MalformedAddress",
            ProbeError::ConnectFailed(_) => "ConnectFailed",
            ProbeError::ReadFailed(_) => "ReadFailed",
            ProbeError::WriteFailed(_) => "WriteFailed",
            ProbeError::ProtocolVersionMismatch(_) => "ProtocolVersionMismatch",
            ProbeError::NoAcceptableMethod => "NoAcceptableMethod",
            ProbeError::UnsupportedAuthMethod(_) => "UnsupportedAuthMethod",
            ProbeError::AuthRequired => "AuthRequired",
            ProbeError::AuthenticationFailed => "AuthenticationFailed",
            ProbeError::ConnectRejected { .. } => "ConnectRejected",
            ProbeError::ProxyConnectRejected { .. } => "ProxyConnectRejected",
            ProbeError::ResponseTruncated => "ResponseTruncated",
            ProbeError::IpExtractionFailed(_) => "IpExtractionFailed",
            ProbeError::LookupFailed { .. } => "LookupFailed",
            ProbeError::Timeout(_) => "Timeout",
            ProbeError::Internal(_) => "Internal",
        }
    }
}

impl From<SocksConnectError> for ProbeError {
    fn from(e: SocksConnectError) -> Self {
        match e {
            SocksConnectError::ReadFailed(e) => ProbeError::ReadFailed(e),
            SocksConnectError::WriteFailed(e) => ProbeError::WriteFailed(e),
            SocksConnectError::ResponseTruncated => ProbeError::ResponseTruncated,
            SocksConnectError::InvalidVersion(v) => ProbeError::ProtocolVersionMismatch(v),
            SocksConnectError::NoAcceptableMethod => ProbeError::NoAcceptableMethod,
            SocksConnectError::UnsupportedAuthMethod(m) => ProbeError::UnsupportedAuthMethod(m),
            SocksConnectError::AuthRequired => ProbeError::AuthRequired,
            SocksConnectError::AuthFailed => ProbeError::AuthenticationFailed,
            SocksConnectError::RequestRejected(code) => ProbeError::ConnectRejected { code },
        }
    }
}

impl From<HttpConnectError> for ProbeError {
    fn from(e: HttpConnectError) -> Self {
        match e {
            HttpConnectError::RemoteClosed => ProbeError::ResponseTruncated,
            HttpConnectError::ReadFailed(e) => ProbeError::ReadFailed(e),
            HttpConnectError::WriteFailed(e) => ProbeError::WriteFailed(e),
            HttpConnectError::UnexpectedStatus(status_line) => {
                ProbeError::ProxyConnectRejected { status_line }
            }
            HttpConnectError::InvalidAuth(e) => {
                ProbeError::MalformedAddress(ProxyParseError::InvalidAuth(e))
            }
        }
    }
}
