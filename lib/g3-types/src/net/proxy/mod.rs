/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::auth::AuthParseError;
use crate::net::AddrParseError;

mod auth;
pub use auth::ProxyAuth;

mod endpoint;
pub use endpoint::ProxyEndpoint;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyParseError {
    #[error("no scheme found")]
    NoSchemeFound,
    #[error("invalid scheme")]
    InvalidScheme,
    #[error("no host found")]
    NoHostFound,
    #[error("unexpected path, query or fragment")]
    UnexpectedPath,
    #[error("auth parse failed: {0}")]
    InvalidAuth(#[from] AuthParseError),
    #[error("invalid peer address: {0}")]
    InvalidPeer(#[from] AddrParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyScheme {
    Socks5,
    /// http CONNECT, the proxy itself is always reached over plain tcp
    Http,
}

impl ProxyScheme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProxyScheme::Socks5 => "socks5",
            ProxyScheme::Http => "http",
        }
    }
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyScheme {
    type Err = ProxyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "socks5" | "socks" => Ok(ProxyScheme::Socks5),
            "http" | "https" => Ok(ProxyScheme::Http),
            _ => Err(ProxyParseError::InvalidScheme),
        }
    }
}
