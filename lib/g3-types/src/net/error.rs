/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddrParseError {
    #[error("empty host")]
    EmptyHost,
    #[error("invalid ipv6 address")]
    InvalidIpv6Address,
    #[error("invalid domain")]
    InvalidDomain,
    #[error("too long domain")]
    TooLongDomain,
    #[error("no port found")]
    NoPortFound,
    #[error("invalid port")]
    InvalidPort,
}
