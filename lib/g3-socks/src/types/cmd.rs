/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

/// Only CONNECT is used, BIND and UDP ASSOCIATE are not supported on the client side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksCommand {
    TcpConnect,
}

impl SocksCommand {
    pub const fn code(&self) -> u8 {
        match self {
            SocksCommand::TcpConnect => 0x01,
        }
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocksCommand::TcpConnect => f.write_str("TcpConnect"),
        }
    }
}
