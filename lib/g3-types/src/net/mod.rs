/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
mod host;
mod proxy;
mod upstream;

#[cfg(feature = "http")]
mod http;

pub use error::AddrParseError;
pub use host::Host;
pub use proxy::{ProxyAuth, ProxyEndpoint, ProxyParseError, ProxyScheme};
pub use upstream::UpstreamAddr;

#[cfg(feature = "http")]
pub use self::http::HttpBasicAuth;
