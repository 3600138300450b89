/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;

mod config;
pub use config::IpLocateServiceConfig;

mod error;
pub use error::IpLocateError;

mod location;
pub use location::IpLocation;

mod http;
pub use http::HttpIpLocator;

/// Look up the geolocation and network owner of an ip address or host name
#[async_trait]
pub trait IpLocate: Send + Sync {
    async fn locate(&self, query: &str) -> Result<IpLocation, IpLocateError>;
}
