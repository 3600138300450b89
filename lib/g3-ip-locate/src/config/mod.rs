/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::anyhow;
use url::Url;

use super::HttpIpLocator;

#[cfg(feature = "yaml")]
mod yaml;

const DEFAULT_SERVICE_URL: &str = "https://api.ipapi.is/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IpLocateServiceConfig {
    pub(crate) service_url: Url,
    pub(crate) query_param: String,
    pub(crate) request_timeout: Duration,
    pub(crate) max_response_size: usize,
}

impl Default for IpLocateServiceConfig {
    fn default() -> Self {
        IpLocateServiceConfig {
            service_url: Url::parse(DEFAULT_SERVICE_URL).unwrap(),
            query_param: "q".to_string(),
            request_timeout: Duration::from_secs(5),
            max_response_size: 1024 * 1024,
        }
    }
}

impl IpLocateServiceConfig {
    pub fn set_service_url(&mut self, url: Url) -> anyhow::Result<()> {
        match url.scheme() {
            "http" | "https" => {}
            s => return Err(anyhow!("unsupported url scheme {s}")),
        }
        if url.host().is_none() {
            return Err(anyhow!("no host found in url {url}"));
        }
        self.service_url = url;
        Ok(())
    }

    pub fn set_query_param(&mut self, name: String) {
        self.query_param = name;
    }

    pub fn set_request_timeout(&mut self, time: Duration) {
        self.request_timeout = time;
    }

    pub fn set_max_response_size(&mut self, size: usize) {
        self.max_response_size = size;
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn build_locator(&self) -> anyhow::Result<HttpIpLocator> {
        HttpIpLocator::new(self.clone())
    }
}
