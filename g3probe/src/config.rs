/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

use g3_ip_locate::IpLocateServiceConfig;
use g3_types::net::{Host, UpstreamAddr};

const DEFAULT_TRACE_HOST: &str = "check.socks5.090227.xyz";
const DEFAULT_TRACE_PATH: &str = "/cdn-cgi/trace";
const DEFAULT_CONCURRENCY: NonZeroUsize = NonZeroUsize::new(5).unwrap();

#[derive(Clone, Debug)]
pub struct ProbeConfig {
    latency_target: UpstreamAddr,
    latency_timeout: Duration,
    trace_target: UpstreamAddr,
    trace_path: String,
    identity_timeout: Duration,
    connect_max_reads: usize,
    trace_max_reads: usize,
    concurrency: NonZeroUsize,
    ip_locate: IpLocateServiceConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            latency_target: UpstreamAddr::from_ip_and_port(
                IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)),
                80,
            ),
            latency_timeout: Duration::from_secs(5),
            trace_target: UpstreamAddr::new(Host::Domain(DEFAULT_TRACE_HOST.to_string()), 80),
            trace_path: DEFAULT_TRACE_PATH.to_string(),
            identity_timeout: Duration::from_secs(15),
            connect_max_reads: 10,
            trace_max_reads: 100,
            concurrency: DEFAULT_CONCURRENCY,
            ip_locate: IpLocateServiceConfig::default(),
        }
    }
}

impl ProbeConfig {
    #[inline]
    pub fn latency_target(&self) -> &UpstreamAddr {
        &self.latency_target
    }

    #[inline]
    pub fn latency_timeout(&self) -> Duration {
        self.latency_timeout
    }

    #[inline]
    pub fn trace_target(&self) -> &UpstreamAddr {
        &self.trace_target
    }

    #[inline]
    pub fn trace_path(&self) -> &str {
        &self.trace_path
    }

    #[inline]
    pub fn identity_timeout(&self) -> Duration {
        self.identity_timeout
    }

    #[inline]
    pub fn connect_max_reads(&self) -> usize {
        self.connect_max_reads
    }

    #[inline]
    pub fn trace_max_reads(&self) -> usize {
        self.trace_max_reads
    }

    #[inline]
    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    #[inline]
    pub fn ip_locate(&self) -> &IpLocateServiceConfig {
        &self.ip_locate
    }

    pub fn set_latency_target(&mut self, target: UpstreamAddr) {
        self.latency_target = target;
    }

    pub fn set_latency_timeout(&mut self, timeout: Duration) {
        self.latency_timeout = timeout;
    }

    pub fn set_trace_target(&mut self, target: UpstreamAddr) {
        self.trace_target = target;
    }

    pub fn set_trace_path(&mut self, path: String) -> anyhow::Result<()> {
        if !path.starts_with('/') {
            return Err(anyhow!("trace path should start with '/'"));
        }
        self.trace_path = path;
        Ok(())
    }

    pub fn set_identity_timeout(&mut self, timeout: Duration) {
        self.identity_timeout = timeout;
    }

    pub fn set_connect_max_reads(&mut self, count: NonZeroUsize) {
        self.connect_max_reads = count.get();
    }

    pub fn set_trace_max_reads(&mut self, count: NonZeroUsize) {
        self.trace_max_reads = count.get();
    }

    pub fn set_concurrency(&mut self, concurrency: NonZeroUsize) {
        self.concurrency = concurrency;
    }

    pub fn set_ip_locate(&mut self, config: IpLocateServiceConfig) {
        self.ip_locate = config;
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {e}", path.display()))?;
        let docs = YamlLoader::load_from_str(&content)
            .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
        match docs.first() {
            Some(doc) => ProbeConfig::parse_yaml(doc)
                .context(format!("invalid config file {}", path.display())),
            None => Ok(ProbeConfig::default()),
        }
    }

    pub fn parse_yaml(value: &Yaml) -> anyhow::Result<Self> {
        match value {
            Yaml::Hash(map) => {
                let mut config = ProbeConfig::default();

                g3_yaml::foreach_kv(map, |k, v| config.set(k, v))?;

                Ok(config)
            }
            Yaml::Null => Ok(ProbeConfig::default()),
            _ => Err(anyhow!("yaml type for 'probe config' should be 'map'")),
        }
    }

    fn set(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match g3_yaml::key::normalize(k).as_str() {
            "latency_target" => {
                self.latency_target = g3_yaml::value::as_upstream_addr(v)?;
                Ok(())
            }
            "latency_timeout" => {
                self.latency_timeout = g3_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            "trace_target" => {
                self.trace_target = g3_yaml::value::as_upstream_addr(v)?;
                Ok(())
            }
            "trace_path" => {
                let path = g3_yaml::value::as_string(v)?;
                self.set_trace_path(path)
            }
            "identity_timeout" => {
                self.identity_timeout = g3_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            "connect_max_reads" => {
                let count = g3_yaml::value::as_nonzero_usize(v)?;
                self.set_connect_max_reads(count);
                Ok(())
            }
            "trace_max_reads" => {
                let count = g3_yaml::value::as_nonzero_usize(v)?;
                self.set_trace_max_reads(count);
                Ok(())
            }
            "concurrency" => {
                self.concurrency = g3_yaml::value::as_nonzero_usize(v)?;
                Ok(())
            }
            "ip_locate" | "ip_locate_service" => {
                self.ip_locate = IpLocateServiceConfig::parse_yaml(v)?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }
}
