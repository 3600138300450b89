/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;

use log::{debug, info};

use g3_http::client::{HttpGetRequest, HttpVersion};
use g3_io_ext::LimitedReadExt;
use g3_ip_locate::{IpLocate, IpLocation};
use g3_types::net::ProxyEndpoint;

use super::{ProbeChannel, ProbeError, Prober, ProxyConnector, trace, tunnel};

const UNKNOWN: &str = "Unknown";

/// The public identity seen through a proxy
#[derive(Clone, Debug)]
pub struct IdentityRecord {
    exit_ip: IpAddr,
    entry: IpLocation,
    exit: IpLocation,
}

impl IdentityRecord {
    pub fn new(exit_ip: IpAddr, entry: IpLocation, exit: IpLocation) -> Self {
        IdentityRecord {
            exit_ip,
            entry,
            exit,
        }
    }

    #[inline]
    pub fn exit_ip(&self) -> IpAddr {
        self.exit_ip
    }

    pub fn country(&self) -> &str {
        self.exit.country().unwrap_or(UNKNOWN)
    }

    pub fn city(&self) -> &str {
        self.exit.city().unwrap_or(UNKNOWN)
    }

    pub fn org(&self) -> &str {
        self.exit.org().unwrap_or(UNKNOWN)
    }

    pub fn asn(&self) -> &str {
        self.exit.asn().unwrap_or(UNKNOWN)
    }

    /// Lookup result for the proxy host itself
    #[inline]
    pub fn entry(&self) -> &IpLocation {
        &self.entry
    }

    /// Lookup result for the egress ip
    #[inline]
    pub fn exit(&self) -> &IpLocation {
        &self.exit
    }
}

impl<C, L> Prober<C, L>
where
    C: ProxyConnector,
    L: IpLocate,
{
    pub async fn probe_identity(
        &self,
        endpoint: &ProxyEndpoint,
    ) -> Result<IdentityRecord, ProbeError> {
        let timeout = self.config.identity_timeout();
        let r = match tokio::time::timeout(timeout, self.discover_identity(endpoint)).await {
            Ok(r) => r,
            Err(_) => Err(ProbeError::Timeout(timeout)),
        };
        let (scheme, peer) = (endpoint.scheme(), endpoint.peer());
        match &r {
            Ok(record) => info!("{scheme}://{peer} exits from {}", record.exit_ip()),
            Err(e) => info!("{scheme}://{peer} identity probe failed: {e}"),
        }
        r
    }

    async fn discover_identity(
        &self,
        endpoint: &ProxyEndpoint,
    ) -> Result<IdentityRecord, ProbeError> {
        let entry_lookup = self.lookup(endpoint.peer().host().to_string());
        let exit_lookup = async {
            let exit_ip = self.trace_exit_ip(endpoint).await?;
            let location = self.lookup(exit_ip.to_string()).await?;
            Ok::<_, ProbeError>((exit_ip, location))
        };

        let (entry, (exit_ip, exit)) = futures_util::try_join!(entry_lookup, exit_lookup)?;
        Ok(IdentityRecord::new(exit_ip, entry, exit))
    }

    async fn lookup(&self, query: String) -> Result<IpLocation, ProbeError> {
        match self.locator.locate(&query).await {
            Ok(location) => Ok(location),
            Err(source) => Err(ProbeError::LookupFailed { query, source }),
        }
    }

    async fn trace_exit_ip(&self, endpoint: &ProxyEndpoint) -> Result<IpAddr, ProbeError> {
        let peer = endpoint.peer();
        let stream = self
            .connector
            .connect(peer)
            .await
            .map_err(ProbeError::ConnectFailed)?;
        debug!("connected to proxy {peer}");
        let mut channel = ProbeChannel::new(stream, peer);

        let r = self.fetch_trace(&mut channel, endpoint).await;
        channel.close().await;
        trace::extract_exit_ip(&r?)
    }

    async fn fetch_trace(
        &self,
        channel: &mut ProbeChannel<'_, C::Stream>,
        endpoint: &ProxyEndpoint,
    ) -> Result<Vec<u8>, ProbeError> {
        let target = self.config.trace_target();
        let mut buf = tunnel::establish(
            channel.stream_mut(),
            endpoint,
            target,
            self.config.connect_max_reads(),
        )
        .await?;

        let host = if target.port() == 80 {
            target.host().to_string()
        } else {
            target.to_string()
        };
        let req = HttpGetRequest::new(HttpVersion::Http11, self.config.trace_path(), &host);
        req.send(channel.stream_mut())
            .await
            .map_err(ProbeError::WriteFailed)?;

        channel
            .stream_mut()
            .read_chunks(&mut buf, self.config.trace_max_reads())
            .await
            .map_err(ProbeError::ReadFailed)?;
        debug!("received {} bytes of trace response", buf.len());
        Ok(buf)
    }
}
