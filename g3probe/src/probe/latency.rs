/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use tokio::time::Instant;

use g3_ip_locate::IpLocate;
use g3_types::net::ProxyEndpoint;

use super::{ProbeChannel, ProbeError, Prober, ProxyConnector, tunnel};

#[derive(Debug)]
pub enum ProbeOutcome {
    Online { latency: Duration },
    Offline { reason: ProbeError },
}

impl ProbeOutcome {
    pub fn is_online(&self) -> bool {
        matches!(self, ProbeOutcome::Online { .. })
    }

    pub fn latency_ms(&self) -> Option<u128> {
        match self {
            ProbeOutcome::Online { latency } => Some(latency.as_millis()),
            ProbeOutcome::Offline { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyGrade {
    Good,
    Medium,
    Bad,
}

impl LatencyGrade {
    pub fn from_latency(latency: Duration) -> Self {
        match latency.as_millis() {
            0..200 => LatencyGrade::Good,
            200..500 => LatencyGrade::Medium,
            _ => LatencyGrade::Bad,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            LatencyGrade::Good => "good",
            LatencyGrade::Medium => "medium",
            LatencyGrade::Bad => "bad",
        }
    }
}

impl fmt::Display for LatencyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<C, L> Prober<C, L>
where
    C: ProxyConnector,
    L: IpLocate,
{
    /// Measure the time to get a tunnel to the latency target through the proxy
    pub async fn probe_latency(&self, endpoint: &ProxyEndpoint) -> ProbeOutcome {
        let timeout = self.config.latency_timeout();
        let outcome = match tokio::time::timeout(timeout, self.measure_latency(endpoint)).await {
            Ok(Ok(latency)) => ProbeOutcome::Online { latency },
            Ok(Err(reason)) => ProbeOutcome::Offline { reason },
            Err(_) => ProbeOutcome::Offline {
                reason: ProbeError::Timeout(timeout),
            },
        };
        let (scheme, peer) = (endpoint.scheme(), endpoint.peer());
        match &outcome {
            ProbeOutcome::Online { latency } => info!("{scheme}://{peer} online in {latency:?}"),
            ProbeOutcome::Offline { reason } => info!("{scheme}://{peer} offline: {reason}"),
        }
        outcome
    }

    async fn measure_latency(&self, endpoint: &ProxyEndpoint) -> Result<Duration, ProbeError> {
        let start = Instant::now();
        let peer = endpoint.peer();
        let stream = self
            .connector
            .connect(peer)
            .await
            .map_err(ProbeError::ConnectFailed)?;
        debug!("connected to proxy {peer}");
        let mut channel = ProbeChannel::new(stream, peer);

        let r = tunnel::establish(
            channel.stream_mut(),
            endpoint,
            self.config.latency_target(),
            self.config.connect_max_reads(),
        )
        .await;
        let latency = start.elapsed();
        channel.close().await;
        r.map(|_| latency)
    }
}
