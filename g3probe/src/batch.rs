/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use log::{error, warn};

use g3_ip_locate::IpLocate;
use g3_types::net::ProxyEndpoint;

use crate::probe::{IdentityRecord, ProbeError, ProbeOutcome, Prober, ProxyConnector};
use crate::target::ProbeTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeKind {
    Latency,
    Identity,
}

impl ProbeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Latency => "latency",
            ProbeKind::Identity => "identity",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ProbeReport {
    Latency(ProbeOutcome),
    Identity(Result<IdentityRecord, ProbeError>),
}

impl ProbeReport {
    fn failed(kind: ProbeKind, e: ProbeError) -> Self {
        match kind {
            ProbeKind::Latency => ProbeReport::Latency(ProbeOutcome::Offline { reason: e }),
            ProbeKind::Identity => ProbeReport::Identity(Err(e)),
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            ProbeReport::Latency(ProbeOutcome::Offline { reason }) => Some(reason),
            ProbeReport::Latency(ProbeOutcome::Online { .. }) => None,
            ProbeReport::Identity(r) => r.as_ref().err(),
        }
    }
}

#[derive(Debug)]
pub struct BatchResult {
    target: ProbeTarget,
    kind: ProbeKind,
    report: ProbeReport,
}

impl BatchResult {
    pub fn new(target: ProbeTarget, kind: ProbeKind, report: ProbeReport) -> Self {
        BatchResult {
            target,
            kind,
            report,
        }
    }

    #[inline]
    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    #[inline]
    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    #[inline]
    pub fn report(&self) -> &ProbeReport {
        &self.report
    }
}

impl<C, L> Prober<C, L>
where
    C: ProxyConnector + 'static,
    L: IpLocate + 'static,
{
    /// Probe a single catalog entry, parse errors are reported as the probe result
    pub async fn probe_target(&self, target: &ProbeTarget, kind: ProbeKind) -> ProbeReport {
        let endpoint = match ProxyEndpoint::from_str(target.address()) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("target #{}: invalid address: {e}", target.id());
                return ProbeReport::failed(kind, e.into());
            }
        };

        match kind {
            ProbeKind::Latency => ProbeReport::Latency(self.probe_latency(&endpoint).await),
            ProbeKind::Identity => ProbeReport::Identity(self.probe_identity(&endpoint).await),
        }
    }

    /// Yield results in input order, with at most `concurrency` probes in flight.
    ///
    /// Each probe is spawned as a separate task.
    pub fn batch_stream(
        self: Arc<Self>,
        targets: Vec<ProbeTarget>,
        kind: ProbeKind,
        concurrency: NonZeroUsize,
    ) -> impl Stream<Item = BatchResult> {
        futures_util::stream::iter(targets)
            .map(move |target| {
                let prober = Arc::clone(&self);
                let task_target = target.clone();
                let handle =
                    tokio::spawn(async move { prober.probe_target(&task_target, kind).await });
                async move {
                    let report = match handle.await {
                        Ok(report) => report,
                        Err(e) => {
                            error!("target #{}: probe task failed: {e}", target.id());
                            ProbeReport::failed(kind, ProbeError::Internal("probe task panic"))
                        }
                    };
                    BatchResult::new(target, kind, report)
                }
            })
            .buffered(concurrency.get())
    }

    pub async fn run_batch(
        self: Arc<Self>,
        targets: Vec<ProbeTarget>,
        kind: ProbeKind,
        concurrency: NonZeroUsize,
    ) -> Vec<BatchResult> {
        self.batch_stream(targets, kind, concurrency).collect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_test::io::{Builder, Mock};

    use g3_types::net::UpstreamAddr;

    use crate::config::ProbeConfig;
    use crate::probe::tests::StubLocator;
    use crate::target::ProbeTargetList;

    #[derive(Default)]
    struct PortConnector {
        streams: Mutex<HashMap<u16, Mock>>,
    }

    #[async_trait]
    impl ProxyConnector for PortConnector {
        type Stream = Mock;

        async fn connect(&self, peer: &UpstreamAddr) -> io::Result<Mock> {
            let stream = self.streams.lock().unwrap().remove(&peer.port());
            stream.ok_or_else(|| io::Error::from(io::ErrorKind::ConnectionRefused))
        }
    }

    fn socks5_online(delay: Duration) -> Mock {
        Builder::new()
            .write(&[0x05, 0x01, 0x00])
            .wait(delay)
            .read(&[0x05, 0x00])
            .write(&[0x05, 0x01, 0x00, 0x01, 1, 1, 1, 1, 0x00, 80])
            .read(&[0x05, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0x00, 0x00])
            .build()
    }

    #[tokio::test(start_paused = true)]
    async fn keep_input_order() {
        let connector = PortConnector::default();
        {
            let mut streams = connector.streams.lock().unwrap();
            streams.insert(1001, socks5_online(Duration::from_millis(300)));
            streams.insert(1003, socks5_online(Duration::from_millis(10)));
            streams.insert(
                1004,
                Builder::new()
                    .write(&[0x05, 0x01, 0x00])
                    .read(&[0x05, 0xFF])
                    .build(),
            );
        }
        let prober = Arc::new(Prober::new(
            Arc::new(ProbeConfig::default()),
            connector,
            StubLocator::default(),
        ));

        let mut list = ProbeTargetList::default();
        list.push_line("socks5://198.51.100.1:1001#slow");
        list.push_line("socks5://198.51.100.1");
        list.push_line("socks5://198.51.100.1:1003#fast");
        list.push_line("socks5://198.51.100.1:1004");
        list.push_line("socks5://198.51.100.1:1005");

        let concurrency = NonZeroUsize::new(3).unwrap();
        let results = prober
            .run_batch(list.into_inner(), ProbeKind::Latency, concurrency)
            .await;
        assert_eq!(results.len(), 5);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.target().id(), i + 1);
            assert_eq!(r.kind(), ProbeKind::Latency);
        }

        let ProbeReport::Latency(outcome) = results[0].report() else {
            panic!("not a latency report");
        };
        assert!(outcome.latency_ms() >= Some(300));
        assert_eq!(
            results[1].report().error().map(|e| e.kind()),
            Some("MalformedAddress")
        );
        assert!(results[2].report().error().is_none());
        assert_eq!(
            results[3].report().error().map(|e| e.kind()),
            Some("NoAcceptableMethod")
        );
        assert_eq!(
            results[4].report().error().map(|e| e.kind()),
            Some("ConnectFailed")
        );
    }

    #[tokio::test]
    async fn malformed_identity_target() {
        let prober = Prober::new(
            Arc::new(ProbeConfig::default()),
            PortConnector::default(),
            StubLocator::default(),
        );
        let target = ProbeTarget::new(7, "ftp://proxy.example:21".to_string(), None);
        let report = prober.probe_target(&target, ProbeKind::Identity).await;
        let ProbeReport::Identity(Err(e)) = report else {
            panic!("identity probe should fail");
        };
        assert!(matches!(e, ProbeError::MalformedAddress(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn spawned_on_workers() {
        let connector = PortConnector::default();
        {
            let mut streams = connector.streams.lock().unwrap();
            for port in 2001..2005 {
                streams.insert(port, socks5_online(Duration::from_millis(5)));
            }
        }
        let prober = Arc::new(Prober::new(
            Arc::new(ProbeConfig::default()),
            connector,
            StubLocator::default(),
        ));

        let mut list = ProbeTargetList::default();
        for port in 2001..2005 {
            list.push_line(&format!("socks5://198.51.100.1:{port}"));
        }
        let concurrency = NonZeroUsize::new(4).unwrap();
        let results = prober
            .run_batch(list.into_inner(), ProbeKind::Latency, concurrency)
            .await;
        assert_eq!(results.len(), 4);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.target().address(), format!("socks5://198.51.100.1:{}", 2001 + i));
            assert!(r.report().error().is_none());
        }
    }
}
