/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use g3_types::net::{Host, UpstreamAddr};

/// Open a duplex byte stream to a proxy peer
#[async_trait]
pub trait ProxyConnector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, peer: &UpstreamAddr) -> io::Result<Self::Stream>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TcpConnector;

#[async_trait]
impl ProxyConnector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, peer: &UpstreamAddr) -> io::Result<TcpStream> {
        match peer.host() {
            Host::Ip(ip) => TcpStream::connect(SocketAddr::new(*ip, peer.port())).await,
            Host::Domain(domain) => TcpStream::connect((domain.as_str(), peer.port())).await,
        }
    }
}

/// The stream used by one probe attempt.
///
/// It is closed gracefully by `close`, or just dropped if the attempt is cancelled.
pub struct ProbeChannel<'a, S: AsyncWrite + Unpin> {
    stream: S,
    peer: &'a UpstreamAddr,
}

impl<'a, S> ProbeChannel<'a, S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: &'a UpstreamAddr) -> Self {
        trace!("channel to {peer} opened");
        ProbeChannel { stream, peer }
    }

    #[inline]
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Shutdown the write side, errors are only logged
    pub async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            debug!("failed to shutdown channel to {}: {e}", self.peer);
        }
    }
}

impl<S: AsyncWrite + Unpin> Drop for ProbeChannel<'_, S> {
    fn drop(&mut self) {
        trace!("channel to {} released", self.peer);
    }
}
