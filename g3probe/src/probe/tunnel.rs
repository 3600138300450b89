/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use g3_types::net::{ProxyEndpoint, ProxyScheme, UpstreamAddr};

use super::ProbeError;

/// Run the proxy handshake for a tunnel to `target`.
///
/// Returns tunnel data that was received together with the handshake response. For socks5
/// only the reply status is waited for.
pub(super) async fn establish<S>(
    stream: &mut S,
    endpoint: &ProxyEndpoint,
    target: &UpstreamAddr,
    connect_max_reads: usize,
) -> Result<Vec<u8>, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match endpoint.scheme() {
        ProxyScheme::Socks5 => {
            g3_socks::v5::client::socks5_connect_to(stream, endpoint.auth(), target).await?;
            // the tunnel is usable once the reply status is succeeded
            let (bound, left) = g3_socks::v5::client::drain_bound_addr(stream);
            match bound {
                Some(addr) => debug!(
                    "socks5 tunnel to {target} via {} bound at {addr}",
                    endpoint.peer()
                ),
                None => debug!(
                    "socks5 tunnel to {target} via {} without a valid bound address",
                    endpoint.peer()
                ),
            }
            Ok(left)
        }
        ProxyScheme::Http => {
            let left = g3_http::connect::http_connect_to(
                stream,
                endpoint.auth(),
                target,
                connect_max_reads,
            )
            .await?;
            debug!("http tunnel to {target} via {} established", endpoint.peer());
            Ok(left)
        }
    }
}
