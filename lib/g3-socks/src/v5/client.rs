/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use futures_util::FutureExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use g3_types::net::{ProxyAuth, UpstreamAddr};

use super::{Socks5Reply, Socks5Request, SocksAuthMethod, SocksCommand, SocksConnectError, auth};

// rsv, atyp, domain length, 255 bytes domain and port
const MAX_BOUND_ADDR_SIZE: usize = 2 + 1 + 255 + 2;

async fn socks5_login<S>(stream: &mut S, auth: &ProxyAuth) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let auth_method = auth::send_and_recv_method(stream, auth).await?;
    match auth_method {
        SocksAuthMethod::None => Ok(()),
        SocksAuthMethod::User => {
            if let ProxyAuth::User(username, password) = auth {
                auth::proceed_with_user(stream, username, password).await
            } else {
                Err(SocksConnectError::AuthRequired)
            }
        }
        SocksAuthMethod::NoAcceptable => Err(SocksConnectError::NoAcceptableMethod),
        m => Err(SocksConnectError::UnsupportedAuthMethod(m.code())),
    }
}

/// Open a tcp tunnel to `addr` through a socks5 proxy.
///
/// Returns once the reply status says succeeded. The bound address that follows is still
/// in the stream, see `drain_bound_addr`.
pub async fn socks5_connect_to<S>(
    stream: &mut S,
    auth: &ProxyAuth,
    addr: &UpstreamAddr,
) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    socks5_login(stream, auth).await?;

    Socks5Request::send(stream, SocksCommand::TcpConnect, addr)
        .await
        .map_err(SocksConnectError::WriteFailed)?;

    Socks5Reply::recv_status(stream).await
}

/// Consume the bound address of a succeeded reply with the data already received.
///
/// This never waits for the peer. The address is `None` if it is missing, incomplete or
/// malformed. Data received after a valid address is returned as tunnel data.
pub fn drain_bound_addr<R>(reader: &mut R) -> (Option<UpstreamAddr>, Vec<u8>)
where
    R: AsyncRead + Unpin,
{
    let mut data = Vec::with_capacity(MAX_BOUND_ADDR_SIZE);
    let mut buf = [0u8; MAX_BOUND_ADDR_SIZE];
    loop {
        match Socks5Reply::parse_bound_addr(&data) {
            Ok(Some((addr, len))) => {
                data.drain(..len);
                return (Some(addr), data);
            }
            Ok(None) => {}
            Err(_) => return (None, Vec::new()),
        }

        match reader.read(&mut buf).now_or_never() {
            Some(Ok(0)) | Some(Err(_)) | None => return (None, Vec::new()),
            Some(Ok(n)) => data.extend_from_slice(&buf[..n]),
        }
    }
}
