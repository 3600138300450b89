/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use g3_io_ext::LimitedWriteExt;
use g3_types::auth::{Password, Username};
use g3_types::net::ProxyAuth;

use super::{SocksAuthMethod, SocksConnectError};

pub(super) async fn send_and_recv_method<S>(
    stream: &mut S,
    auth: &ProxyAuth,
) -> Result<SocksAuthMethod, SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let methods = match auth {
        ProxyAuth::None => vec![SocksAuthMethod::None],
        ProxyAuth::User(_, _) => vec![SocksAuthMethod::None, SocksAuthMethod::User],
    };

    let mut msg = Vec::<u8>::with_capacity(2 + methods.len());
    msg.push(0x05);
    msg.push(methods.len() as u8);
    for m in methods {
        msg.push(m.code());
    }
    stream
        .write_all_flush(&msg)
        .await
        .map_err(SocksConnectError::WriteFailed)?;

    let mut buf = [0u8; 2];
    stream
        .read_exact(&mut buf)
        .await
        .map_err(SocksConnectError::from_read)?;
    if buf[0] != 0x05 {
        return Err(SocksConnectError::InvalidVersion(buf[0]));
    }
    Ok(SocksAuthMethod::from(buf[1]))
}

pub(super) async fn proceed_with_user<S>(
    stream: &mut S,
    username: &Username,
    password: &Password,
) -> Result<(), SocksConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let ulen = username.len();
    let plen = password.len();
    let mut msg = BytesMut::with_capacity(3 + ulen as usize + plen as usize);
    msg.put_u8(0x01);
    msg.put_u8(ulen);
    msg.put_slice(username.as_original().as_bytes());
    msg.put_u8(plen);
    msg.put_slice(password.as_original().as_bytes());
    stream
        .write_all_flush(msg.as_ref())
        .await
        .map_err(SocksConnectError::WriteFailed)?;

    let mut buf = [0u8; 2];
    stream
        .read_exact(&mut buf)
        .await
        .map_err(SocksConnectError::from_read)?;
    // the version byte is not checked
    if buf[1] != 0x00 {
        return Err(SocksConnectError::AuthFailed);
    }
    Ok(())
}
