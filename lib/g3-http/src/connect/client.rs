/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use tokio::io::{AsyncRead, AsyncWrite};

use g3_io_ext::{LimitedReadExt, ReadChunksStop};
use g3_types::net::{HttpBasicAuth, ProxyAuth, UpstreamAddr};

use super::{HttpConnectError, HttpConnectRequest};
use crate::HttpStatusLine;

/// Open a tcp tunnel to `addr` through a http proxy.
///
/// The response is read in at most `max_reads` read operations, stopping at the end of the
/// header. Bytes received after the header belong to the tunnel and are returned.
pub async fn http_connect_to<S>(
    stream: &mut S,
    auth: &ProxyAuth,
    addr: &UpstreamAddr,
    max_reads: usize,
) -> Result<Vec<u8>, HttpConnectError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut req = HttpConnectRequest::new(addr);
    if let ProxyAuth::User(username, password) = auth {
        let basic =
            HttpBasicAuth::new(username, password).map_err(HttpConnectError::InvalidAuth)?;
        req.append_dyn_header(basic.proxy_authorization_line());
    }

    req.send(stream)
        .await
        .map_err(HttpConnectError::WriteFailed)?;

    let mut buf = Vec::with_capacity(1024);
    let stop = stream
        .read_chunks_until(&mut buf, b"\r\n\r\n", max_reads)
        .await
        .map_err(HttpConnectError::ReadFailed)?;
    if buf.is_empty() {
        return Err(HttpConnectError::RemoteClosed);
    }

    let line_end = memchr::memchr(b'\n', &buf).map(|p| p + 1).unwrap_or(buf.len());
    let line = &buf[..line_end];
    match HttpStatusLine::parse(line) {
        Ok(status) if status.code == 200 => {}
        _ => {
            let line = String::from_utf8_lossy(line);
            return Err(HttpConnectError::UnexpectedStatus(line.trim_end().to_string()));
        }
    }

    match stop {
        ReadChunksStop::Delimiter(end) => Ok(buf.split_off(end)),
        ReadChunksStop::Closed | ReadChunksStop::Exhausted => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use g3_types::auth::{Password, Username};
    use tokio_test::io::Builder;

    fn target() -> UpstreamAddr {
        UpstreamAddr::from_str("check.example:80").unwrap()
    }

    #[tokio::test]
    async fn connect_ok() {
        let mut stream = Builder::new()
            .write(b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\r\n")
            .read(b"HTTP/1.1 200 Connection established\r\n")
            .read(b"Via: test\r\n\r\nip=")
            .build();
        let left = http_connect_to(&mut stream, &ProxyAuth::None, &target(), 10)
            .await
            .unwrap();
        assert_eq!(left, b"ip=");
    }

    #[tokio::test]
    async fn connect_with_basic_auth() {
        let auth = ProxyAuth::User(
            Username::from_original("user").unwrap(),
            Password::from_original("pw").unwrap(),
        );
        let mut stream = Builder::new()
            .write(
                b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\
                  Proxy-Authorization: Basic dXNlcjpwdw==\r\n\r\n",
            )
            .read(b"HTTP/1.0 200 OK\r\n\r\n")
            .build();
        let left = http_connect_to(&mut stream, &auth, &target(), 10)
            .await
            .unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn connect_rejected() {
        let mut stream = Builder::new()
            .write(b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\r\n")
            .read(b"HTTP/1.1 407 Proxy Authentication Required\r\n")
            .read(b"Proxy-Authenticate: Basic realm=\"proxy\"\r\n\r\n")
            .build();
        let e = http_connect_to(&mut stream, &ProxyAuth::None, &target(), 10)
            .await
            .unwrap_err();
        let HttpConnectError::UnexpectedStatus(line) = e else {
            panic!("unexpected error {e}");
        };
        assert_eq!(line, "HTTP/1.1 407 Proxy Authentication Required");
    }

    #[tokio::test]
    async fn invalid_status_line() {
        let mut stream = Builder::new()
            .write(b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\r\n")
            .read(b"SSH-2.0-OpenSSH_9.6\r\n")
            .build();
        let e = http_connect_to(&mut stream, &ProxyAuth::None, &target(), 10)
            .await
            .unwrap_err();
        assert!(matches!(e, HttpConnectError::UnexpectedStatus(s) if s == "SSH-2.0-OpenSSH_9.6"));
    }

    #[tokio::test]
    async fn remote_closed() {
        let mut stream = Builder::new()
            .write(b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\r\n")
            .build();
        let e = http_connect_to(&mut stream, &ProxyAuth::None, &target(), 10)
            .await
            .unwrap_err();
        assert!(matches!(e, HttpConnectError::RemoteClosed));
    }

    #[tokio::test]
    async fn read_limit() {
        let mut stream = Builder::new()
            .write(b"CONNECT check.example:80 HTTP/1.1\r\nHost: check.example:80\r\n\r\n")
            .read(b"HTTP/1.1 200 OK\r\n")
            .read(b"X-A: 1\r\n")
            .build();
        let left = http_connect_to(&mut stream, &ProxyAuth::None, &target(), 2)
            .await
            .unwrap();
        assert!(left.is_empty());
    }
}
