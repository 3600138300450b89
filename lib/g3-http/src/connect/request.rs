/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::AsyncWrite;

use g3_io_ext::LimitedWriteExt;
use g3_types::net::UpstreamAddr;

pub struct HttpConnectRequest<'a> {
    host: &'a UpstreamAddr,
    dyn_headers: Vec<String>,
}

impl<'a> HttpConnectRequest<'a> {
    pub fn new(host: &'a UpstreamAddr) -> Self {
        HttpConnectRequest {
            host,
            dyn_headers: Vec::new(),
        }
    }

    /// the header line should end with \r\n
    pub fn append_dyn_header(&mut self, line: String) {
        debug_assert!(line.ends_with("\r\n"));
        self.dyn_headers.push(line);
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(format!("CONNECT {} HTTP/1.1\r\n", self.host).as_bytes());
        buf.extend_from_slice(format!("Host: {}\r\n", self.host).as_bytes());
        for line in &self.dyn_headers {
            buf.extend_from_slice(line.as_bytes());
        }
        buf.extend_from_slice(b"\r\n");
        buf
    }

    pub async fn send<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = self.serialize();
        writer.write_all_flush(&buf).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serialize() {
        let addr = UpstreamAddr::from_str("[2001:db8::1]:443").unwrap();
        let mut req = HttpConnectRequest::new(&addr);
        assert_eq!(
            req.serialize(),
            b"CONNECT [2001:db8::1]:443 HTTP/1.1\r\nHost: [2001:db8::1]:443\r\n\r\n"
        );

        req.append_dyn_header("X-Probe: 1\r\n".to_string());
        assert_eq!(
            req.serialize(),
            b"CONNECT [2001:db8::1]:443 HTTP/1.1\r\nHost: [2001:db8::1]:443\r\nX-Probe: 1\r\n\r\n"
        );
    }
}
