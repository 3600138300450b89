/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::AsyncWrite;

use g3_io_ext::LimitedWriteExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
}

impl HttpVersion {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
        }
    }
}

/// A bodyless GET request, sent with `Connection: close` so the response can be read to EOF
pub struct HttpGetRequest<'a> {
    version: HttpVersion,
    path: &'a str,
    host: &'a str,
    extra_headers: Vec<String>,
}

impl<'a> HttpGetRequest<'a> {
    pub fn new(version: HttpVersion, path: &'a str, host: &'a str) -> Self {
        HttpGetRequest {
            version,
            path,
            host,
            extra_headers: Vec::new(),
        }
    }

    /// the header line should end with \r\n
    pub fn append_header(&mut self, line: String) {
        debug_assert!(line.ends_with("\r\n"));
        self.extra_headers.push(line);
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        buf.extend_from_slice(
            format!("GET {} {}\r\n", self.path, self.version.as_str()).as_bytes(),
        );
        buf.extend_from_slice(format!("Host: {}\r\n", self.host).as_bytes());
        for line in &self.extra_headers {
            buf.extend_from_slice(line.as_bytes());
        }
        buf.extend_from_slice(b"Connection: close\r\n\r\n");
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
