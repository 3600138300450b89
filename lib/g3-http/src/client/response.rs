/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use super::HttpResponseParseError;
use crate::HttpStatusLine;

/// A response read to EOF, split into status, header block and body.
///
/// Only identity transfer encoding is expected, as requests are sent with `Connection: close`.
pub struct HttpSimpleResponse<'a> {
    pub code: u16,
    pub reason: &'a str,
    pub header: &'a [u8],
    pub body: &'a [u8],
}

impl<'a> HttpSimpleResponse<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<Self, HttpResponseParseError> {
        if buf.is_empty() {
            return Err(HttpResponseParseError::Empty);
        }

        let Some(header_end) = memchr::memmem::find(buf, b"\r\n\r\n") else {
            return Err(HttpResponseParseError::IncompleteHeader);
        };
        let header = &buf[..header_end + 2];
        let body = &buf[header_end + 4..];

        let line_end = memchr::memchr(b'\n', header).map(|p| p + 1).unwrap_or(header.len());
        let status = HttpStatusLine::parse(&header[..line_end])?;

        Ok(HttpSimpleResponse {
            code: status.code,
            reason: status.reason,
            header: &header[line_end..],
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}
