/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use base64::prelude::*;

use crate::auth::{AuthParseError, Password, Username};

pub struct HttpBasicAuth {
    encoded_value: String,
}

impl HttpBasicAuth {
    /// The username must not contain a colon, which is the user-pass delimiter
    pub fn new(username: &Username, password: &Password) -> Result<Self, AuthParseError> {
        let us = username.as_original();
        if us.contains(':') {
            return Err(AuthParseError::InvalidUsername);
        }
        let ps = password.as_original();
        let mut buf = Vec::with_capacity(us.len() + 1 + ps.len());
        buf.extend_from_slice(us.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(ps.as_bytes());

        Ok(HttpBasicAuth {
            encoded_value: BASE64_STANDARD.encode(buf),
        })
    }

    #[inline]
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }

    /// The full header line, ending with \r\n
    pub fn proxy_authorization_line(&self) -> String {
        format!("Proxy-Authorization: Basic {}\r\n", self.encoded_value)
    }
}
