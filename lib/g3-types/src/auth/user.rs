/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS};

use super::AuthParseError;

// the socks5 username/password sub-negotiation uses a single length byte
const USERNAME_MAX_LENGTH: usize = u8::MAX as usize;
const PASSWORD_MAX_LENGTH: usize = u8::MAX as usize;

const USER_INFO_PCT_ENCODING_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

fn pct_decode(s: &str) -> Result<String, AuthParseError> {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .map(|v| v.into_owned())
        .map_err(|_| AuthParseError::InvalidUtf8Encoding)
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Username {
    inner: String,
}

impl Username {
    pub fn len(&self) -> u8 {
        self.inner.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// A colon is allowed here, it can only be given percent-encoded in userinfo
    pub fn from_original(s: &str) -> Result<Self, AuthParseError> {
        if s.is_empty() || s.len() > USERNAME_MAX_LENGTH {
            return Err(AuthParseError::InvalidUsername);
        }
        Ok(Username {
            inner: s.to_string(),
        })
    }

    pub fn from_encoded(s: &str) -> Result<Self, AuthParseError> {
        let decoded = pct_decode(s)?;
        Username::from_original(&decoded)
    }

    pub fn as_original(&self) -> &str {
        &self.inner
    }

    pub fn to_encoded(&self) -> String {
        percent_encoding::utf8_percent_encode(self.as_original(), USER_INFO_PCT_ENCODING_SET)
            .to_string()
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct Password {
    inner: String,
}

impl Password {
    pub fn len(&self) -> u8 {
        self.inner.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn from_original(s: &str) -> Result<Self, AuthParseError> {
        if s.is_empty() || s.len() > PASSWORD_MAX_LENGTH {
            return Err(AuthParseError::InvalidPassword);
        }
        Ok(Password {
            inner: s.to_string(),
        })
    }

    pub fn from_encoded(s: &str) -> Result<Self, AuthParseError> {
        let decoded = pct_decode(s)?;
        Password::from_original(&decoded)
    }

    pub fn as_original(&self) -> &str {
        &self.inner
    }

    pub fn to_encoded(&self) -> String {
        percent_encoding::utf8_percent_encode(self.as_original(), USER_INFO_PCT_ENCODING_SET)
            .to_string()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
