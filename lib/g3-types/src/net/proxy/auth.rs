/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::auth::{AuthParseError, Password, Username};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProxyAuth {
    #[default]
    None,
    User(Username, Password),
}

impl ProxyAuth {
    /// Parse the percent-encoded `user:pass` userinfo part of a proxy address
    pub(super) fn from_user_info(s: &str) -> Result<Self, AuthParseError> {
        let Some(p) = memchr::memchr(b':', s.as_bytes()) else {
            return Err(AuthParseError::NoDelimiterFound);
        };
        let username = Username::from_encoded(&s[..p])?;
        let password = Password::from_encoded(&s[p + 1..])?;
        Ok(ProxyAuth::User(username, password))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ProxyAuth::None)
    }
}
