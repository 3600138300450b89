/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;
use std::str::FromStr;

use super::ProbeError;

/// Find the egress ip in a `key=value` trace response.
///
/// The http header is skipped if present. The response should contain exactly one
/// distinct `ip=` value.
pub fn extract_exit_ip(data: &[u8]) -> Result<IpAddr, ProbeError> {
    let body = match memchr::memmem::find(data, b"\r\n\r\n") {
        Some(p) => &data[p + 4..],
        None => data,
    };
    let body = String::from_utf8_lossy(body);

    let mut found: Option<IpAddr> = None;
    for line in body.lines() {
        let Some(value) = line.trim().strip_prefix("ip=") else {
            continue;
        };
        let ip = IpAddr::from_str(value.trim())
            .map_err(|_| ProbeError::IpExtractionFailed("invalid ip value"))?;
        match found {
            Some(prev) if prev != ip => {
                return Err(ProbeError::IpExtractionFailed("ambiguous ip values"));
            }
            _ => found = Some(ip),
        }
    }

    found.ok_or(ProbeError::IpExtractionFailed("no ip field found"))
}
