/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use super::{AddrParseError, Host};

/// A host and port pair, as used for proxy peers and tunnel targets.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct UpstreamAddr {
    host: Host,
    port: u16,
}

impl UpstreamAddr {
    pub fn new(host: Host, port: u16) -> Self {
        UpstreamAddr { host, port }
    }

    pub fn from_ip_and_port(ip: IpAddr, port: u16) -> Self {
        UpstreamAddr::new(Host::from(ip), port)
    }

    pub fn from_host_str_and_port(host: &str, port: u16) -> Result<Self, AddrParseError> {
        let host = Host::from_str(host)?;
        Ok(UpstreamAddr::new(host, port))
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.is_ipv6() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(s: &str) -> Result<u16, AddrParseError> {
    if s.is_empty() {
        return Err(AddrParseError::NoPortFound);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddrParseError::InvalidPort);
    }
    match u16::from_str(s) {
        Ok(0) | Err(_) => Err(AddrParseError::InvalidPort),
        Ok(port) => Ok(port),
    }
}

impl FromStr for UpstreamAddr {
    type Err = AddrParseError;

    /// Parse `host:port`, ipv6 hosts should be enclosed in square brackets
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('[') {
            let Some(p) = memchr::memchr(b']', s.as_bytes()) else {
                return Err(AddrParseError::InvalidIpv6Address);
            };
            let host = Host::from_str(&s[..=p])?;
            let left = &s[p + 1..];
            let Some(port) = left.strip_prefix(':') else {
                return Err(AddrParseError::NoPortFound);
            };
            let port = parse_port(port)?;
            return Ok(UpstreamAddr::new(host, port));
        }

        let Some(p) = memchr::memrchr(b':', s.as_bytes()) else {
            return Err(AddrParseError::NoPortFound);
        };
        let host_s = &s[..p];
        if host_s.contains(':') {
            // bare ipv6
            return Err(AddrParseError::InvalidIpv6Address);
        }
        let host = Host::from_str(host_s)?;
        let port = parse_port(&s[p + 1..])?;
        Ok(UpstreamAddr::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn parse() {
        let a = UpstreamAddr::from_str("1.1.1.1:80").unwrap();
        assert_eq!(a.host(), &Host::Ip(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1))));
        assert_eq!(a.port(), 80);

        let a = UpstreamAddr::from_str("[2001:db8::1]:1080").unwrap();
        assert_eq!(
            a.host(),
            &Host::Ip(IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)))
        );
        assert_eq!(a.to_string(), "[2001:db8::1]:1080");

        let a = UpstreamAddr::from_str("check.example:80").unwrap();
        assert_eq!(a.to_string(), "check.example:80");
    }

    #[test]
    fn parse_err() {
        assert_eq!(
            UpstreamAddr::from_str("proxy.example").unwrap_err(),
            AddrParseError::NoPortFound
        );
        assert_eq!(
            UpstreamAddr::from_str("proxy.example:").unwrap_err(),
            AddrParseError::NoPortFound
        );
        assert_eq!(
            UpstreamAddr::from_str("proxy.example:http").unwrap_err(),
            AddrParseError::InvalidPort
        );
        assert_eq!(
            UpstreamAddr::from_str("proxy.example:+80").unwrap_err(),
            AddrParseError::InvalidPort
        );
        assert_eq!(
            UpstreamAddr::from_str("proxy.example:0").unwrap_err(),
            AddrParseError::InvalidPort
        );
        assert_eq!(
            UpstreamAddr::from_str("proxy.example:65536").unwrap_err(),
            AddrParseError::InvalidPort
        );
        assert_eq!(
            UpstreamAddr::from_str(":1080").unwrap_err(),
            AddrParseError::EmptyHost
        );
        assert_eq!(
            UpstreamAddr::from_str("2001:db8::1:1080").unwrap_err(),
            AddrParseError::InvalidIpv6Address
        );
    }
}
