/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use super::AddrParseError;

const DOMAIN_MAX_LENGTH: usize = u8::MAX as usize;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Host {
    Ip(IpAddr),
    Domain(String),
}

impl Host {
    fn from_maybe_mapped_ip6(ip6: Ipv6Addr) -> Self {
        if let Some(ip4) = ip6.to_ipv4_mapped() {
            Host::Ip(IpAddr::V4(ip4))
        } else {
            Host::Ip(IpAddr::V6(ip6))
        }
    }

    fn from_domain_str(domain: &str) -> Result<Self, AddrParseError> {
        let domain = idna::domain_to_ascii(domain).map_err(|_| AddrParseError::InvalidDomain)?;
        if domain.is_empty() {
            return Err(AddrParseError::InvalidDomain);
        }
        if domain.len() > DOMAIN_MAX_LENGTH {
            return Err(AddrParseError::TooLongDomain);
        }
        if !domain
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_'))
        {
            return Err(AddrParseError::InvalidDomain);
        }
        Ok(Host::Domain(domain))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, Host::Ip(IpAddr::V6(_)))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ip(ip) => write!(f, "{ip}"),
            Host::Domain(domain) => f.write_str(domain),
        }
    }
}

impl From<IpAddr> for Host {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => Host::Ip(ip),
            IpAddr::V6(ip6) => Host::from_maybe_mapped_ip6(ip6),
        }
    }
}

impl FromStr for Host {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AddrParseError::EmptyHost);
        }
        match s.as_bytes()[0] {
            b'[' => {
                let pos_last = s.len() - 1;
                if pos_last > 0 && s.as_bytes()[pos_last] == b']' {
                    if let Ok(ip6) = Ipv6Addr::from_str(&s[1..pos_last]) {
                        return Ok(Host::from_maybe_mapped_ip6(ip6));
                    }
                }
                return Err(AddrParseError::InvalidIpv6Address);
            }
            b':' => {
                return Ipv6Addr::from_str(s)
                    .map(Host::from_maybe_mapped_ip6)
                    .map_err(|_| AddrParseError::InvalidIpv6Address);
            }
            b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => {
                if let Ok(ip) = IpAddr::from_str(s) {
                    return Ok(Host::from(ip));
                }
            }
            _ => {}
        }

        Host::from_domain_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn parse_ip() {
        assert_eq!(
            Host::from_str("203.0.113.7").unwrap(),
            Host::Ip(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)))
        );
        let h = Host::from_str("[2001:db8::1]").unwrap();
        assert!(h.is_ipv6());
        assert_eq!(h.to_string(), "2001:db8::1");
        let h = Host::from_str("::ffff:192.0.2.1").unwrap();
        assert_eq!(h, Host::Ip(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))));
        assert_eq!(
            Host::from_str("[2001:db8::1").unwrap_err(),
            AddrParseError::InvalidIpv6Address
        );
    }

    #[test]
    fn parse_domain() {
        let h = Host::from_str("Proxy.Example").unwrap();
        assert_eq!(h, Host::Domain("proxy.example".to_string()));
        assert_eq!(h.to_string(), "proxy.example");

        // looks like hex but not an ip
        let h = Host::from_str("cafe.example").unwrap();
        assert_eq!(h, Host::Domain("cafe.example".to_string()));

        assert_eq!(Host::from_str("").unwrap_err(), AddrParseError::EmptyHost);
        assert!(Host::from_str("user@proxy.example").is_err());
        assert!(Host::from_str("proxy.example/path").is_err());

        let long = format!("{}.example", "a".repeat(250));
        assert_eq!(
            Host::from_str(&long).unwrap_err(),
            AddrParseError::TooLongDomain
        );
    }
}
