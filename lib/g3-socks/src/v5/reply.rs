/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tokio::io::{AsyncRead, AsyncReadExt};

use g3_types::net::UpstreamAddr;

use super::{SocksConnectError, SocksNegotiationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Socks5Reply {
    Succeeded,
    GeneralServerFailure,
    ForbiddenByRule,
    NetworkUnreachable,
    HostUnreachable,
    ConnectionRefused,
    TtlExpired,
    CommandNotSupported,
    AddressTypeNotSupported,
    ConnectionTimedOut,
    Unassigned(u8),
}

impl Socks5Reply {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0x00 => Socks5Reply::Succeeded,
            0x01 => Socks5Reply::GeneralServerFailure,
            0x02 => Socks5Reply::ForbiddenByRule,
            0x03 => Socks5Reply::NetworkUnreachable,
            0x04 => Socks5Reply::HostUnreachable,
            0x05 => Socks5Reply::ConnectionRefused,
            0x06 => Socks5Reply::TtlExpired,
            0x07 => Socks5Reply::CommandNotSupported,
            0x08 => Socks5Reply::AddressTypeNotSupported,
            0x09 => Socks5Reply::ConnectionTimedOut,
            n => Socks5Reply::Unassigned(n),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            Socks5Reply::Succeeded => 0x00,
            Socks5Reply::GeneralServerFailure => 0x01,
            Socks5Reply::ForbiddenByRule => 0x02,
            Socks5Reply::NetworkUnreachable => 0x03,
            Socks5Reply::HostUnreachable => 0x04,
            Socks5Reply::ConnectionRefused => 0x05,
            Socks5Reply::TtlExpired => 0x06,
            Socks5Reply::CommandNotSupported => 0x07,
            Socks5Reply::AddressTypeNotSupported => 0x08,
            Socks5Reply::ConnectionTimedOut => 0x09,
            Socks5Reply::Unassigned(n) => *n,
        }
    }

    pub const fn error_message(&self) -> &'static str {
        match self {
            // message from rfc1928
            Socks5Reply::Succeeded => "Succeeded",
            Socks5Reply::GeneralServerFailure => "General SOCKS server failure",
            Socks5Reply::ForbiddenByRule => "Connection not allowed by ruleset",
            Socks5Reply::NetworkUnreachable => "Network unreachable",
            Socks5Reply::HostUnreachable => "Host unreachable",
            Socks5Reply::ConnectionRefused => "Connection refused",
            Socks5Reply::TtlExpired => "TTL expired",
            Socks5Reply::CommandNotSupported => "Command not supported",
            Socks5Reply::AddressTypeNotSupported => "Address type not supported",
            // message from socks-6-09
            Socks5Reply::ConnectionTimedOut => "Connection attempt timed out",
            Socks5Reply::Unassigned(_) => "unassigned reply code",
        }
    }

    /// Receive the status part of a request reply.
    ///
    /// Only the version and reply code are read, the bound address is left in the stream.
    pub(crate) async fn recv_status<R>(reader: &mut R) -> Result<(), SocksConnectError>
    where
        R: AsyncRead + Unpin,
    {
        let mut hdr = [0u8; 2];
        reader
            .read_exact(&mut hdr)
            .await
            .map_err(SocksConnectError::from_read)?;
        if hdr[0] != 0x05 {
            return Err(SocksConnectError::InvalidVersion(hdr[0]));
        }
        match Socks5Reply::from_code(hdr[1]) {
            Socks5Reply::Succeeded => Ok(()),
            reply => Err(SocksConnectError::RequestRejected(reply.code())),
        }
    }

    /// Parse the bound address part of a reply, starting at the reserved byte.
    ///
    /// Returns the address and the number of bytes used, or `None` if more data is needed.
    pub fn parse_bound_addr(
        data: &[u8],
    ) -> Result<Option<(UpstreamAddr, usize)>, SocksNegotiationError> {
        let Some(&addr_type) = data.get(1) else {
            return Ok(None);
        };

        match addr_type {
            0x01 => {
                let Some(b) = data.get(2..8) else {
                    return Ok(None);
                };
                let ip4 = Ipv4Addr::new(b[0], b[1], b[2], b[3]);
                let port = u16::from_be_bytes([b[4], b[5]]);
                Ok(Some((UpstreamAddr::from_ip_and_port(IpAddr::V4(ip4), port), 8)))
            }
            0x03 => {
                let Some(&len) = data.get(2) else {
                    return Ok(None);
                };
                if len == 0 {
                    return Err(SocksNegotiationError::InvalidDomainString);
                }
                let end = 3 + len as usize + 2;
                let Some(b) = data.get(3..end) else {
                    return Ok(None);
                };
                let (domain, port) = b.split_at(len as usize);
                let domain = std::str::from_utf8(domain)
                    .map_err(|_| SocksNegotiationError::InvalidDomainString)?;
                let port = u16::from_be_bytes([port[0], port[1]]);
                let addr = UpstreamAddr::from_host_str_and_port(domain, port)
                    .map_err(|_| SocksNegotiationError::InvalidDomainString)?;
                Ok(Some((addr, end)))
            }
            0x04 => {
                let Some(b) = data.get(2..20) else {
                    return Ok(None);
                };
                let mut ip_bytes = [0u8; 16];
                ip_bytes.copy_from_slice(&b[0..16]);
                let port = u16::from_be_bytes([b[16], b[17]]);
                let ip6 = Ipv6Addr::from(ip_bytes);
                let addr = UpstreamAddr::from_ip_and_port(IpAddr::V6(ip6), port);
                Ok(Some((addr, 20)))
            }
            n => Err(SocksNegotiationError::InvalidAddrType(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use g3_types::net::Host;
    use tokio_test::io::Builder;

    #[test]
    fn bound_ipv4() {
        let data = [0x00, 0x01, 10, 0, 0, 1, 0x1f, 0x90, b'H'];
        let (addr, len) = Socks5Reply::parse_bound_addr(&data).unwrap().unwrap();
        assert_eq!(addr.to_string(), "10.0.0.1:8080");
        assert_eq!(len, 8);
    }

    #[test]
    fn bound_domain() {
        let (addr, len) = Socks5Reply::parse_bound_addr(b"\x00\x03\x0bbnd.example\x04\x38")
            .unwrap()
            .unwrap();
        assert_eq!(addr.host(), &Host::Domain("bnd.example".to_string()));
        assert_eq!(addr.port(), 1080);
        assert_eq!(len, 16);
    }

    #[test]
    fn bound_incomplete() {
        assert!(Socks5Reply::parse_bound_addr(&[]).unwrap().is_none());
        assert!(Socks5Reply::parse_bound_addr(&[0x00]).unwrap().is_none());
        assert!(
            Socks5Reply::parse_bound_addr(&[0x00, 0x01, 127])
                .unwrap()
                .is_none()
        );
        assert!(
            Socks5Reply::parse_bound_addr(b"\x00\x03\x0bbnd")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn bound_invalid() {
        let e = Socks5Reply::parse_bound_addr(&[0x00, 0x00]).unwrap_err();
        assert!(matches!(e, SocksNegotiationError::InvalidAddrType(0x00)));
        let e = Socks5Reply::parse_bound_addr(&[0x00, 0x03, 0x00]).unwrap_err();
        assert!(matches!(e, SocksNegotiationError::InvalidDomainString));
    }

    #[tokio::test]
    async fn status_succeeded() {
        // the bound address is not needed
        let mut stream = Builder::new().read(&[0x05, 0x00]).build();
        Socks5Reply::recv_status(&mut stream).await.unwrap();
    }

    #[tokio::test]
    async fn status_rejected() {
        let mut stream = Builder::new().read(&[0x05, 0x05]).build();
        let e = Socks5Reply::recv_status(&mut stream).await.unwrap_err();
        assert!(matches!(e, SocksConnectError::RequestRejected(0x05)));
        assert_eq!(
            e.to_string(),
            "request rejected with code 0x05: Connection refused"
        );
    }

    #[tokio::test]
    async fn status_invalid() {
        let mut stream = Builder::new().read(&[0x04, 0x00]).build();
        let e = Socks5Reply::recv_status(&mut stream).await.unwrap_err();
        assert!(matches!(e, SocksConnectError::InvalidVersion(0x04)));

        let mut stream = Builder::new().read(&[0x05]).build();
        let e = Socks5Reply::recv_status(&mut stream).await.unwrap_err();
        assert!(matches!(e, SocksConnectError::ResponseTruncated));
    }
}
