/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::IpAddr;

use bytes::{BufMut, BytesMut};
use tokio::io::AsyncWrite;

use g3_io_ext::LimitedWriteExt;
use g3_types::net::{Host, UpstreamAddr};

use super::SocksCommand;

pub struct Socks5Request;

impl Socks5Request {
    pub(crate) fn encode(command: SocksCommand, addr: &UpstreamAddr) -> io::Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(262);
        buf.put_u8(0x05);
        buf.put_u8(command.code());
        buf.put_u8(0x00);
        match addr.host() {
            Host::Domain(domain) => {
                let Ok(len) = u8::try_from(domain.len()) else {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "too long domain for socks5 request",
                    ));
                };
                buf.put_u8(0x03);
                buf.put_u8(len);
                buf.put_slice(domain.as_bytes());
            }
            Host::Ip(IpAddr::V4(ip4)) => {
                buf.put_u8(0x01);
                buf.put_slice(&ip4.octets());
            }
            Host::Ip(IpAddr::V6(ip6)) => {
                buf.put_u8(0x04);
                buf.put_slice(&ip6.octets());
            }
        }
        buf.put_u16(addr.port());
        Ok(buf)
    }

    pub(crate) async fn send<W>(
        writer: &mut W,
        command: SocksCommand,
        addr: &UpstreamAddr,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = Socks5Request::encode(command, addr)?;
        writer.write_all_flush(buf.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn encode_domain() {
        let addr = UpstreamAddr::from_str("example.com:80").unwrap();
        let buf = Socks5Request::encode(SocksCommand::TcpConnect, &addr).unwrap();
        assert_eq!(
            buf.as_ref(),
            b"\x05\x01\x00\x03\x0bexample.com\x00\x50".as_slice()
        );
    }

    #[test]
    fn encode_ip() {
        let addr = UpstreamAddr::from_str("192.0.2.1:443").unwrap();
        let buf = Socks5Request::encode(SocksCommand::TcpConnect, &addr).unwrap();
        assert_eq!(
            buf.as_ref(),
            &[0x05u8, 0x01, 0x00, 0x01, 192, 0, 2, 1, 0x01, 0xbb]
        );

        let addr = UpstreamAddr::from_str("[2001:db8::1]:80").unwrap();
        let buf = Socks5Request::encode(SocksCommand::TcpConnect, &addr).unwrap();
        assert_eq!(buf.len(), 4 + 16 + 2);
        assert_eq!(buf[3], 0x04);
        assert_eq!(&buf[4..6], &[0x20u8, 0x01]);
        assert_eq!(buf[19], 0x01);
    }

    #[test]
    fn encode_too_long_domain() {
        let addr = UpstreamAddr::new(Host::Domain("a".repeat(256)), 80);
        let e = Socks5Request::encode(SocksCommand::TcpConnect, &addr).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
    }
}
