/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::{Host, Position, Url};

use g3_http::client::{HttpGetRequest, HttpSimpleResponse, HttpVersion};

use super::{IpLocate, IpLocateError, IpLocateServiceConfig, IpLocation};

/// Query an ipapi.is compatible json service over http or https
pub struct HttpIpLocator {
    config: IpLocateServiceConfig,
    tls_connector: Option<TlsConnector>,
}

fn build_tls_connector() -> anyhow::Result<TlsConnector> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

impl HttpIpLocator {
    pub fn new(config: IpLocateServiceConfig) -> anyhow::Result<Self> {
        let tls_connector = if config.service_url.scheme() == "https" {
            Some(build_tls_connector()?)
        } else {
            None
        };
        Ok(HttpIpLocator {
            config,
            tls_connector,
        })
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.config.service_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.config.query_param, query);
        url
    }

    async fn connect(&self, url: &Url) -> Result<TcpStream, IpLocateError> {
        let port = url.port_or_known_default().unwrap_or(80);
        let r = match url.host() {
            Some(Host::Domain(domain)) => TcpStream::connect((domain, port)).await,
            Some(Host::Ipv4(ip4)) => TcpStream::connect(SocketAddr::new(ip4.into(), port)).await,
            Some(Host::Ipv6(ip6)) => TcpStream::connect(SocketAddr::new(ip6.into(), port)).await,
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "no host in service url",
            )),
        };
        r.map_err(IpLocateError::ConnectFailed)
    }

    async fn do_request<S>(&self, stream: &mut S, url: &Url) -> Result<IpLocation, IpLocateError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let host_header = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        let path = &url[Position::BeforePath..Position::AfterQuery];
        let mut req = HttpGetRequest::new(HttpVersion::Http10, path, &host_header);
        req.append_header("Accept: application/json\r\n".to_string());
        req.send(stream).await.map_err(IpLocateError::WriteFailed)?;

        let max_size = self.config.max_response_size;
        let mut buf = Vec::with_capacity(4096);
        match (&mut *stream)
            .take(max_size as u64 + 1)
            .read_to_end(&mut buf)
            .await
        {
            Ok(_) => {}
            // a tls peer may close without sending close_notify
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !buf.is_empty() => {}
            Err(e) => return Err(IpLocateError::ReadFailed(e)),
        }
        if buf.len() > max_size {
            return Err(IpLocateError::ResponseTooLarge(max_size));
        }

        parse_response(&buf)
    }

    async fn locate_with_url(&self, url: &Url) -> Result<IpLocation, IpLocateError> {
        let mut tcp_stream = self.connect(url).await?;
        match &self.tls_connector {
            Some(connector) => {
                let host = url.host_str().unwrap_or_default();
                let host = host.trim_start_matches('[').trim_end_matches(']');
                let server_name = ServerName::try_from(host.to_string())
                    .map_err(|_| IpLocateError::InvalidServerName(host.to_string()))?;
                let mut tls_stream = connector
                    .connect(server_name, tcp_stream)
                    .await
                    .map_err(IpLocateError::TlsHandshakeFailed)?;
                self.do_request(&mut tls_stream, url).await
            }
            None => self.do_request(&mut tcp_stream, url).await,
        }
    }
}

fn parse_response(buf: &[u8]) -> Result<IpLocation, IpLocateError> {
    let rsp = HttpSimpleResponse::parse(buf)?;
    if !rsp.is_success() {
        return Err(IpLocateError::UnexpectedStatus(
            rsp.code,
            rsp.reason.to_string(),
        ));
    }
    IpLocation::from_json_slice(rsp.body)
}

#[async_trait]
impl IpLocate for HttpIpLocator {
    async fn locate(&self, query: &str) -> Result<IpLocation, IpLocateError> {
        let url = self.request_url(query);
        debug!("ip locate request to {url}");
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, self.locate_with_url(&url)).await {
            Ok(r) => r,
            Err(_) => Err(IpLocateError::Timeout(timeout)),
        }
    }
}
