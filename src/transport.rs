// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::ProbeError;
use crate::target::Target;
use async_trait::async_trait;
use log::{debug, trace};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::{rustls, TlsConnector};

const MAX_STATUS_LINE: u64 = 8192;

/// What a single probe observed. `status` is `None` when the deadline
/// expired before the first response line arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: Option<String>,
    pub elapsed: Duration,
    pub timed_out: bool,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` on a fresh connection and waits for the first response
    /// line. Connect, write and read share the single `deadline`.
    async fn probe(
        &self,
        target: &Target,
        request: &[u8],
        deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn probe(
        &self,
        target: &Target,
        request: &[u8],
        deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        (**self).probe(target, request, deadline).await
    }
}

/// Plain TCP for `http` targets, rustls over TCP for `https` targets.
#[derive(Clone)]
pub struct TcpTransport {
    connector: TlsConnector,
}

impl TcpTransport {
    pub fn new() -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
            rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
                ta.subject,
                ta.spki,
                ta.name_constraints,
            )
        }));

        let config = rustls::ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    async fn exchange(
        &self,
        target: &Target,
        stream: TcpStream,
        request: &[u8],
    ) -> Result<String, ProbeError> {
        if target.tls() {
            let domain = rustls::ServerName::try_from(target.server_name())
                .map_err(|e| ProbeError::Tls(e.to_string()))?;
            let tls_stream = self
                .connector
                .connect(domain, stream)
                .await
                .map_err(|e| ProbeError::Tls(e.to_string()))?;
            read_first_line(tls_stream, request).await
        } else {
            read_first_line(stream, request).await
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn probe(
        &self,
        target: &Target,
        request: &[u8],
        deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        let addr = target.socket_addr();
        let start = Instant::now();

        let stream = match tokio::time::timeout(deadline, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(ProbeError::Connect {
                    addr,
                    reason: e.to_string(),
                })
            }
            Err(_) => return Err(ProbeError::connect_timeout(&addr, deadline)),
        };
        trace!("Connected to {} in {:?}", addr, start.elapsed());

        let remaining = deadline.saturating_sub(start.elapsed());
        match tokio::time::timeout(remaining, self.exchange(target, stream, request)).await {
            Ok(Ok(line)) => {
                let elapsed = start.elapsed();
                let status = parse_status_line(&line)?;
                Ok(ProbeResponse {
                    status: Some(status),
                    elapsed,
                    timed_out: false,
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                debug!("No status line from {} within {:?}", addr, deadline);
                Ok(ProbeResponse {
                    status: None,
                    elapsed: start.elapsed(),
                    timed_out: true,
                })
            }
        }
    }
}

async fn read_first_line<S>(mut stream: S, request: &[u8]) -> Result<String, ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(request).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream).take(MAX_STATUS_LINE);
    let mut line = Vec::new();
    let read = reader.read_until(b'\n', &mut line).await?;
    if read == 0 {
        return Err(ProbeError::EmptyResponse);
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

/// Second space separated token of the status line.
pub fn parse_status_line(line: &str) -> Result<String, ProbeError> {
    let trimmed = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let mut tokens = trimmed.split(' ');
    tokens.next();
    match tokens.next() {
        Some(status) if !status.is_empty() => Ok(status.to_string()),
        _ => Err(ProbeError::MalformedStatusLine(trimmed.to_string())),
    }
}
