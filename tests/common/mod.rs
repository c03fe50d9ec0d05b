// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use async_trait::async_trait;
use rsmuggle::campaign::StopHandle;
use rsmuggle::catalog::{Catalog, DetectionTemplate, PermutationTemplate};
use rsmuggle::error::ProbeError;
use rsmuggle::target::Target;
use rsmuggle::transport::{ProbeResponse, Transport};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy)]
pub enum ServerBehavior {
    Respond(&'static str),
    Delay(Duration, &'static str),
    Silent,
    Close,
}

/// Accepts connections on an ephemeral port and answers every one the same way.
pub async fn spawn_server(behavior: ServerBehavior) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                match behavior {
                    ServerBehavior::Respond(response) => {
                        let _ = socket.write_all(response.as_bytes()).await;
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                    ServerBehavior::Delay(delay, response) => {
                        tokio::time::sleep(delay).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                    ServerBehavior::Silent => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                    }
                    ServerBehavior::Close => {}
                }
            });
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn ok_response(elapsed: Duration) -> ProbeResponse {
    ProbeResponse {
        status: Some("200".to_string()),
        elapsed,
        timed_out: false,
    }
}

pub fn refused() -> ProbeError {
    ProbeError::Connect {
        addr: "127.0.0.1:1".to_string(),
        reason: "Connection refused".to_string(),
    }
}

/// Plays back queued outcomes, then answers 200 with `fallback_elapsed`.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ProbeResponse, ProbeError>>>,
    fallback_elapsed: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<ProbeResponse, ProbeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback_elapsed: Duration::from_millis(5),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn probe(
        &self,
        _target: &Target,
        request: &[u8],
        _deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(ok_response(self.fallback_elapsed)))
    }
}

/// Later calls finish sooner, so unordered completion would reorder output.
pub struct SlowFirstTransport {
    calls: AtomicUsize,
}

impl SlowFirstTransport {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transport for SlowFirstTransport {
    async fn probe(
        &self,
        _target: &Target,
        _request: &[u8],
        _deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
        let delay = Duration::from_millis(80u64.saturating_sub(call * 10));
        tokio::time::sleep(delay).await;
        Ok(ok_response(delay))
    }
}

/// Requests a stop during its first exchange, like a Ctrl-C arriving mid-probe.
pub struct StoppingTransport {
    stop: StopHandle,
    refuse: bool,
    calls: AtomicUsize,
}

impl StoppingTransport {
    pub fn new(stop: StopHandle, refuse: bool) -> Self {
        Self {
            stop,
            refuse,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StoppingTransport {
    async fn probe(
        &self,
        _target: &Target,
        _request: &[u8],
        _deadline: Duration,
    ) -> Result<ProbeResponse, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stop.stop();
        if self.refuse {
            Err(refused())
        } else {
            Ok(ok_response(Duration::from_millis(5)))
        }
    }
}

pub fn permutation(kind: &str) -> PermutationTemplate {
    PermutationTemplate {
        kind: kind.to_string(),
        content_length_header_name: "Content-Length: ".to_string(),
        transfer_encoding_header_name: "Transfer-Encoding: ".to_string(),
        transfer_encoding_header_value: "chunked".to_string(),
    }
}

pub fn detection(kind: &str, body: &str, declared: u64) -> DetectionTemplate {
    DetectionTemplate {
        kind: kind.to_string(),
        body: body.to_string(),
        declared_content_length: declared,
    }
}

pub fn catalog(detections: usize, permutations: usize) -> Catalog {
    Catalog::new(
        (0..permutations)
            .map(|i| permutation(&format!("perm-{}", i + 1)))
            .collect(),
        (0..detections)
            .map(|i| detection(&format!("det-{}", i + 1), "\r\n0\r\n\r\n", 5))
            .collect(),
    )
}
