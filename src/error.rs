// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidUrl(String),
    InvalidMethod(String),
    TimeoutOutOfRange(u64),
    RetryOutOfRange(u32),
    InvalidDeadline { deadline: u64, timeout: u64 },
    ConcurrencyOutOfRange(usize),
    SamplesOutOfRange(usize),
    InvalidFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid target url: {}", url),
            Self::InvalidMethod(method) => {
                write!(f, "Invalid method: {} (expected GET or POST)", method)
            }
            Self::TimeoutOutOfRange(t) => write!(f, "Timeout {}s is outside 1..=60", t),
            Self::RetryOutOfRange(r) => write!(f, "Retry count {} is outside 0..=10", r),
            Self::InvalidDeadline { deadline, timeout } => write!(
                f,
                "Probe deadline {}s must be greater than the timeout threshold {}s",
                deadline, timeout
            ),
            Self::ConcurrencyOutOfRange(c) => write!(f, "Concurrency {} is outside 1..=32", c),
            Self::SamplesOutOfRange(s) => write!(f, "Sample count {} is outside 1..=10", s),
            Self::InvalidFormat(format) => {
                write!(f, "Unsupported output format: {} (expected text or jsonl)", format)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "Cannot read payload catalog {}: {}", path, source),
            Self::Parse(e) => write!(f, "Error parsing payloads: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error)
    }
}

/// Failure of a single probe exchange.
#[derive(Debug)]
pub enum ProbeError {
    Connect { addr: String, reason: String },
    Tls(String),
    Io(std::io::Error),
    EmptyResponse,
    MalformedStatusLine(String),
}

impl ProbeError {
    /// Failures that happen before any response bytes arrive and are worth
    /// sending the same request again for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Tls(_) | Self::Io(_))
    }

    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Tls(_))
    }

    pub fn connect_timeout(addr: &str, after: Duration) -> Self {
        Self::Connect {
            addr: addr.to_string(),
            reason: format!("timed out after {:.3}s", after.as_secs_f64()),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { addr, reason } => write!(f, "connection error to {}: {}", addr, reason),
            Self::Tls(msg) => write!(f, "tls handshake failed: {}", msg),
            Self::Io(e) => write!(f, "read/write failed: {}", e),
            Self::EmptyResponse => write!(f, "connection closed before a status line"),
            Self::MalformedStatusLine(line) => write!(f, "malformed status line: {:?}", line),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProbeError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

#[derive(Debug)]
pub enum SmuggleError {
    Config(ConfigError),
    Catalog(CatalogError),
    Connection(ProbeError),
    Serialize(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for SmuggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::Catalog(e) => write!(f, "Catalog error: {}", e),
            Self::Connection(e) => write!(f, "Aborting campaign, {}", e),
            Self::Serialize(e) => write!(f, "Cannot serialize result record: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SmuggleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Catalog(e) => Some(e),
            Self::Connection(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SmuggleError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<CatalogError> for SmuggleError {
    fn from(error: CatalogError) -> Self {
        Self::Catalog(error)
    }
}

impl From<serde_json::Error> for SmuggleError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error)
    }
}

impl From<std::io::Error> for SmuggleError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

pub type SmuggleResult<T> = Result<T, SmuggleError>;
