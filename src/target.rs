// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    url: String,
    host: String,
    port: u16,
    tls: bool,
    explicit_port: bool,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.is_empty() || raw.len() > 2048 {
            return Err(ConfigError::InvalidUrl(raw.to_string()));
        }

        let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
        let tls = match parsed.scheme() {
            "http" => false,
            "https" => true,
            _ => return Err(ConfigError::InvalidUrl(raw.to_string())),
        };
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::InvalidUrl(raw.to_string()))?;

        if !host.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigError::InvalidUrl(raw.to_string()));
        }

        let port = parsed
            .port_or_known_default()
            .unwrap_or(if tls { 443 } else { 80 });

        Ok(Self {
            url: raw.to_string(),
            host: host.to_string(),
            port,
            tls,
            explicit_port: parsed.port().is_some(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn tls(&self) -> bool {
        self.tls
    }

    /// Value used for the Host header and the result records.
    pub fn authority(&self) -> String {
        if self.explicit_port {
            format!("{}:{}", self.host, self.port)
        } else {
            self.host.clone()
        }
    }

    /// Socket address string for dialing. IPv6 literals keep their brackets.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host name without IPv6 brackets, for TLS server name checks.
    pub fn server_name(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
