// File: request.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::catalog::{DetectionTemplate, PermutationTemplate};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

const CRLF: &str = "\r\n";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(ConfigError::InvalidMethod(other.to_string())),
        }
    }
}

/// Assembles the raw smuggling request. The header block ends with the
/// transfer-encoding line; the detection body follows it directly, so a
/// body that should start after a blank line has to begin with CRLF itself.
pub fn build(
    method: HttpMethod,
    host: &str,
    permutation: &PermutationTemplate,
    detection: &DetectionTemplate,
) -> Vec<u8> {
    let headers = format!(
        "{method} / HTTP/1.1{CRLF}Host: {host}{CRLF}{cl_name}{cl}{CRLF}{te_name}{te_value}{CRLF}",
        method = method.as_str(),
        host = host,
        cl_name = permutation.content_length_header_name,
        cl = detection.declared_content_length,
        te_name = permutation.transfer_encoding_header_name,
        te_value = permutation.transfer_encoding_header_value,
    );

    let mut raw = Vec::with_capacity(headers.len() + detection.body.len());
    raw.extend_from_slice(headers.as_bytes());
    raw.extend_from_slice(detection.body_bytes());
    raw
}

pub fn fingerprint(raw_request: &[u8]) -> String {
    let digest = Sha256::digest(raw_request);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
