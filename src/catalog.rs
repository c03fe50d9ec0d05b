// File: catalog.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::CatalogError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CATALOG_PATH: &str = "payloads.json";

/// One way of spelling the conflicting framing headers. Header names are
/// emitted byte for byte, separators included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PermutationTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "content_length_key")]
    pub content_length_header_name: String,
    #[serde(alias = "te_key")]
    pub transfer_encoding_header_name: String,
    #[serde(alias = "te_value")]
    pub transfer_encoding_header_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionTemplate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "payload")]
    pub body: String,
    #[serde(alias = "content_length")]
    pub declared_content_length: u64,
}

impl DetectionTemplate {
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_bytes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    permute: Vec<PermutationTemplate>,
    detection: Vec<DetectionTemplate>,
}

impl Catalog {
    pub fn new(permute: Vec<PermutationTemplate>, detection: Vec<DetectionTemplate>) -> Self {
        Self { permute, detection }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&content)?;
        debug!(
            "Loaded catalog {} with {} permutations and {} detections",
            path.display(),
            catalog.permute.len(),
            catalog.detection.len()
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(content)?;
        if catalog.is_empty() {
            warn!("Payload catalog yields no probes");
        }
        Ok(catalog)
    }

    pub fn permutations(&self) -> &[PermutationTemplate] {
        &self.permute
    }

    pub fn detections(&self) -> &[DetectionTemplate] {
        &self.detection
    }

    /// Number of probes a campaign over this catalog issues.
    pub fn probe_count(&self) -> usize {
        self.permute.len() * self.detection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probe_count() == 0
    }

    /// Detection templates outer, permutation templates inner.
    pub fn pairs(&self) -> impl Iterator<Item = (&DetectionTemplate, &PermutationTemplate)> + '_ {
        self.detection
            .iter()
            .flat_map(move |d| self.permute.iter().map(move |p| (d, p)))
    }
}
