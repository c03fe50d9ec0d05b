// File: confirm.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::target::Target;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    NotAttempted,
    Confirmed,
    Refuted,
}

/// Follow-up check for a probe that came back suspicious. Invoked once per
/// suspicious result with the exact request that triggered it.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, target: &Target, request: &[u8]) -> Confirmation;
}

/// Reports every suspicious probe as unconfirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfirmation;

#[async_trait]
impl Confirmer for NoConfirmation {
    async fn confirm(&self, _target: &Target, _request: &[u8]) -> Confirmation {
        Confirmation::NotAttempted
    }
}
