// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::error::ConfigError;
use crate::request::HttpMethod;
use crate::target::Target;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::time::Duration;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/?#]+([/?#]\S*)?$").unwrap());

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY: u32 = 2;
pub const MAX_TIMEOUT_SECS: u64 = 60;
pub const MAX_RETRY: u32 = 10;
pub const MAX_CONCURRENCY: usize = 32;
pub const MAX_SAMPLES: usize = 10;

/// What the campaign does once a dial keeps failing after all retries.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionFailurePolicy {
    /// Stop the whole campaign with a connection error.
    #[default]
    Abort,
    /// Report the pair as a failed probe and move on.
    Continue,
}

/// Validated, immutable settings for one campaign.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    target: Target,
    method: HttpMethod,
    timeout: u64,
    retry: u32,
    deadline: u64,
    concurrency: usize,
    samples: usize,
    connection_failure: ConnectionFailurePolicy,
}

impl RunConfig {
    pub fn new(url: &str, method: &str, timeout: u64, retry: u32) -> Result<Self, ConfigError> {
        if !URL_PATTERN.is_match(url) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        let target = Target::parse(url)?;
        let method: HttpMethod = method.parse()?;

        if !(1..=MAX_TIMEOUT_SECS).contains(&timeout) {
            return Err(ConfigError::TimeoutOutOfRange(timeout));
        }
        if retry > MAX_RETRY {
            return Err(ConfigError::RetryOutOfRange(retry));
        }

        Ok(Self {
            target,
            method,
            timeout,
            retry,
            deadline: timeout * 2,
            concurrency: 1,
            samples: 1,
            connection_failure: ConnectionFailurePolicy::Abort,
        })
    }

    pub fn with_deadline(mut self, deadline: u64) -> Result<Self, ConfigError> {
        if deadline <= self.timeout {
            return Err(ConfigError::InvalidDeadline {
                deadline,
                timeout: self.timeout,
            });
        }
        self.deadline = deadline;
        Ok(self)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, ConfigError> {
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(ConfigError::ConcurrencyOutOfRange(concurrency));
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    pub fn with_samples(mut self, samples: usize) -> Result<Self, ConfigError> {
        if !(1..=MAX_SAMPLES).contains(&samples) {
            return Err(ConfigError::SamplesOutOfRange(samples));
        }
        self.samples = samples;
        Ok(self)
    }

    pub fn with_connection_failure(mut self, policy: ConnectionFailurePolicy) -> Self {
        self.connection_failure = policy;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Classification threshold; exactly `timeout` seconds.
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// Upper bound for a single probe's connect and first-line read.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn connection_failure(&self) -> ConnectionFailurePolicy {
        self.connection_failure
    }
}
