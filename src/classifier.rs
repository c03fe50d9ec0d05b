// File: classifier.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ok,
    Suspicious,
    /// The probe itself failed; no timing verdict exists.
    Error,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Suspicious => "Possible HTTP Request Smuggling",
            Verdict::Error => "ERROR",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Turns timing samples for one request into a verdict.
///
/// The campaign takes `samples()` measurements of the same request, reduces
/// them with `summarize` and hands the result to `classify`.
pub trait Classifier: Send + Sync {
    fn samples(&self) -> usize {
        1
    }

    fn summarize(&self, samples: &[Duration]) -> Duration;

    /// Strictly greater than the threshold is suspicious; equal is not.
    fn classify(&self, elapsed: Duration, threshold: Duration) -> Verdict {
        if elapsed > threshold {
            Verdict::Suspicious
        } else {
            Verdict::Ok
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdClassifier;

impl Classifier for ThresholdClassifier {
    fn summarize(&self, samples: &[Duration]) -> Duration {
        samples.first().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MedianClassifier {
    samples: usize,
}

impl MedianClassifier {
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(1),
        }
    }
}

impl Classifier for MedianClassifier {
    fn samples(&self) -> usize {
        self.samples
    }

    fn summarize(&self, samples: &[Duration]) -> Duration {
        calculate_median(samples)
    }
}

fn calculate_median(samples: &[Duration]) -> Duration {
    if samples.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) / 2
    } else {
        sorted[len / 2]
    }
}
