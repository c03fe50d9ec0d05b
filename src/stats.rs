// File: stats.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::classifier::Verdict;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CampaignStats {
    total_probes: usize,
    ok: usize,
    suspicious: usize,
    failed: usize,
    cancelled: bool,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl CampaignStats {
    pub fn new(total_probes: usize) -> Self {
        Self {
            total_probes,
            ok: 0,
            suspicious: 0,
            failed: 0,
            cancelled: false,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Ok => self.ok += 1,
            Verdict::Suspicious => self.suspicious += 1,
            Verdict::Error => self.failed += 1,
        }
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn set_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn total_probes(&self) -> usize {
        self.total_probes
    }

    pub fn completed(&self) -> usize {
        self.ok + self.suspicious + self.failed
    }

    pub fn ok(&self) -> usize {
        self.ok
    }

    pub fn suspicious(&self) -> usize {
        self.suspicious
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds())
            .unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} probes. Started at {} / Ended at {}. {} ms. OK: {}. Suspicious: {}. Failed: {}.{}",
            self.completed(),
            self.total_probes,
            self.start_time.format("%Y-%m-%d %H:%M:%S"),
            self.end_time
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.duration_ms(),
            self.ok,
            self.suspicious,
            self.failed,
            if self.cancelled { " Cancelled." } else { "" }
        )
    }
}
