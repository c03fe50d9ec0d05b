// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::campaign::ProbeResult;
use crate::classifier::Verdict;
use crate::error::{ConfigError, SmuggleResult};
use colored::*;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Jsonl,
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "jsonl" | "json" => Ok(ReportFormat::Jsonl),
            other => Err(ConfigError::InvalidFormat(other.to_string())),
        }
    }
}

/// Streams probe results, one line each, to any writer.
pub struct ReportWriter<W: Write> {
    out: W,
    format: ReportFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    pub fn write_result(&mut self, result: &ProbeResult) -> SmuggleResult<()> {
        let line = match self.format {
            ReportFormat::Text => format_text_line(result),
            ReportFormat::Jsonl => serde_json::to_string(result)?,
        };
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Permutation type, detection type, host, status, elapsed seconds, verdict.
///
/// Always six fields: five without spaces, then the verdict label as the rest
/// of the line. Failure reasons only go to the log and the `error` field of
/// JSONL records.
pub fn format_text_line(result: &ProbeResult) -> String {
    let verdict = match result.verdict {
        Verdict::Ok => result.verdict.label().green().to_string(),
        Verdict::Suspicious => result.verdict.label().bright_red().bold().to_string(),
        Verdict::Error => result.verdict.label().yellow().to_string(),
    };

    format!(
        "{} {} {} {} {:.6} {}",
        result.permutation_type,
        result.detection_type,
        result.host,
        result.status.as_deref().unwrap_or("-"),
        result.elapsed_secs,
        verdict
    )
}
